use serde::{Deserialize, Serialize};

use super::domain::{DayIndex, PassStatus, Roster, SchoolId};
use super::recommend::{AdvisorEngine, RecommendationSet};

/// Recommendations projected for one day of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecommendation {
    pub day: DayIndex,
    pub result: RecommendationSet,
}

/// A result announcement expected inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAnnouncement {
    pub school_id: SchoolId,
    pub school_name: String,
    pub result_day: DayIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub start_day: DayIndex,
    pub recommendations: Vec<DailyRecommendation>,
    pub upcoming_announcements: Vec<UpcomingAnnouncement>,
    pub note: String,
}

impl AdvisorEngine {
    /// Project recommendations over `days` consecutive days starting at `start`.
    ///
    /// Every day is evaluated against the roster as given: advice from earlier days is
    /// never assumed to have been followed. Urgencies count from `start`.
    pub fn project(&self, roster: &Roster, start: DayIndex, days: u32) -> WeeklyPlan {
        let recommendations = (0..days)
            .map(|offset| {
                let day = start.offset(offset);
                DailyRecommendation {
                    day,
                    result: self.recommend(roster, day).rebased(offset),
                }
            })
            .collect();

        let upcoming_announcements = upcoming_announcements(roster, start, days);
        let note = announcement_note(&upcoming_announcements);

        WeeklyPlan {
            start_day: start,
            recommendations,
            upcoming_announcements,
            note,
        }
    }
}

/// Schools still awaiting results whose result day falls in `[start, start + days - 1]`.
pub fn upcoming_announcements(
    roster: &Roster,
    start: DayIndex,
    days: u32,
) -> Vec<UpcomingAnnouncement> {
    if days == 0 {
        return Vec::new();
    }
    let end = start.offset(days - 1);

    roster
        .iter()
        .filter(|state| state.pass_status() == PassStatus::NotAnnounced)
        .filter(|state| {
            let result_day = state.school().calendar().result_day();
            start <= result_day && result_day <= end
        })
        .map(|state| UpcomingAnnouncement {
            school_id: state.id(),
            school_name: state.school().name().to_string(),
            result_day: state.school().calendar().result_day(),
        })
        .collect()
}

fn announcement_note(upcoming: &[UpcomingAnnouncement]) -> String {
    if upcoming.is_empty() {
        return "No result announcements are expected in this window.".to_string();
    }

    let schedule = upcoming
        .iter()
        .map(|announcement| format!("{} (day {})", announcement.school_name, announcement.result_day))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Results are due for {schedule}; these recommendations assume no new results and may change once they are announced."
    )
}
