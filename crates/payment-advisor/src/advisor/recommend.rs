use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::EngineConfig;
use super::deadlines::enforce_deadlines;
use super::decision::{enrollment_fee_trigger, tuition_trigger, PaymentTrigger};
use super::domain::{DayIndex, PaymentAction, Recommendation, Roster, SchoolState};

/// Ranked recommendations for one day; `top` is the most urgent entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    #[serde(flatten)]
    pub top: Recommendation,
    pub all_recommendations: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn from_ranked(all_recommendations: Vec<Recommendation>) -> Self {
        let top = all_recommendations
            .first()
            .cloned()
            .unwrap_or_else(Recommendation::do_nothing);
        Self {
            top,
            all_recommendations,
        }
    }

    /// Shift every real urgency by `days`; the no-action sentinel is left alone.
    pub(crate) fn rebased(mut self, days: u32) -> Self {
        for recommendation in self
            .all_recommendations
            .iter_mut()
            .chain(std::iter::once(&mut self.top))
        {
            if recommendation.is_actionable() {
                recommendation.urgency = recommendation.urgency.saturating_add(days);
            }
        }
        self
    }
}

/// Stateless engine applying deadline enforcement and the payment predicates.
#[derive(Debug, Clone, Default)]
pub struct AdvisorEngine {
    config: EngineConfig,
}

impl AdvisorEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommendations for `today`, computed on the deadline-enforced roster.
    pub fn recommend(&self, roster: &Roster, today: DayIndex) -> RecommendationSet {
        let enforced = enforce_deadlines(roster, today);

        let mut recommendations: Vec<Recommendation> = enforced
            .iter()
            .filter_map(|state| self.recommend_for(&enforced, state, today))
            .collect();
        recommendations.sort_by_key(|recommendation| recommendation.urgency);

        trace!(%today, count = recommendations.len(), "ranked recommendations");
        RecommendationSet::from_ranked(recommendations)
    }

    /// The fee is always considered before tuition for the same school.
    pub fn recommend_for(
        &self,
        roster: &Roster,
        target: &SchoolState,
        today: DayIndex,
    ) -> Option<Recommendation> {
        let school = target.school();

        if let Some(trigger) =
            enrollment_fee_trigger(roster, target, today, self.config.top_choice)
        {
            let deadline = school.enrollment_fee_deadline();
            return Some(Recommendation {
                action: PaymentAction::PayEnrollmentFee {
                    school_id: school.id(),
                },
                reason: fee_reason(target, trigger, today.days_until(deadline)),
                urgency: today.days_until(deadline),
            });
        }

        tuition_trigger(roster, target, today).map(|trigger| {
            let deadline = school.tuition_deadline();
            Recommendation {
                action: PaymentAction::PayTuition {
                    school_id: school.id(),
                },
                reason: tuition_reason(target, trigger, today.days_until(deadline)),
                urgency: today.days_until(deadline),
            }
        })
    }
}

fn fee_reason(target: &SchoolState, trigger: PaymentTrigger, days_left: u32) -> String {
    let school = target.school();
    let amount = school.fees().enrollment_fee().value();
    match trigger {
        PaymentTrigger::DeadlineToday => format!(
            "Enrollment fee deadline for {} is today; pay {amount} now or lose the admission.",
            school.name()
        ),
        PaymentTrigger::TopChoiceSecured => format!(
            "Top choice {} is secured; pay the enrollment fee of {amount} ({days_left} day(s) left).",
            school.name()
        ),
        PaymentTrigger::HigherSchoolsResolved => format!(
            "All higher-priority schools are resolved; pay the {} enrollment fee of {amount} ({days_left} day(s) left).",
            school.name()
        ),
    }
}

fn tuition_reason(target: &SchoolState, trigger: PaymentTrigger, days_left: u32) -> String {
    let school = target.school();
    let amount = school.fees().tuition().value();
    match trigger {
        PaymentTrigger::DeadlineToday => format!(
            "Tuition deadline for {} is today; pay {amount} now to keep the admission.",
            school.name()
        ),
        PaymentTrigger::TopChoiceSecured => format!(
            "Top choice {} is secured; pay tuition of {amount} ({days_left} day(s) left).",
            school.name()
        ),
        PaymentTrigger::HigherSchoolsResolved => format!(
            "Every higher-priority school has failed or been cancelled; pay {} tuition of {amount} ({days_left} day(s) left).",
            school.name()
        ),
    }
}
