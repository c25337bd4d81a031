use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    AdmissionCalendar, Constraint, DayIndex, Fees, PassStatus, PaymentStatus, Priority, Roster,
    School, SchoolId, SchoolState,
};

/// Untrusted school terms as supplied by the caller.
///
/// Numbers stay signed so that non-positive values reach validation instead of failing
/// deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub name: String,
    pub priority: i64,
    pub exam_day: DayIndex,
    pub result_day: DayIndex,
    pub enrollment_fee_deadline: DayIndex,
    pub tuition_deadline: DayIndex,
    pub enrollment_fee: i64,
    pub tuition: i64,
}

/// Untrusted outcome and payment flags for one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub school_id: SchoolId,
    #[serde(default = "not_announced_label")]
    pub pass_status: String,
    #[serde(default)]
    pub enrollment_fee_paid: bool,
    #[serde(default)]
    pub tuition_paid: bool,
}

fn not_announced_label() -> String {
    PassStatus::NotAnnounced.label().to_string()
}

/// Validation errors raised while turning raw records into a roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("school '{school}': {constraint}")]
    Constraint {
        school: String,
        constraint: Constraint,
    },
    #[error("school '{school}': unknown pass status '{label}'")]
    UnknownStatus { school: String, label: String },
    #[error(
        "school '{school}': status {status} declared on day {today}, before result day {result_day}"
    )]
    OutcomeBeforeResult {
        school: String,
        status: PassStatus,
        result_day: DayIndex,
        today: DayIndex,
    },
    #[error(
        "school '{school}': result day {result_day} has passed (day {today}) but no outcome is declared"
    )]
    MissingOutcome {
        school: String,
        result_day: DayIndex,
        today: DayIndex,
    },
    #[error("school id {id} appears more than once")]
    DuplicateSchool { id: SchoolId },
    #[error("school '{school}' has more than one state record")]
    DuplicateState { school: String },
    #[error("state record references unknown school id {id}")]
    UnknownSchool { id: SchoolId },
}

impl ValidationError {
    fn constraint(record: &SchoolRecord, constraint: Constraint) -> Self {
        Self::Constraint {
            school: record.name.clone(),
            constraint,
        }
    }
}

/// Build a school from raw terms, reporting the first broken invariant.
pub fn validate_school(record: &SchoolRecord) -> Result<School, ValidationError> {
    let priority =
        Priority::new(record.priority).map_err(|c| ValidationError::constraint(record, c))?;
    let fees = Fees::new(record.enrollment_fee, record.tuition)
        .map_err(|c| ValidationError::constraint(record, c))?;
    let calendar = AdmissionCalendar::new(
        record.exam_day,
        record.result_day,
        record.enrollment_fee_deadline,
        record.tuition_deadline,
    )
    .map_err(|c| ValidationError::constraint(record, c))?;

    Ok(School::new(
        record.id,
        record.name.clone(),
        priority,
        fees,
        calendar,
    ))
}

/// How a result day equal to the evaluation day is read for a school still awaiting
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultDayCutoff {
    /// Results are out on the result day itself; an undeclared outcome is an error.
    Announced,
    /// The result day opens a projection window; the outcome may still be pending.
    Pending,
}

/// Build one school state, checking the declared outcome against `today`.
pub fn validate_school_state(
    record: &SchoolRecord,
    state: Option<&StateRecord>,
    today: DayIndex,
) -> Result<SchoolState, ValidationError> {
    validate_school_state_with(record, state, today, ResultDayCutoff::Announced)
}

fn validate_school_state_with(
    record: &SchoolRecord,
    state: Option<&StateRecord>,
    today: DayIndex,
    cutoff: ResultDayCutoff,
) -> Result<SchoolState, ValidationError> {
    let school = validate_school(record)?;

    let (pass_status, payment) = match state {
        None => (PassStatus::NotAnnounced, PaymentStatus::unpaid()),
        Some(state) => {
            let pass_status = PassStatus::from_label(&state.pass_status).ok_or_else(|| {
                ValidationError::UnknownStatus {
                    school: record.name.clone(),
                    label: state.pass_status.clone(),
                }
            })?;
            let payment = PaymentStatus::new(state.enrollment_fee_paid, state.tuition_paid)
                .map_err(|c| ValidationError::constraint(record, c))?;
            (pass_status, payment)
        }
    };

    let result_day = school.calendar().result_day();
    let outcome_due = match cutoff {
        ResultDayCutoff::Announced => today >= result_day,
        ResultDayCutoff::Pending => today > result_day,
    };
    match pass_status {
        PassStatus::Passed | PassStatus::Failed if today < result_day => {
            return Err(ValidationError::OutcomeBeforeResult {
                school: record.name.clone(),
                status: pass_status,
                result_day,
                today,
            });
        }
        PassStatus::NotAnnounced if outcome_due => {
            return Err(ValidationError::MissingOutcome {
                school: record.name.clone(),
                result_day,
                today,
            });
        }
        PassStatus::NotAnnounced
        | PassStatus::Passed
        | PassStatus::Failed
        | PassStatus::Cancelled => {}
    }

    Ok(SchoolState::new(school, pass_status, payment))
}

/// Validate a whole roster; the first invalid record aborts the evaluation.
pub fn validate_roster(
    schools: &[SchoolRecord],
    states: &[StateRecord],
    today: DayIndex,
) -> Result<Roster, ValidationError> {
    validate_roster_with(schools, states, today, ResultDayCutoff::Announced)
}

/// Validate a roster for a projection starting at `start`.
///
/// A school whose result day is `start` may still be awaiting its outcome; it is then
/// reported as an upcoming announcement of the window.
pub fn validate_window_roster(
    schools: &[SchoolRecord],
    states: &[StateRecord],
    start: DayIndex,
) -> Result<Roster, ValidationError> {
    validate_roster_with(schools, states, start, ResultDayCutoff::Pending)
}

fn validate_roster_with(
    schools: &[SchoolRecord],
    states: &[StateRecord],
    today: DayIndex,
    cutoff: ResultDayCutoff,
) -> Result<Roster, ValidationError> {
    let mut seen = HashSet::with_capacity(schools.len());
    let mut validated = Vec::with_capacity(schools.len());

    for record in schools {
        if !seen.insert(record.id) {
            return Err(ValidationError::DuplicateSchool { id: record.id });
        }

        let mut matching = states.iter().filter(|state| state.school_id == record.id);
        let state = matching.next();
        if matching.next().is_some() {
            return Err(ValidationError::DuplicateState {
                school: record.name.clone(),
            });
        }

        validated.push(validate_school_state_with(record, state, today, cutoff)?);
    }

    if let Some(orphan) = states.iter().find(|state| !seen.contains(&state.school_id)) {
        return Err(ValidationError::UnknownSchool {
            id: orphan.school_id,
        });
    }

    Ok(Roster::from_states(validated))
}
