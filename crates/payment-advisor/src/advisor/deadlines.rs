use tracing::debug;

use super::domain::{DayIndex, PassStatus, Roster, SchoolState};

/// Why a passed admission was cancelled by the deadline rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissedDeadline {
    EnrollmentFee,
    Tuition,
}

/// Returns the deadline a passed school has missed on `today`, if any.
pub fn missed_deadline(state: &SchoolState, today: DayIndex) -> Option<MissedDeadline> {
    match state.pass_status() {
        PassStatus::Passed => {
            let school = state.school();
            let payment = state.payment();
            if today > school.enrollment_fee_deadline() && !payment.enrollment_fee_paid() {
                Some(MissedDeadline::EnrollmentFee)
            } else if today > school.tuition_deadline() && !payment.tuition_paid() {
                Some(MissedDeadline::Tuition)
            } else {
                None
            }
        }
        PassStatus::NotAnnounced | PassStatus::Failed | PassStatus::Cancelled => None,
    }
}

/// Cancel a passed admission whose payment deadline went by unpaid.
pub fn enforce_deadline(state: &SchoolState, today: DayIndex) -> SchoolState {
    match missed_deadline(state, today) {
        Some(missed) => {
            debug!(
                school = state.school().name(),
                ?missed,
                %today,
                "admission cancelled after missed payment deadline"
            );
            state.cancelled()
        }
        None => state.clone(),
    }
}

/// Apply the deadline rule to every school independently.
pub fn enforce_deadlines(roster: &Roster, today: DayIndex) -> Roster {
    Roster::from_states(
        roster
            .iter()
            .map(|state| enforce_deadline(state, today))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::domain::{PaymentStatus, SchoolId};
    use crate::advisor::tests::common::{school, state};

    #[test]
    fn unpaid_fee_after_deadline_cancels() {
        let passed = state(school(1, 1, 10, 20), PassStatus::Passed, PaymentStatus::unpaid());

        let updated = enforce_deadline(&passed, DayIndex::new(11));

        assert_eq!(updated.pass_status(), PassStatus::Cancelled);
        assert_eq!(
            missed_deadline(&passed, DayIndex::new(11)),
            Some(MissedDeadline::EnrollmentFee)
        );
    }

    #[test]
    fn unpaid_tuition_after_deadline_cancels() {
        let fee_paid = PaymentStatus::new(true, false).expect("valid payment");
        let passed = state(school(1, 1, 10, 20), PassStatus::Passed, fee_paid);

        assert_eq!(
            enforce_deadline(&passed, DayIndex::new(20)).pass_status(),
            PassStatus::Passed
        );
        assert_eq!(
            missed_deadline(&passed, DayIndex::new(21)),
            Some(MissedDeadline::Tuition)
        );
    }

    #[test]
    fn deadline_day_itself_keeps_admission() {
        let passed = state(school(1, 1, 10, 20), PassStatus::Passed, PaymentStatus::unpaid());

        let updated = enforce_deadline(&passed, DayIndex::new(10));

        assert_eq!(updated.pass_status(), PassStatus::Passed);
    }

    #[test]
    fn non_passed_states_are_untouched() {
        for status in [
            PassStatus::NotAnnounced,
            PassStatus::Failed,
            PassStatus::Cancelled,
        ] {
            let original = state(school(1, 1, 10, 20), status, PaymentStatus::unpaid());
            assert_eq!(enforce_deadline(&original, DayIndex::new(99)), original);
        }
    }

    #[test]
    fn roster_is_updated_per_school() {
        let roster = Roster::from_states(vec![
            state(school(1, 1, 5, 8), PassStatus::Passed, PaymentStatus::unpaid()),
            state(school(2, 2, 10, 12), PassStatus::Passed, PaymentStatus::unpaid()),
        ]);

        let updated = enforce_deadlines(&roster, DayIndex::new(6));

        let first = updated.get(SchoolId(1)).expect("school 1 present");
        let second = updated.get(SchoolId(2)).expect("school 2 present");
        assert_eq!(first.pass_status(), PassStatus::Cancelled);
        assert_eq!(second.pass_status(), PassStatus::Passed);
    }
}
