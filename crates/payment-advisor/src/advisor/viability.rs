//! Priority-relative questions asked about the roster on a given day.

use super::domain::{DayIndex, PassStatus, Roster, SchoolState};

/// A passed school whose enrollment-fee door is still open.
pub fn is_viable(state: &SchoolState, today: DayIndex) -> bool {
    state.is_passed()
        && (state.payment().enrollment_fee_paid()
            || today <= state.school().enrollment_fee_deadline())
}

/// Schools the applicant prefers over `target`.
pub fn higher_priority<'a>(
    roster: &'a Roster,
    target: &'a SchoolState,
) -> impl Iterator<Item = &'a SchoolState> + 'a {
    roster
        .iter()
        .filter(move |state| state.priority().outranks(target.priority()))
}

pub fn has_higher_priority(roster: &Roster, target: &SchoolState) -> bool {
    higher_priority(roster, target).next().is_some()
}

pub fn higher_priority_viable_exists(
    roster: &Roster,
    target: &SchoolState,
    today: DayIndex,
) -> bool {
    higher_priority(roster, target).any(|state| is_viable(state, today))
}

/// A preferred school that can no longer compete with `target`.
fn is_gone(state: &SchoolState, today: DayIndex) -> bool {
    match state.pass_status() {
        PassStatus::Failed | PassStatus::Cancelled => true,
        PassStatus::Passed => {
            let payment = state.payment();
            payment.tuition_paid()
                || (!payment.enrollment_fee_paid()
                    && today > state.school().enrollment_fee_deadline())
        }
        PassStatus::NotAnnounced => false,
    }
}

/// Every preferred school failed, was cancelled, is settled, or is unrecoverable.
pub fn all_higher_gone(roster: &Roster, target: &SchoolState, today: DayIndex) -> bool {
    higher_priority(roster, target).all(|state| is_gone(state, today))
}

/// Every preferred school failed or was cancelled.
pub fn all_higher_closed(roster: &Roster, target: &SchoolState) -> bool {
    higher_priority(roster, target).all(|state| state.pass_status().is_terminal())
}
