use serde::{Deserialize, Serialize};

use super::config::TopChoicePolicy;
use super::domain::{DayIndex, Roster, SchoolState};
use super::viability::{
    all_higher_closed, all_higher_gone, has_higher_priority, higher_priority_viable_exists,
};

/// Why a payment became due; drives the recommendation wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTrigger {
    DeadlineToday,
    TopChoiceSecured,
    HigherSchoolsResolved,
}

/// Passed, fee unpaid, and the fee deadline has not gone by.
pub fn can_pay_enrollment_fee(target: &SchoolState, today: DayIndex) -> bool {
    target.is_passed()
        && !target.payment().enrollment_fee_paid()
        && today <= target.school().enrollment_fee_deadline()
}

/// Passed, fee paid, tuition unpaid, and the tuition deadline has not gone by.
pub fn can_pay_tuition(target: &SchoolState, today: DayIndex) -> bool {
    let payment = target.payment();
    target.is_passed()
        && payment.enrollment_fee_paid()
        && !payment.tuition_paid()
        && today <= target.school().tuition_deadline()
}

pub fn enrollment_fee_trigger(
    roster: &Roster,
    target: &SchoolState,
    today: DayIndex,
    policy: TopChoicePolicy,
) -> Option<PaymentTrigger> {
    if !can_pay_enrollment_fee(target, today) {
        return None;
    }

    // A preferred school may still come through; paying now could be wasted.
    if higher_priority_viable_exists(roster, target, today) {
        return None;
    }

    if today == target.school().enrollment_fee_deadline() {
        return Some(PaymentTrigger::DeadlineToday);
    }

    if !has_higher_priority(roster, target) {
        return match policy {
            TopChoicePolicy::WaitForDeadline => None,
            TopChoicePolicy::PayOnSecure => Some(PaymentTrigger::TopChoiceSecured),
        };
    }

    if all_higher_gone(roster, target, today) {
        return Some(PaymentTrigger::HigherSchoolsResolved);
    }

    None
}

pub fn tuition_trigger(
    roster: &Roster,
    target: &SchoolState,
    today: DayIndex,
) -> Option<PaymentTrigger> {
    if !can_pay_tuition(target, today) {
        return None;
    }

    if today == target.school().tuition_deadline() {
        Some(PaymentTrigger::DeadlineToday)
    } else if !has_higher_priority(roster, target) {
        Some(PaymentTrigger::TopChoiceSecured)
    } else if all_higher_closed(roster, target) {
        Some(PaymentTrigger::HigherSchoolsResolved)
    } else {
        None
    }
}

pub fn should_pay_enrollment_fee(
    roster: &Roster,
    target: &SchoolState,
    today: DayIndex,
    policy: TopChoicePolicy,
) -> bool {
    enrollment_fee_trigger(roster, target, today, policy).is_some()
}

pub fn should_pay_tuition(roster: &Roster, target: &SchoolState, today: DayIndex) -> bool {
    tuition_trigger(roster, target, today).is_some()
}
