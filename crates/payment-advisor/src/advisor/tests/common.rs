use axum::response::Response;
use serde_json::Value;

use crate::advisor::domain::{
    AdmissionCalendar, DayIndex, Fees, PassStatus, PaymentStatus, Priority, Roster, School,
    SchoolId, SchoolState,
};
use crate::advisor::intake::{SchoolRecord, StateRecord};

pub(crate) const ENROLLMENT_FEE: i64 = 282_000;
pub(crate) const TUITION: i64 = 1_200_000;

/// School with exam and result on day 0 and the given payment deadlines.
pub(crate) fn school(id: u64, priority: i64, fee_deadline: i64, tuition_deadline: i64) -> School {
    School::new(
        SchoolId(id),
        format!("School {id}"),
        Priority::new(priority).expect("valid priority"),
        Fees::new(ENROLLMENT_FEE, TUITION).expect("valid fees"),
        AdmissionCalendar::new(
            DayIndex::new(0),
            DayIndex::new(0),
            DayIndex::new(fee_deadline),
            DayIndex::new(tuition_deadline),
        )
        .expect("valid calendar"),
    )
}

pub(crate) fn state(school: School, status: PassStatus, payment: PaymentStatus) -> SchoolState {
    SchoolState::new(school, status, payment)
}

pub(crate) fn passed(id: u64, priority: i64, fee_deadline: i64, tuition_deadline: i64) -> SchoolState {
    state(
        school(id, priority, fee_deadline, tuition_deadline),
        PassStatus::Passed,
        PaymentStatus::unpaid(),
    )
}

pub(crate) fn with_status(
    id: u64,
    priority: i64,
    status: PassStatus,
) -> SchoolState {
    state(school(id, priority, 30, 40), status, PaymentStatus::unpaid())
}

pub(crate) fn fee_paid() -> PaymentStatus {
    PaymentStatus::new(true, false).expect("valid payment")
}

pub(crate) fn roster(states: Vec<SchoolState>) -> Roster {
    Roster::from_states(states)
}

/// Raw record with exam on day 0 and result on day 1.
pub(crate) fn record(
    id: u64,
    name: &str,
    priority: i64,
    fee_deadline: i64,
    tuition_deadline: i64,
) -> SchoolRecord {
    SchoolRecord {
        id: SchoolId(id),
        name: name.to_string(),
        priority,
        exam_day: DayIndex::new(0),
        result_day: DayIndex::new(1),
        enrollment_fee_deadline: DayIndex::new(fee_deadline),
        tuition_deadline: DayIndex::new(tuition_deadline),
        enrollment_fee: ENROLLMENT_FEE,
        tuition: TUITION,
    }
}

pub(crate) fn state_record(id: u64, status: &str, fee: bool, tuition: bool) -> StateRecord {
    StateRecord {
        school_id: SchoolId(id),
        pass_status: status.to_string(),
        enrollment_fee_paid: fee,
        tuition_paid: tuition,
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
