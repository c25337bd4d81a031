//! Payment advice for an applicant holding admissions at several schools.
//!
//! Raw records are validated into a [`Roster`], missed deadlines are enforced, and the
//! payment predicates rank what (if anything) should be paid on a given day.

pub mod config;
pub mod deadlines;
pub mod decision;
pub mod domain;
pub mod intake;
pub mod recommend;
pub mod router;
pub mod rpc;
pub mod service;
pub mod storage;
pub mod viability;
pub mod weekly;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, TopChoicePolicy};
pub use decision::{
    can_pay_enrollment_fee, can_pay_tuition, should_pay_enrollment_fee, should_pay_tuition,
    PaymentTrigger,
};
pub use domain::{
    AdmissionCalendar, Amount, Constraint, DayIndex, Fees, PassStatus, PaymentAction,
    PaymentStatus, Priority, Recommendation, Roster, School, SchoolId, SchoolState,
    NO_ACTION_URGENCY,
};
pub use intake::{
    validate_roster, validate_window_roster, SchoolRecord, StateRecord, ValidationError,
};
pub use recommend::{AdvisorEngine, RecommendationSet};
pub use router::advisor_router;
pub use rpc::{dispatch, handle_body, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use service::{AdvisorError, AdvisorService, RecommendationRequest, WeeklyRequest};
pub use storage::{RosterFile, RosterStore, StorageError, ROSTER_FILE};
pub use weekly::{DailyRecommendation, UpcomingAnnouncement, WeeklyPlan};
