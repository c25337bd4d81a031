use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar day expressed as a comparable integer.
///
/// Callers may use a running day count or a `YYYYMMDD` style number; the engine only
/// relies on numeric ordering and on the difference between two days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayIndex(i64);

impl DayIndex {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn offset(self, days: u32) -> Self {
        Self(self.0.saturating_add(i64::from(days)))
    }

    /// Days from `self` until `later`, clamped at zero.
    pub fn days_until(self, later: DayIndex) -> u32 {
        let distance = later.0.saturating_sub(self.0).max(0);
        u32::try_from(distance).unwrap_or(u32::MAX)
    }

    /// Running day count (days since 0001-01-01) for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(i64::from(date.num_days_from_ce()))
    }

    pub fn to_date(self) -> Option<NaiveDate> {
        i32::try_from(self.0)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for a school in the applicant's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(pub u64);

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named invariant of the domain model, reported when a raw record breaks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    PriorityPositive,
    EnrollmentFeePositive,
    TuitionPositive,
    TuitionExceedsEnrollmentFee,
    ResultNotBeforeExam,
    FeeDeadlineNotBeforeResult,
    TuitionDeadlineNotBeforeFeeDeadline,
    TuitionPaidRequiresEnrollmentFee,
}

impl Constraint {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriorityPositive => "priority must be positive",
            Self::EnrollmentFeePositive => "enrollment fee must be positive",
            Self::TuitionPositive => "tuition must be positive",
            Self::TuitionExceedsEnrollmentFee => "tuition must exceed the enrollment fee",
            Self::ResultNotBeforeExam => "result day must not precede the exam day",
            Self::FeeDeadlineNotBeforeResult => {
                "enrollment fee deadline must not precede the result day"
            }
            Self::TuitionDeadlineNotBeforeFeeDeadline => {
                "tuition deadline must not precede the enrollment fee deadline"
            }
            Self::TuitionPaidRequiresEnrollmentFee => {
                "tuition cannot be paid before the enrollment fee"
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Positive money value in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub fn new(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().filter(|value| *value > 0).map(Self)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Preference rank; 1 is the most preferred school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(u32);

impl Priority {
    pub fn new(raw: i64) -> Result<Self, Constraint> {
        u32::try_from(raw)
            .ok()
            .filter(|rank| *rank > 0)
            .map(Self)
            .ok_or(Constraint::PriorityPositive)
    }

    pub const fn rank(self) -> u32 {
        self.0
    }

    /// Lower rank numbers are preferred.
    pub fn outranks(self, other: Priority) -> bool {
        self.0 < other.0
    }
}

/// Enrollment fee and tuition, with tuition strictly larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    enrollment_fee: Amount,
    tuition: Amount,
}

impl Fees {
    pub fn new(enrollment_fee: i64, tuition: i64) -> Result<Self, Constraint> {
        let enrollment_fee = Amount::new(enrollment_fee).ok_or(Constraint::EnrollmentFeePositive)?;
        let tuition = Amount::new(tuition).ok_or(Constraint::TuitionPositive)?;
        if tuition <= enrollment_fee {
            return Err(Constraint::TuitionExceedsEnrollmentFee);
        }
        Ok(Self {
            enrollment_fee,
            tuition,
        })
    }

    pub fn enrollment_fee(&self) -> Amount {
        self.enrollment_fee
    }

    pub fn tuition(&self) -> Amount {
        self.tuition
    }
}

/// Ordered key dates of one admission: exam, result, fee deadline, tuition deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionCalendar {
    exam_day: DayIndex,
    result_day: DayIndex,
    enrollment_fee_deadline: DayIndex,
    tuition_deadline: DayIndex,
}

impl AdmissionCalendar {
    pub fn new(
        exam_day: DayIndex,
        result_day: DayIndex,
        enrollment_fee_deadline: DayIndex,
        tuition_deadline: DayIndex,
    ) -> Result<Self, Constraint> {
        if result_day < exam_day {
            return Err(Constraint::ResultNotBeforeExam);
        }
        if enrollment_fee_deadline < result_day {
            return Err(Constraint::FeeDeadlineNotBeforeResult);
        }
        if tuition_deadline < enrollment_fee_deadline {
            return Err(Constraint::TuitionDeadlineNotBeforeFeeDeadline);
        }
        Ok(Self {
            exam_day,
            result_day,
            enrollment_fee_deadline,
            tuition_deadline,
        })
    }

    pub fn exam_day(&self) -> DayIndex {
        self.exam_day
    }

    pub fn result_day(&self) -> DayIndex {
        self.result_day
    }

    pub fn enrollment_fee_deadline(&self) -> DayIndex {
        self.enrollment_fee_deadline
    }

    pub fn tuition_deadline(&self) -> DayIndex {
        self.tuition_deadline
    }
}

/// Static admission terms for one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    id: SchoolId,
    name: String,
    priority: Priority,
    #[serde(flatten)]
    fees: Fees,
    #[serde(flatten)]
    calendar: AdmissionCalendar,
}

impl School {
    /// Assemble a school from parts whose invariants were already checked.
    pub fn new(
        id: SchoolId,
        name: impl Into<String>,
        priority: Priority,
        fees: Fees,
        calendar: AdmissionCalendar,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            fees,
            calendar,
        }
    }

    pub fn id(&self) -> SchoolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn fees(&self) -> Fees {
        self.fees
    }

    pub fn calendar(&self) -> AdmissionCalendar {
        self.calendar
    }

    pub fn enrollment_fee_deadline(&self) -> DayIndex {
        self.calendar.enrollment_fee_deadline
    }

    pub fn tuition_deadline(&self) -> DayIndex {
        self.calendar.tuition_deadline
    }
}

/// Admission outcome as declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassStatus {
    NotAnnounced,
    Passed,
    Failed,
    Cancelled,
}

impl PassStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAnnounced => "notAnnounced",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses wire labels, tolerating case and `_`/`-` separators.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "notannounced" => Some(Self::NotAnnounced),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Failed | Self::Cancelled => true,
            Self::NotAnnounced | Self::Passed => false,
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment progress for one school; tuition is never paid ahead of the enrollment fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    enrollment_fee_paid: bool,
    tuition_paid: bool,
}

impl PaymentStatus {
    pub fn new(enrollment_fee_paid: bool, tuition_paid: bool) -> Result<Self, Constraint> {
        if tuition_paid && !enrollment_fee_paid {
            return Err(Constraint::TuitionPaidRequiresEnrollmentFee);
        }
        Ok(Self {
            enrollment_fee_paid,
            tuition_paid,
        })
    }

    pub const fn unpaid() -> Self {
        Self {
            enrollment_fee_paid: false,
            tuition_paid: false,
        }
    }

    pub fn enrollment_fee_paid(&self) -> bool {
        self.enrollment_fee_paid
    }

    pub fn tuition_paid(&self) -> bool {
        self.tuition_paid
    }

    /// Both payments made; the admission is final.
    pub fn is_settled(&self) -> bool {
        self.enrollment_fee_paid && self.tuition_paid
    }

    pub fn with_enrollment_fee_paid(self) -> Self {
        Self {
            enrollment_fee_paid: true,
            ..self
        }
    }

    pub fn with_tuition_paid(self) -> Result<Self, Constraint> {
        Self::new(self.enrollment_fee_paid, true)
    }
}

/// One school's current situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolState {
    school: School,
    pass_status: PassStatus,
    payment: PaymentStatus,
}

impl SchoolState {
    pub fn new(school: School, pass_status: PassStatus, payment: PaymentStatus) -> Self {
        Self {
            school,
            pass_status,
            payment,
        }
    }

    pub fn school(&self) -> &School {
        &self.school
    }

    pub fn pass_status(&self) -> PassStatus {
        self.pass_status
    }

    pub fn payment(&self) -> PaymentStatus {
        self.payment
    }

    pub fn id(&self) -> SchoolId {
        self.school.id
    }

    pub fn priority(&self) -> Priority {
        self.school.priority
    }

    pub fn is_passed(&self) -> bool {
        self.pass_status == PassStatus::Passed
    }

    pub(crate) fn cancelled(&self) -> Self {
        Self {
            pass_status: PassStatus::Cancelled,
            ..self.clone()
        }
    }

    /// Record that the applicant carried out `action` for this school.
    ///
    /// Actions addressed to other schools, and `DoNothing`, leave the state untouched.
    pub fn apply(&self, action: &PaymentAction) -> Result<Self, Constraint> {
        let payment = match action {
            PaymentAction::PayEnrollmentFee { school_id } if *school_id == self.id() => {
                self.payment.with_enrollment_fee_paid()
            }
            PaymentAction::PayTuition { school_id } if *school_id == self.id() => {
                self.payment.with_tuition_paid()?
            }
            PaymentAction::PayEnrollmentFee { .. }
            | PaymentAction::PayTuition { .. }
            | PaymentAction::DoNothing => self.payment,
        };
        Ok(Self {
            payment,
            ..self.clone()
        })
    }
}

/// Validated set of school states with unique identifiers, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    states: Vec<SchoolState>,
}

impl Roster {
    pub(crate) fn from_states(states: Vec<SchoolState>) -> Self {
        Self { states }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchoolState> {
        self.states.iter()
    }

    pub fn get(&self, id: SchoolId) -> Option<&SchoolState> {
        self.states.iter().find(|state| state.id() == id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Roster after the applicant carried out `action`.
    pub fn apply(&self, action: &PaymentAction) -> Result<Self, Constraint> {
        let states = self
            .states
            .iter()
            .map(|state| state.apply(action))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { states })
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a SchoolState;
    type IntoIter = std::slice::Iter<'a, SchoolState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// Single payment the advisor can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PaymentAction {
    PayEnrollmentFee {
        #[serde(rename = "schoolId")]
        school_id: SchoolId,
    },
    PayTuition {
        #[serde(rename = "schoolId")]
        school_id: SchoolId,
    },
    DoNothing,
}

impl PaymentAction {
    pub fn school_id(&self) -> Option<SchoolId> {
        match self {
            Self::PayEnrollmentFee { school_id } | Self::PayTuition { school_id } => {
                Some(*school_id)
            }
            Self::DoNothing => None,
        }
    }
}

/// Urgency reported when there is nothing to pay; larger than any real deadline distance.
pub const NO_ACTION_URGENCY: u32 = u32::MAX;

/// One actionable suggestion with the number of days left before it must happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: PaymentAction,
    pub reason: String,
    pub urgency: u32,
}

impl Recommendation {
    pub fn do_nothing() -> Self {
        Self {
            action: PaymentAction::DoNothing,
            reason: "No payment is needed right now.".to_string(),
            urgency: NO_ACTION_URGENCY,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.action != PaymentAction::DoNothing
    }
}
