use crate::infra::{load_roster, parse_date, resolve_day, roster_store};
use chrono::{Datelike, NaiveDate};
use clap::Args;
use payment_advisor::advisor::{
    AdvisorService, DayIndex, PaymentAction, Recommendation, RecommendationRequest,
    RecommendationSet, RosterFile, SchoolId, SchoolRecord, StateRecord, WeeklyPlan,
    WeeklyRequest,
};
use payment_advisor::config::AppConfig;
use payment_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Roster file with `schools` and `states`
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date, conflicts_with = "day")]
    pub(crate) today: Option<NaiveDate>,
    /// Evaluation day as a raw day number, for rosters not keyed by calendar date
    #[arg(long)]
    pub(crate) day: Option<i64>,
    /// Print the JSON payload instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WeeklyArgs {
    /// Roster file with `schools` and `states`
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// First day of the window (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date, conflicts_with = "start_day")]
    pub(crate) start: Option<NaiveDate>,
    /// First day of the window as a raw day number
    #[arg(long)]
    pub(crate) start_day: Option<i64>,
    /// Window length in days (defaults to the configured window)
    #[arg(long)]
    pub(crate) days: Option<u32>,
    /// Print the JSON payload instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Save the sample roster to this file for use with `recommend` and `weekly`
    #[arg(long)]
    pub(crate) write: Option<PathBuf>,
}

fn advisor_service() -> Result<AdvisorService, AppError> {
    let config = AppConfig::load()?;
    Ok(AdvisorService::new(config.advisor))
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        data,
        today,
        day,
        json,
    } = args;

    let roster = load_roster(&data)?;
    let request = RecommendationRequest {
        today: resolve_day(today, day),
        schools: roster.schools,
        states: roster.states,
    };
    let result = advisor_service()?.recommend(&request)?;

    if json {
        println!("{}", to_pretty_json(&result)?);
    } else {
        render_recommendations(&request.schools, request.today, &result);
    }
    Ok(())
}

pub(crate) fn run_weekly(args: WeeklyArgs) -> Result<(), AppError> {
    let WeeklyArgs {
        data,
        start,
        start_day,
        days,
        json,
    } = args;

    let roster = load_roster(&data)?;
    let request = WeeklyRequest {
        start_day: resolve_day(start, start_day),
        days,
        schools: roster.schools,
        states: roster.states,
    };
    let plan = advisor_service()?.weekly(&request)?;

    if json {
        println!("{}", to_pretty_json(&plan)?);
    } else {
        render_weekly_plan(&request.schools, &plan);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, write } = args;
    let today = resolve_day(today, None);
    let roster = sample_roster(today);
    let service = AdvisorService::default();

    println!("School payment advisor demo");
    println!("Applications on file:");
    for school in &roster.schools {
        let status = roster
            .states
            .iter()
            .find(|state| state.school_id == school.id)
            .map(|state| state.pass_status.as_str())
            .unwrap_or("notAnnounced");
        println!(
            "  - #{} {} (priority {}): {} | fee {} due {} | tuition {} due {}",
            school.id.0,
            school.name,
            school.priority,
            status,
            school.enrollment_fee,
            describe_day(school.enrollment_fee_deadline),
            school.tuition,
            describe_day(school.tuition_deadline),
        );
    }

    let request = RecommendationRequest {
        today,
        schools: roster.schools.clone(),
        states: roster.states.clone(),
    };
    let result = service.recommend(&request)?;
    println!();
    render_recommendations(&roster.schools, today, &result);

    let plan = service.weekly(&WeeklyRequest {
        start_day: today,
        days: None,
        schools: roster.schools.clone(),
        states: roster.states.clone(),
    })?;
    println!();
    render_weekly_plan(&roster.schools, &plan);

    if let Some(path) = write {
        let (store, file) = roster_store(&path);
        store.save(&file, &roster)?;
        println!("\nSample roster saved to {}", path.display());
    }

    Ok(())
}

/// Three applications around `today`: a failed top choice, a second choice still
/// awaiting results, and a passed fallback whose fee falls due within the week.
pub(crate) fn sample_roster(today: DayIndex) -> RosterFile {
    let day = |offset: i64| DayIndex::new(today.value() + offset);
    let school = |id: u64, name: &str, priority: i64, result: i64, fee_due: i64| SchoolRecord {
        id: SchoolId(id),
        name: name.to_string(),
        priority,
        exam_day: day(result - 14),
        result_day: day(result),
        enrollment_fee_deadline: day(fee_due),
        tuition_deadline: day(fee_due + 21),
        enrollment_fee: 282_000,
        tuition: 1_240_000,
    };
    let state = |id: u64, status: &str| StateRecord {
        school_id: SchoolId(id),
        pass_status: status.to_string(),
        enrollment_fee_paid: false,
        tuition_paid: false,
    };

    RosterFile {
        schools: vec![
            school(1, "Lakeside Conservatory", 1, -4, 3),
            school(2, "Harbor Institute", 2, 2, 9),
            school(3, "Valley College", 3, -3, 4),
        ],
        states: vec![
            state(1, "failed"),
            state(2, "notAnnounced"),
            state(3, "passed"),
        ],
    }
}

fn render_recommendations(schools: &[SchoolRecord], today: DayIndex, result: &RecommendationSet) {
    println!("Recommendation for {}", describe_day(today));
    if result.all_recommendations.is_empty() {
        println!("- {}", result.top.reason);
        return;
    }
    for recommendation in &result.all_recommendations {
        println!("- {}", describe_recommendation(schools, recommendation));
    }
}

fn render_weekly_plan(schools: &[SchoolRecord], plan: &WeeklyPlan) {
    println!(
        "Outlook for {} days from {}",
        plan.recommendations.len(),
        describe_day(plan.start_day)
    );
    for daily in &plan.recommendations {
        let summary = if daily.result.top.action == PaymentAction::DoNothing {
            "nothing to pay".to_string()
        } else {
            describe_recommendation(schools, &daily.result.top)
        };
        println!("  {}: {}", describe_day(daily.day), summary);
    }
    for announcement in &plan.upcoming_announcements {
        println!(
            "  * results for {} expected {}",
            announcement.school_name,
            describe_day(announcement.result_day)
        );
    }
    println!("Note: {}", plan.note);
}

fn describe_recommendation(schools: &[SchoolRecord], recommendation: &Recommendation) -> String {
    let name = |id: SchoolId| {
        schools
            .iter()
            .find(|school| school.id == id)
            .map(|school| school.name.clone())
            .unwrap_or_else(|| format!("school {}", id.0))
    };
    let action = match recommendation.action {
        PaymentAction::PayEnrollmentFee { school_id } => {
            format!("pay enrollment fee for {}", name(school_id))
        }
        PaymentAction::PayTuition { school_id } => format!("pay tuition for {}", name(school_id)),
        PaymentAction::DoNothing => "do nothing".to_string(),
    };
    format!(
        "{action} (urgency {}): {}",
        recommendation.urgency, recommendation.reason
    )
}

/// Calendar date when the day number looks like a running day count, raw number otherwise.
fn describe_day(day: DayIndex) -> String {
    match day.to_date() {
        Some(date) if date.year() >= 1970 => date.format("%Y-%m-%d").to_string(),
        _ => format!("day {day}"),
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
