use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::EngineConfig;
use super::domain::DayIndex;
use super::intake::{
    validate_roster, validate_window_roster, SchoolRecord, StateRecord, ValidationError,
};
use super::recommend::{AdvisorEngine, RecommendationSet};
use super::weekly::WeeklyPlan;

/// Parameters of a single-day recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub today: DayIndex,
    pub schools: Vec<SchoolRecord>,
    #[serde(default)]
    pub states: Vec<StateRecord>,
}

/// Parameters of a multi-day projection; `days` falls back to the configured window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRequest {
    pub start_day: DayIndex,
    #[serde(default)]
    pub days: Option<u32>,
    pub schools: Vec<SchoolRecord>,
    #[serde(default)]
    pub states: Vec<StateRecord>,
}

/// Error raised by the advisor service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("projection window must cover at least one day")]
    EmptyWindow,
    #[error("projection window of {requested} days exceeds the maximum of {max}")]
    WindowTooLong { requested: u32, max: u32 },
}

/// Service composing roster validation with the engine.
#[derive(Debug, Clone)]
pub struct AdvisorService {
    engine: Arc<AdvisorEngine>,
}

impl Default for AdvisorService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AdvisorService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Arc::new(AdvisorEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &AdvisorEngine {
        &self.engine
    }

    /// Validate the roster against `today` and rank today's payments.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationSet, AdvisorError> {
        info!(
            today = %request.today,
            schools = request.schools.len(),
            "computing recommendation"
        );

        let roster = validate_roster(&request.schools, &request.states, request.today)
            .inspect_err(|err| warn!(error = %err, "roster rejected"))?;

        Ok(self.engine.recommend(&roster, request.today))
    }

    /// Validate the roster against the start day and project the window.
    pub fn weekly(&self, request: &WeeklyRequest) -> Result<WeeklyPlan, AdvisorError> {
        let config = self.engine.config();
        let days = request.days.unwrap_or(config.default_window_days);
        info!(
            start_day = %request.start_day,
            days,
            schools = request.schools.len(),
            "projecting weekly recommendations"
        );

        if days == 0 {
            return Err(AdvisorError::EmptyWindow);
        }
        if days > config.max_window_days {
            return Err(AdvisorError::WindowTooLong {
                requested: days,
                max: config.max_window_days,
            });
        }

        let roster = validate_window_roster(&request.schools, &request.states, request.start_day)
            .inspect_err(|err| warn!(error = %err, "roster rejected"))?;

        Ok(self.engine.project(&roster, request.start_day, days))
    }
}
