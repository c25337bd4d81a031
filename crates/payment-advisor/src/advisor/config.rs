use serde::{Deserialize, Serialize};

/// How the most preferred school's enrollment fee is timed once it has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopChoicePolicy {
    /// Hold the payment until the fee deadline itself.
    #[default]
    WaitForDeadline,
    /// Pay as soon as the top choice is secured.
    PayOnSecure,
}

impl TopChoicePolicy {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wait" | "wait_for_deadline" => Some(Self::WaitForDeadline),
            "pay_on_secure" | "immediate" => Some(Self::PayOnSecure),
            _ => None,
        }
    }
}

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 31;

/// Engine settings shared by the single-day and weekly entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub top_choice: TopChoicePolicy,
    pub default_window_days: u32,
    pub max_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_choice: TopChoicePolicy::default(),
            default_window_days: DEFAULT_WINDOW_DAYS,
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}
