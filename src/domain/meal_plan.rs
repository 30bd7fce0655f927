use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::TokenUsage;

pub const MEAL_PLAN_SYSTEM_PROMPT: &str = "You are a nutrition assistant that produces structured meal plans. \
Respond with JSON that includes keys 'summary', 'meals', and 'shopping_list'.";

/// Key under which unparseable model output is preserved.
pub const RAW_PLAN_KEY: &str = "plan";

const DEFAULT_GOAL: &str = "General healthy eating";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealPlanRequest {
    pub goal: String,
    #[serde(default)]
    pub calories: Option<String>,
    #[serde(default)]
    pub restrictions: Option<String>,
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u32,
    #[serde(default)]
    pub model: Option<String>,
}

fn default_meals_per_day() -> u32 {
    3
}

impl MealPlanRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            calories: None,
            restrictions: None,
            meals_per_day: default_meals_per_day(),
            model: None,
        }
    }

    pub fn with_calories(mut self, calories: impl Into<String>) -> Self {
        self.calories = Some(calories.into());
        self
    }

    pub fn with_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.restrictions = Some(restrictions.into());
        self
    }

    pub fn with_meals_per_day(mut self, meals_per_day: u32) -> Self {
        self.meals_per_day = meals_per_day;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn calories(&self) -> Option<&str> {
        non_blank(self.calories.as_deref())
    }

    fn restrictions(&self) -> Option<&str> {
        non_blank(self.restrictions.as_deref())
    }

    /// The user message sent alongside [`MEAL_PLAN_SYSTEM_PROMPT`].
    pub fn prompt(&self) -> String {
        let goal = self.goal.trim();
        let mut parts = vec![format!(
            "Goal: {}",
            if goal.is_empty() { DEFAULT_GOAL } else { goal }
        )];
        if let Some(calories) = self.calories() {
            parts.push(format!("Target calories: {}", calories));
        }
        if let Some(restrictions) = self.restrictions() {
            parts.push(format!("Dietary preferences: {}", restrictions));
        }
        parts.push(format!("Meals per day: {}", self.meals_per_day));
        parts.join("\n")
    }

    /// Markdown document persisted for a generated plan.
    pub fn render_markdown(&self, plan: &Value) -> String {
        let mut lines = vec![
            "# Meal Plan".to_string(),
            String::new(),
            format!("**Goal:** {}", self.goal),
        ];
        if let Some(calories) = self.calories() {
            lines.push(format!("**Calories:** {}", calories));
        }
        if let Some(restrictions) = self.restrictions() {
            lines.push(format!("**Preferences:** {}", restrictions));
        }
        lines.push(String::new());
        lines.push("```json".to_string());
        lines.push(serde_json::to_string_pretty(plan).unwrap_or_else(|_| plan.to_string()));
        lines.push("```".to_string());
        lines.join("\n")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of interpreting the model's reply as a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlan {
    pub plan: Value,
    pub structured: bool,
}

/// Parses model output as JSON, falling back to `{"plan": <raw>}`.
///
/// Empty output is treated as an empty object.
pub fn parse_plan(content: &str) -> ParsedPlan {
    let content = if content.trim().is_empty() {
        "{}"
    } else {
        content
    };

    match serde_json::from_str::<Value>(content) {
        Ok(plan) => ParsedPlan {
            plan,
            structured: true,
        },
        Err(_) => {
            let mut raw = Map::new();
            raw.insert(RAW_PLAN_KEY.to_string(), Value::String(content.to_string()));
            ParsedPlan {
                plan: Value::Object(raw),
                structured: false,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlanRecord {
    pub model: String,
    pub prompt: String,
    pub plan: Value,
    pub markdown: String,
    pub path: PathBuf,
    pub usage: Option<TokenUsage>,
    /// False when the model reply was not valid JSON and was kept verbatim.
    pub structured: bool,
}
