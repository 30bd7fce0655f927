use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{AiClient, ArtifactStore, ChatMessage, ChatRequest};
use crate::domain::{
    ArtifactCategory, MEAL_PLAN_SYSTEM_PROMPT, MealPlanRecord, MealPlanRequest, parse_plan,
    timestamped_stem,
};

use super::{RetryPolicy, ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub struct MealPlanDefaults {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub struct MealPlanService {
    client: Arc<dyn AiClient>,
    store: Arc<dyn ArtifactStore>,
    retry: RetryPolicy,
    defaults: MealPlanDefaults,
}

impl MealPlanService {
    pub fn new(
        client: Arc<dyn AiClient>,
        store: Arc<dyn ArtifactStore>,
        retry: RetryPolicy,
        defaults: MealPlanDefaults,
    ) -> Self {
        Self {
            client,
            store,
            retry,
            defaults,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn default_model(&self) -> &str {
        &self.defaults.model
    }

    /// Requests a structured plan and persists it as Markdown under `meal_plan/`.
    ///
    /// Output that is not valid JSON is kept under the `plan` key and the
    /// record is marked unstructured.
    #[tracing::instrument(skip(self, request), fields(meals_per_day = request.meals_per_day))]
    pub async fn create_meal_plan(
        &self,
        request: &MealPlanRequest,
    ) -> Result<MealPlanRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }

        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.defaults.model)
            .to_string();
        let prompt = request.prompt();

        let chat_request = ChatRequest {
            model: model.clone(),
            messages: vec![
                ChatMessage::system(MEAL_PLAN_SYSTEM_PROMPT),
                ChatMessage::user(prompt.clone()),
            ],
            temperature: self.defaults.temperature,
            max_tokens: self.defaults.max_tokens,
            json_response: true,
        };

        let client = &self.client;
        let chat_request = &chat_request;
        let completion = self
            .retry
            .execute("meal plan generation", move || {
                client.chat_completion(chat_request)
            })
            .await?;

        let parsed = parse_plan(&completion.content);
        if !parsed.structured {
            tracing::warn!(
                chars = completion.content.len(),
                "Meal plan reply was not valid JSON, keeping raw text"
            );
        }

        let markdown = request.render_markdown(&parsed.plan);
        let stem = timestamped_stem("meal-plan", Utc::now());
        let path = self
            .store
            .persist(ArtifactCategory::MealPlan, &stem, "md", markdown.as_bytes())
            .await?;

        tracing::info!(path = %path.display(), model = %model, "Meal plan saved");

        Ok(MealPlanRecord {
            model,
            prompt,
            plan: parsed.plan,
            markdown,
            path,
            usage: completion.usage,
            structured: parsed.structured,
        })
    }
}
