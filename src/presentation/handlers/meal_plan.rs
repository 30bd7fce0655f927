use axum::Json;
use axum::extract::State;

use crate::domain::{MealPlanRecord, MealPlanRequest};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::ApiError;

#[tracing::instrument(skip(state, request))]
pub async fn meal_plan_handler(
    State(state): State<AppState>,
    Json(request): Json<MealPlanRequest>,
) -> Result<Json<MealPlanRecord>, ApiError> {
    tracing::debug!(goal = %sanitize_prompt(&request.goal), "Creating meal plan");

    let record = state.meal_plan_service.create_meal_plan(&request).await?;
    Ok(Json(record))
}
