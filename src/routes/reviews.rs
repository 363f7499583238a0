use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::menu::ReviewList, error::AppResult, response::ApiResponse, services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/review", get(list_reviews))
}

#[utoipa::path(
    get,
    path = "/review",
    responses(
        (status = 200, description = "List reviews", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = menu_service::list_reviews(&state).await?;
    Ok(Json(resp))
}
