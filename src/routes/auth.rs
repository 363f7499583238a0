use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{TokenRequest, TokenResponse},
    error::AppResult,
    response::ApiResponse,
    services::user_service::issue_token,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/jwt", post(create_token))
}

#[utoipa::path(
    post,
    path = "/jwt",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Issue a bearer credential valid for two hours", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Missing email")
    ),
    tag = "Auth"
)]
pub async fn create_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = issue_token(&state, payload)?;
    Ok(Json(resp))
}
