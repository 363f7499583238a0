use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::payments::{
        CreateIntentRequest, CreateIntentResponse, FinalizePaymentRequest,
        FinalizePaymentResponse, PaymentList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payments", post(finalize_payment))
        .route("/paymentHistory/{email}", get(payment_history))
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Create a gateway payment intent", body = ApiResponse<CreateIntentResponse>),
        (status = 400, description = "Invalid price"),
        (status = 502, description = "Payment gateway failure"),
    ),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> AppResult<Json<ApiResponse<CreateIntentResponse>>> {
    let resp = payment_service::create_intent(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/payments",
    request_body = FinalizePaymentRequest,
    responses(
        (status = 200, description = "Record payment and clear the paid cart items", body = ApiResponse<FinalizePaymentResponse>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Payments"
)]
pub async fn finalize_payment(
    State(state): State<AppState>,
    Json(payload): Json<FinalizePaymentRequest>,
) -> AppResult<Json<ApiResponse<FinalizePaymentResponse>>> {
    let resp = payment_service::finalize(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/paymentHistory/{email}",
    params(
        ("email" = String, Path, description = "Caller's own email")
    ),
    responses(
        (status = 200, description = "Payments for the caller, newest first", body = ApiResponse<PaymentList>),
        (status = 401, description = "Missing credential"),
        (status = 403, description = "Invalid credential or another user's email"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::payment_history(&state, &user, &email).await?;
    Ok(Json(resp))
}
