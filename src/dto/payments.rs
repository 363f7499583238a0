use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DeleteResult, Payment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIntentRequest {
    #[schema(value_type = String)]
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePaymentRequest {
    pub email: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub cart_ids: Vec<Uuid>,
    #[serde(default)]
    pub menu_item_ids: Vec<Uuid>,
    /// Client-generated; replaying a request with the same key records one payment.
    pub idempotency_key: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecordResult {
    pub inserted_id: Uuid,
    /// False when the idempotency key had already been recorded.
    pub created: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePaymentResponse {
    pub payment_result: PaymentRecordResult,
    pub delete_result: DeleteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentList {
    #[schema(value_type = Vec<Payment>)]
    pub items: Vec<Payment>,
}
