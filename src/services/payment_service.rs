use rust_decimal::{Decimal, prelude::ToPrimitive};
use uuid::Uuid;

use crate::{
    dto::payments::{
        CreateIntentRequest, CreateIntentResponse, FinalizePaymentRequest,
        FinalizePaymentResponse, PaymentList, PaymentRecordResult,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self},
    models::{DeleteResult, NewPayment},
    response::{ApiResponse, Meta},
    services::money,
    state::AppState,
};

const DEFAULT_STATUS: &str = "pending";

/// Converts a decimal price to minor currency units (cents) without floating point.
///
/// Rejects non-positive prices and anything [`money::check_amount`] rejects.
pub fn to_minor_units(price: Decimal) -> AppResult<i64> {
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    let cents = money::check_amount("price", price)? * Decimal::ONE_HUNDRED;
    cents
        .to_i64()
        .ok_or_else(|| AppError::BadRequest("price is out of range".into()))
}

/// Creates a gateway intent and hands back only the client secret. Nothing is stored.
pub async fn create_intent(
    state: &AppState,
    payload: CreateIntentRequest,
) -> AppResult<ApiResponse<CreateIntentResponse>> {
    let amount = to_minor_units(payload.price)?;
    let idempotency_key = Uuid::new_v4().to_string();

    let intent = state
        .gateway
        .create_intent(amount, &idempotency_key)
        .await?;
    tracing::info!(intent_id = %intent.id, amount, "payment intent created");

    Ok(ApiResponse::success(
        "Payment intent created",
        CreateIntentResponse {
            client_secret: intent.client_secret,
        },
        Some(Meta::empty()),
    ))
}

/// Records the payment, then clears the paid cart items for the payer.
///
/// The payment record is authoritative: a failed cleanup is reported in the
/// response and logged, never rolled back into a failed payment.
pub async fn finalize(
    state: &AppState,
    payload: FinalizePaymentRequest,
) -> AppResult<ApiResponse<FinalizePaymentResponse>> {
    let email = payload.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    let amount = money::check_amount("amount", payload.amount)?;

    let idempotency_key = payload.idempotency_key.unwrap_or_else(|| {
        let key = Uuid::new_v4();
        tracing::warn!(%key, email = %email, "payment without idempotency key, generated one");
        key
    });

    let recorded = state
        .store
        .insert_payment(NewPayment {
            idempotency_key,
            email,
            amount,
            transaction_id: payload.transaction_id,
            cart_ids: payload.cart_ids,
            menu_item_ids: payload.menu_item_ids,
            status: payload.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        })
        .await?;
    tracing::info!(
        payment_id = %recorded.payment.id,
        %idempotency_key,
        created = recorded.created,
        "payment recorded"
    );

    // Clean up with the recorded payer and ids so a replay cannot widen the delete.
    let payment = &recorded.payment;
    let (delete_result, cleanup_error) = match state
        .store
        .delete_cart_items(&payment.email, &payment.cart_ids)
        .await
    {
        Ok(result) => {
            tracing::info!(
                payment_id = %payment.id,
                deleted = result.deleted_count,
                "cart cleared"
            );
            (result, None)
        }
        Err(err) => {
            tracing::warn!(payment_id = %payment.id, error = %err, "cart cleanup failed");
            (DeleteResult::default(), Some(err.to_string()))
        }
    };

    Ok(ApiResponse::success(
        "Payment recorded",
        FinalizePaymentResponse {
            payment_result: PaymentRecordResult {
                inserted_id: recorded.payment.id,
                created: recorded.created,
            },
            delete_result,
            cleanup_error,
        },
        Some(Meta::empty()),
    ))
}

pub async fn payment_history(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<PaymentList>> {
    ensure_self(user, email)?;
    let items = state.store.list_payments(email).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Payments", PaymentList { items }, Some(meta)))
}
