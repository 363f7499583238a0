use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, CartQuery},
    error::{AppError, AppResult},
    models::{CartItem, DeleteResult, NewCartItem},
    response::{ApiResponse, Meta},
    services::money,
    state::AppState,
};

/// Lists the cart for `?email=`. Without an email there is nothing to match.
pub async fn list_cart(state: &AppState, query: CartQuery) -> AppResult<ApiResponse<CartList>> {
    let items = match query.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => state.store.list_cart_items(email).await?,
        _ => Vec::new(),
    };
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let mut item: NewCartItem = payload.into();
    // Lookups and payment cleanup match on the trimmed email.
    item.email = item.email.trim().to_string();
    if item.email.is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    item.price = money::check_amount("price", item.price)?;

    let item = state.store.insert_cart_item(item).await?;
    tracing::debug!(cart_id = %item.id, email = %item.email, "cart item added");
    Ok(ApiResponse::success("OK", item, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteResult>> {
    let result = state.store.delete_cart_item(id).await?;
    Ok(ApiResponse::success(
        "Removed from cart",
        result,
        Some(Meta::empty()),
    ))
}
