use uuid::Uuid;

use crate::{
    dto::menu::{CreateMenuItemRequest, MenuList, ReviewList, UpdateMenuItemRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteResult, MenuItem, MenuItemPatch, NewMenuItem, UpdateResult},
    response::{ApiResponse, Meta},
    services::money,
    state::AppState,
};

pub async fn list_menu(state: &AppState) -> AppResult<ApiResponse<MenuList>> {
    let items = state.store.list_menu().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = state
        .store
        .find_menu_item(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Menu item", item, None))
}

pub async fn create_menu_item(
    state: &AppState,
    admin: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    if payload.name.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::BadRequest("name and category are required".into()));
    }
    let mut item: NewMenuItem = payload.into();
    item.price = money::check_amount("price", item.price)?;

    let item = state.store.insert_menu_item(item).await?;
    tracing::info!(menu_id = %item.id, created_by = %admin.email, "menu item created");
    Ok(ApiResponse::success(
        "Menu item created",
        item,
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<UpdateResult>> {
    let mut patch: MenuItemPatch = payload.into();
    if let Some(price) = patch.price {
        patch.price = Some(money::check_amount("price", price)?);
    }
    if patch.is_empty() {
        return Err(AppError::BadRequest("no fields to update".into()));
    }

    let result = state.store.update_menu_item(id, patch).await?;
    Ok(ApiResponse::success("Updated", result, Some(Meta::empty())))
}

pub async fn delete_menu_item(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteResult>> {
    let result = state.store.delete_menu_item(id).await?;
    tracing::info!(
        menu_id = %id,
        deleted_by = %admin.email,
        deleted = result.deleted_count,
        "menu item delete"
    );
    Ok(ApiResponse::success("Deleted", result, Some(Meta::empty())))
}

pub async fn list_reviews(state: &AppState) -> AppResult<ApiResponse<ReviewList>> {
    let items = state.store.list_reviews().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}
