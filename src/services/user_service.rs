use uuid::Uuid;

use crate::{
    dto::{
        auth::{TokenRequest, TokenResponse},
        users::{AdminStatus, CreateUserRequest, UserList},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self},
    models::{DeleteResult, InsertResult, NewUser, Role, UpdateResult},
    response::{ApiResponse, Meta},
    state::AppState,
    store::StoreError,
};

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items = state.store.list_users().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

/// Creates the user on first sign-in; an existing email is left untouched.
pub async fn create_user(
    state: &AppState,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<InsertResult>> {
    let email = payload.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }

    let exists = state.store.find_user_by_email(&email).await?;
    if exists.is_some() {
        return Ok(already_exists());
    }

    let new_user = NewUser {
        email,
        name: payload.name,
        photo_url: payload.photo_url,
    };

    match state.store.insert_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "user created");
            Ok(ApiResponse::success(
                "User created",
                InsertResult {
                    inserted_id: Some(user.id),
                },
                None,
            ))
        }
        // Lost a race with a concurrent sign-in for the same email.
        Err(StoreError::Conflict(_)) => Ok(already_exists()),
        Err(err) => Err(err.into()),
    }
}

fn already_exists() -> ApiResponse<InsertResult> {
    ApiResponse::success(
        "User already exists",
        InsertResult { inserted_id: None },
        None,
    )
}

pub async fn delete_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<DeleteResult>> {
    let result = state.store.delete_user(id).await?;
    Ok(ApiResponse::success("Deleted", result, Some(Meta::empty())))
}

pub async fn make_admin(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<UpdateResult>> {
    let result = state.store.set_user_role(id, Role::Admin).await?;
    tracing::info!(
        promoted_by = %admin.email,
        user_id = %id,
        matched = result.matched_count,
        "admin role granted"
    );
    Ok(ApiResponse::success("Updated", result, Some(Meta::empty())))
}

pub async fn admin_status(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<AdminStatus>> {
    ensure_self(user, email)?;
    let admin = state
        .store
        .find_user_by_email(email)
        .await?
        .is_some_and(|u| u.is_admin());
    Ok(ApiResponse::success("OK", AdminStatus { admin }, None))
}

pub fn issue_token(
    state: &AppState,
    payload: TokenRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    let token = state.tokens.issue(payload.email.trim())?;
    Ok(ApiResponse::success(
        "Token issued",
        TokenResponse { token },
        Some(Meta::empty()),
    ))
}
