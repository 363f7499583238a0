use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::users::{AdminStatus, CreateUserRequest, UserList},
    error::AppResult,
    middleware::auth::{AdminUser, AuthUser},
    models::{DeleteResult, InsertResult, UpdateResult},
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", delete(delete_user))
        // PATCH takes a user id, GET takes an email.
        .route("/admin/{subject}", get(admin_status).patch(make_admin))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List all users (admin only)", body = ApiResponse<UserList>),
        (status = 401, description = "Missing credential"),
        (status = 403, description = "Invalid credential or not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Create the user unless the email exists; insertedId is null when it does", body = ApiResponse<InsertResult>),
        (status = 400, description = "Missing email"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<InsertResult>>> {
    let resp = user_service::create_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Delete user", body = ApiResponse<DeleteResult>),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    let resp = user_service::delete_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Grant the admin role", body = ApiResponse<UpdateResult>),
        (status = 401, description = "Missing credential"),
        (status = 403, description = "Invalid credential or not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn make_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UpdateResult>>> {
    let resp = user_service::make_admin(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    params(
        ("email" = String, Path, description = "Caller's own email")
    ),
    responses(
        (status = 200, description = "Whether the caller is an admin", body = ApiResponse<AdminStatus>),
        (status = 401, description = "Missing credential"),
        (status = 403, description = "Invalid credential or another user's email"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn admin_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<AdminStatus>>> {
    let resp = user_service::admin_status(&state, &user, &email).await?;
    Ok(Json(resp))
}
