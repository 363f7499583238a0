use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    error::AppError,
    services::token_service::AuthError,
    state::AppState,
    store::Store,
};

/// Authenticated caller, decoded from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

/// Authenticated caller whose stored profile carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing => AppError::Unauthorized,
            AuthError::Malformed | AuthError::InvalidSignature | AuthError::Expired => {
                AppError::Forbidden
            }
        }
    }
}

/// Pulls the bearer token out of the request headers.
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?;
    let value = value.to_str().map_err(|_| AuthError::Malformed)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed)
}

/// Path emails must match the caller; a valid token does not open other users' data.
pub fn ensure_self(user: &AuthUser, email: &str) -> Result<(), AppError> {
    if user.email != email {
        tracing::debug!(caller = %user.email, requested = %email, "identity mismatch");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn ensure_admin(store: &dyn Store, user: &AuthUser) -> Result<(), AppError> {
    let stored = store.find_user_by_email(&user.email).await?;
    match stored {
        Some(profile) if profile.is_admin() => Ok(()),
        _ => {
            tracing::debug!(email = %user.email, "admin role required");
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let claims = bearer_token(parts)
            .and_then(|token| state.tokens.verify(token))
            .inspect_err(|err| tracing::debug!(reason = %err, "credential rejected"))?;

        let user = AuthUser {
            email: claims.email,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_admin(state.store.as_ref(), &user).await?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/users");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn missing_header_is_missing() {
        assert_eq!(bearer_token(&parts_with(None)), Err(AuthError::Missing));
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        assert_eq!(
            bearer_token(&parts_with(Some("Basic abc"))),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            bearer_token(&parts_with(Some("Bearer "))),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Ok("abc.def"));
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert!(matches!(AppError::from(AuthError::Missing), AppError::Unauthorized));
        assert!(matches!(AppError::from(AuthError::Expired), AppError::Forbidden));
        assert!(matches!(
            AppError::from(AuthError::InvalidSignature),
            AppError::Forbidden
        ));
    }

    #[test]
    fn ensure_self_rejects_other_identity() {
        let user = AuthUser {
            email: "a@x.com".into(),
        };
        assert!(ensure_self(&user, "a@x.com").is_ok());
        assert!(matches!(ensure_self(&user, "b@x.com"), Err(AppError::Forbidden)));
    }
}
