use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity payload a client exchanges for a credential.
#[derive(Deserialize, Debug, ToSchema)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
