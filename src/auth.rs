//! Viewer identity, as forwarded by the authentication layer.
//!
//! Token issuance and signature/expiry checks live in front of this service;
//! by the time a request reaches us the gateway has validated the token and
//! forwarded its claims as headers. The claims are trusted verbatim and
//! carried through each handler as an explicit `Viewer` value, never as
//! ambient state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const ID_HEADER: &str = "x-auth-id";
pub const ROLE_HEADER: &str = "x-auth-role";
pub const BATCH_HEADER: &str = "x-auth-batch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: String,
    pub role: Role,
    /// Student cohort; only meaningful for `Role::Student`.
    pub batch: Option<String>,
}

fn required_header(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} claim", name)))
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = required_header(parts, ID_HEADER)?;
        let role = match required_header(parts, ROLE_HEADER)?.as_str() {
            "student" => Role::Student,
            "professor" => Role::Professor,
            other => {
                return Err(AppError::Unauthorized(format!("Unknown role: {}", other)));
            }
        };
        let batch = parts
            .headers
            .get(BATCH_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        Ok(Viewer { id, role, batch })
    }
}

impl Viewer {
    pub fn require_professor(&self) -> Result<(), AppError> {
        match self.role {
            Role::Professor => Ok(()),
            Role::Student => Err(AppError::Forbidden(
                "Professor access required".to_string(),
            )),
        }
    }
}
