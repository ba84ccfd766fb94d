use serde::{Deserialize, Serialize};

use crate::profile::services::ReconcileOutcome;

/// Tokens issued by the remote auth service after a successful sign-in.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").finish_non_exhaustive()
    }
}

/// Login always succeeds once tokens are stored; reconciliation problems are reported, not raised.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub reconciled: Option<ReconcileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconcile_error: Option<String>,
}
