//! Authentication models
//!
//! Users live in the auth provider; the API only sees the claims of a
//! verified access token.

use serde::{Deserialize, Serialize};

/// Audience the auth provider stamps on end-user access tokens
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// JWT claims issued by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User's email, absent for phone or anonymous sign-ins
    #[serde(default)]
    pub email: Option<String>,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    /// Audience
    #[serde(default)]
    pub aud: String,

    /// Provider role (`authenticated`, `service_role`, ...)
    #[serde(default)]
    pub role: Option<String>,
}

/// The identity a scenery record is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneryUser {
    pub id: String,
    pub email: String,
}

impl From<&Claims> for SceneryUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone().unwrap_or_default(),
        }
    }
}
