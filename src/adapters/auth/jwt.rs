//! HS256 JWT session validator.
//!
//! Tokens are minted by the identity provider with a shared secret. The
//! validator checks:
//! - **Signature**: HS256 over the shared secret
//! - **Issuer (iss)** and **Audience (aud)**
//! - **Expiry (exp)**, with a small leeway for clock skew
//!
//! The `role` claim is the single source of truth for authorization.
//!
//! ```ignore
//! let validator = JwtSessionValidator::new(JwtConfig::new(secret, issuer, audience));
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::SessionValidator;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: 30,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

/// Claims carried by platform access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iss: String,
    #[serde(default)]
    pub aud: Audience,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Absent means student.
    #[serde(default)]
    pub role: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;

        Self {
            config,
            decoding_key,
            validation,
        }
    }

    fn into_user(claims: AccessClaims) -> Result<AuthenticatedUser, AuthError> {
        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "invalid subject in token");
            AuthError::invalid_claims("sub")
        })?;
        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AuthError::invalid_claims("email is required"))?;
        let role = match claims.role.as_deref() {
            None => Role::Student,
            Some(raw) => raw.parse::<Role>().map_err(|_| {
                tracing::warn!(role = raw, "unknown role claim");
                AuthError::invalid_claims(format!("unknown role '{}'", raw))
            })?,
        };
        Ok(AuthenticatedUser::new(user_id, email, claims.name, role))
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        tracing::warn!(error = %e, "token issued for another party");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!(error = %e, "token validation failed");
                        AuthError::InvalidToken
                    }
                }
            },
        )?;
        Self::into_user(data.claims)
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
