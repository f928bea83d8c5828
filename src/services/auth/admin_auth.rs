//! Admin credential checks.
//!
//! There are two credential kinds and either one grants admin rights:
//! - a bearer JWT (`Authorization: Bearer <token>`) issued by `/api/admin/login`
//! - the `admin-auth=true` session cookie set by `/api/auth/login`
//!
//! Every request re-derives its own auth state; nothing is kept server-side.
use subtle::ConstantTimeEq;

use crate::services::auth::admin_token::{AdminTokenError, AdminTokens};

pub const SESSION_COOKIE_NAME: &str = "admin-auth";
pub const SESSION_COOKIE_VALUE: &str = "true";
pub const SESSION_COOKIE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Where a request's admin credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Bearer,
    SessionCookie,
}

/// Which credential sources a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedCredentials {
    BearerOrCookie,
    CookieOnly,
}

impl AcceptedCredentials {
    fn allows_bearer(self) -> bool {
        matches!(self, Self::BearerOrCookie)
    }
}

/// Raw credentials pulled off a request (no validation yet).
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentedCredentials<'a> {
    pub bearer: Option<&'a str>,
    pub session_cookie: Option<&'a str>,
}

#[derive(Clone)]
pub struct AdminAuth {
    password: String,
    tokens: AdminTokens,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the password
        f.debug_struct("AdminAuth")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AdminAuth {
    pub fn new(password: String, tokens: AdminTokens) -> Self {
        Self { password, tokens }
    }

    pub fn tokens(&self) -> &AdminTokens {
        &self.tokens
    }

    /// Plain equality against the configured password, in constant time.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into()
    }

    pub fn issue_token(&self) -> Result<String, AdminTokenError> {
        self.tokens.issue()
    }

    pub fn verify_token(&self, token: &str) -> Result<(), AdminTokenError> {
        self.tokens.verify(token).map(|_| ())
    }

    pub fn session_cookie_valid(value: Option<&str>) -> bool {
        value == Some(SESSION_COOKIE_VALUE)
    }

    /// Bearer first (when accepted), then the session cookie.
    ///
    /// A failing bearer token does not reject the request on its own; the cookie
    /// still gets its turn.
    pub fn authorize(
        &self,
        presented: PresentedCredentials<'_>,
        accepted: AcceptedCredentials,
    ) -> Option<CredentialSource> {
        if accepted.allows_bearer()
            && let Some(token) = presented.bearer
        {
            match self.verify_token(token) {
                Ok(()) => return Some(CredentialSource::Bearer),
                Err(err) => {
                    tracing::debug!(error = %err, "bearer token rejected, trying session cookie");
                }
            }
        }

        if Self::session_cookie_valid(presented.session_cookie) {
            return Some(CredentialSource::SessionCookie);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new(
            "كلمة-سر".to_string(),
            AdminTokens::new("كلمة-سر", 24 * 60 * 60, 0),
        )
    }

    #[test]
    fn password_must_match_exactly() {
        let auth = auth();
        assert!(auth.password_matches("كلمة-سر"));
        assert!(!auth.password_matches("كلمة-سر "));
        assert!(!auth.password_matches(""));
    }

    #[test]
    fn nothing_presented_is_unauthenticated() {
        assert_eq!(
            auth().authorize(
                PresentedCredentials::default(),
                AcceptedCredentials::BearerOrCookie
            ),
            None
        );
    }

    #[test]
    fn valid_bearer_wins() {
        let auth = auth();
        let token = auth.issue_token().unwrap();
        let presented = PresentedCredentials {
            bearer: Some(&token),
            session_cookie: None,
        };
        assert_eq!(
            auth.authorize(presented, AcceptedCredentials::BearerOrCookie),
            Some(CredentialSource::Bearer)
        );
    }

    #[test]
    fn expired_bearer_falls_through_to_cookie() {
        let auth = auth();
        let stale = auth
            .tokens()
            .issue_at(Utc::now() - Duration::hours(30))
            .unwrap();

        let with_cookie = PresentedCredentials {
            bearer: Some(&stale),
            session_cookie: Some("true"),
        };
        assert_eq!(
            auth.authorize(with_cookie, AcceptedCredentials::BearerOrCookie),
            Some(CredentialSource::SessionCookie)
        );

        let without_cookie = PresentedCredentials {
            bearer: Some(&stale),
            session_cookie: None,
        };
        assert_eq!(
            auth.authorize(without_cookie, AcceptedCredentials::BearerOrCookie),
            None
        );
    }

    #[test]
    fn cookie_value_must_be_literal_true() {
        let auth = auth();
        for value in ["True", "1", "", "true "] {
            let presented = PresentedCredentials {
                bearer: None,
                session_cookie: Some(value),
            };
            assert_eq!(
                auth.authorize(presented, AcceptedCredentials::BearerOrCookie),
                None,
                "cookie value {value:?} should not authenticate"
            );
        }
    }

    #[test]
    fn cookie_only_routes_ignore_bearer() {
        let auth = auth();
        let token = auth.issue_token().unwrap();
        let presented = PresentedCredentials {
            bearer: Some(&token),
            session_cookie: None,
        };
        assert_eq!(
            auth.authorize(presented, AcceptedCredentials::CookieOnly),
            None
        );
    }
}
