//! Session gate: maps a request to an identity and checks its rights
//!
//! A request is either anonymous or authenticated as one username. The
//! username travels in a signed cookie; anything wrong with that cookie
//! (missing, expired, tampered, user deleted) reads as anonymous.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;
use crate::utils::auth::{create_session_token, verify_session_token};

pub const SESSION_COOKIE: &str = "jukebox_session";

/// Identity attached to a request
#[derive(Debug)]
pub enum Session {
    Anonymous,
    Authenticated(User),
}

impl Session {
    /// Read the session cookie and load the user it names
    pub async fn resolve(req: &HttpRequest, state: &AppState) -> Result<Session> {
        let Some(cookie) = req.cookie(SESSION_COOKIE) else {
            return Ok(Session::Anonymous);
        };

        let claims = match verify_session_token(cookie.value(), &state.config.server_id) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Discarding session cookie: {}", e);
                return Ok(Session::Anonymous);
            }
        };

        match state.users.find_by_username(&claims.sub).await? {
            Some(user) => Ok(Session::Authenticated(user)),
            None => {
                debug!("Session names unknown user '{}'", claims.sub);
                Ok(Session::Anonymous)
            }
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Anonymous => None,
        }
    }
}

/// Authenticated user, or a redirect to the login page
pub async fn require_user(req: &HttpRequest, state: &AppState) -> Result<User> {
    Session::resolve(req, state)
        .await?
        .into_user()
        .ok_or(AppError::LoginRequired)
}

/// Authenticated administrator
pub async fn require_admin(req: &HttpRequest, state: &AppState) -> Result<User> {
    let user = require_user(req, state).await?;
    if user.is_admin {
        Ok(user)
    } else {
        debug!("User '{}' denied an admin action", user.username);
        Err(AppError::AuthorizationFailure)
    }
}

/// Self-targeting is always allowed, other targets need the admin flag
pub fn authorize_target(user: &User, target_id: i64) -> Result<()> {
    if user.may_manage(target_id) {
        Ok(())
    } else {
        debug!("User '{}' denied access to user {}", user.username, target_id);
        Err(AppError::AuthorizationFailure)
    }
}

/// Cookie that moves a client to the authenticated state
pub fn session_cookie(username: &str, state: &AppState) -> Result<Cookie<'static>> {
    let max_age = state.config.session_max_age_secs.max(1);
    let token = create_session_token(username, &state.config.server_id, max_age as u64)?;

    Ok(Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .finish())
}

/// Cookie that moves a client back to anonymous
pub fn logoff_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(0))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, is_admin: bool) -> User {
        User {
            id,
            username: format!("user{}", id),
            password: String::new(),
            is_admin,
        }
    }

    #[test]
    fn test_self_target_allowed() {
        assert!(authorize_target(&user(1, false), 1).is_ok());
    }

    #[test]
    fn test_other_target_needs_admin() {
        assert!(matches!(
            authorize_target(&user(1, false), 2),
            Err(AppError::AuthorizationFailure)
        ));
        assert!(authorize_target(&user(1, true), 2).is_ok());
    }

    #[test]
    fn test_logoff_cookie_expires() {
        let cookie = logoff_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(0)));
    }
}
