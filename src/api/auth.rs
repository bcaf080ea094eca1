//! Login and logoff routes

use actix_web::http::header::LOCATION;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use super::see_other;
use super::session::{logoff_cookie, session_cookie, Session};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// site root, doubles as logoff
#[get("/")]
pub async fn home(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    match Session::resolve(&req, &state).await? {
        Session::Authenticated(user) => {
            info!("User '{}' logged off", user.username);
            Ok(HttpResponse::SeeOther()
                .insert_header((LOCATION, "/login"))
                .cookie(logoff_cookie())
                .finish())
        }
        Session::Anonymous => Ok(see_other("/login")),
    }
}

/// login form view
#[get("/login")]
pub async fn login_form() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "view": "login",
        "action": "/login",
        "fields": ["username", "password"],
    }))
}

/// check credentials and open a session
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let username = form.username.trim();
    if !state.users.verify(username, &form.password).await? {
        warn!("Failed login for '{}'", username);
        return Err(AppError::AuthenticationFailure);
    }

    let cookie = session_cookie(username, &state)?;
    info!("User '{}' logged in", username);

    Ok(HttpResponse::SeeOther()
        .insert_header((LOCATION, "/dashboard"))
        .cookie(cookie)
        .finish())
}

/// configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home).service(login_form).service(login);
}
