//! Account management routes

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;

use super::see_other;
use super::session::{authorize_target, require_admin, require_user};
use crate::error::{AppError, Result};
use crate::models::PublicUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,
}

/// new user form, admin only
#[get("/user_add")]
pub async fn user_add_form(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    require_admin(&req, &state).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "view": "user_add",
        "action": "/user_add",
        "fields": ["username", "password"],
    })))
}

/// create a non-admin user, admin only
#[post("/user_add")]
pub async fn user_add(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<CreateUserForm>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req, &state).await?;

    let user = state
        .users
        .create(&form.username, &form.password, false)
        .await?;
    info!("Admin '{}' added user '{}'", admin.username, user.username);

    Ok(see_other("/user_list"))
}

/// password reset form, self or admin
#[get("/user_mod/{id}")]
pub async fn user_mod_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let target_id = path.into_inner();
    let user = require_user(&req, &state).await?;
    authorize_target(&user, target_id)?;

    let target = state
        .users
        .find_by_id(target_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "view": "user_mod",
        "action": format!("/user_mod/{}", target.id),
        "target": target.to_public(),
        "user": user.to_public(),
    })))
}

/// reset a password when a non-empty one was submitted, self or admin
#[post("/user_mod/{id}")]
pub async fn user_mod(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<ResetPasswordForm>,
) -> Result<HttpResponse> {
    let target_id = path.into_inner();
    let user = require_user(&req, &state).await?;
    authorize_target(&user, target_id)?;

    let target = state
        .users
        .find_by_id(target_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    state.users.reset_password(&target, &form.password).await?;

    Ok(see_other("/dashboard"))
}

/// all users, admin only
#[get("/user_list")]
pub async fn user_list(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let admin = require_admin(&req, &state).await?;

    let users: Vec<PublicUser> = state
        .users
        .list()
        .await?
        .iter()
        .map(|u| u.to_public())
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "view": "user_list",
        "user": admin.to_public(),
        "users": users,
    })))
}

/// delete another user, admin only
#[post("/user_del/{id}")]
pub async fn user_del(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let target_id = path.into_inner();
    let admin = require_admin(&req, &state).await?;

    if admin.id == target_id {
        return Err(AppError::Validation("You cannot delete yourself".to_string()));
    }

    state.users.delete(target_id).await?;
    info!("Admin '{}' deleted user {}", admin.username, target_id);

    Ok(see_other("/user_list"))
}

/// configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(user_add_form)
        .service(user_add)
        .service(user_mod_form)
        .service(user_mod)
        .service(user_list)
        .service(user_del);
}
