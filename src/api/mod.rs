//! HTTP routes for jukebox

pub mod auth;
pub mod dashboard;
pub mod session;
pub mod songs;
pub mod users;


use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Login, logoff
        .configure(auth::configure)
        // Current song and queue head
        .configure(dashboard::configure)
        // Account management
        .configure(users::configure)
        // Song requests
        .configure(songs::configure);
}

/// 303 redirect, so a form POST lands on a GET
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}
