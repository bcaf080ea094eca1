//! Dashboard route

use actix_web::{get, web, HttpRequest, HttpResponse};

use super::session::require_user;
use crate::error::Result;
use crate::state::AppState;

/// current song plus the head of the queue
#[get("/dashboard")]
pub async fn dashboard(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = require_user(&req, &state).await?;

    let current_song = state.queue.current_playing().await?;
    let songs = state.queue.pending(state.config.dashboard_limit).await?;
    // may sit beyond the dashboard limit
    let my_pending = state.queue.pending_for(user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "view": "dashboard",
        "user": user.to_public(),
        "current_song": current_song,
        "songs": songs,
        "my_pending": my_pending,
    })))
}

/// configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}
