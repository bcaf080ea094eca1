//! Song request routes

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use super::see_other;
use super::session::{require_admin, Session};
use crate::error::{AppError, Result};
use crate::models::Song;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SongForm {
    pub song: String,
}

/// queue a song request, one pending request per user
#[post("/addSong")]
pub async fn add_song(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<SongForm>,
) -> Result<HttpResponse> {
    // no login redirect here, anonymous posts are refused outright
    let user = Session::resolve(&req, &state)
        .await?
        .into_user()
        .ok_or(AppError::AuthorizationFailure)?;

    if let Some(song) = state.queue.submit(&form.song, user.id).await? {
        fetch_song(&state, &song).await;
    }

    Ok(see_other("/dashboard"))
}

/// download an accepted request when a fetcher is configured
///
/// Failures are logged; the request stays queued either way.
async fn fetch_song(state: &AppState, song: &Song) {
    let Some(fetcher) = state.fetcher.clone() else {
        return;
    };

    let query = song.name.clone();
    let output_stem = state.paths.song_output_stem(song.id);

    match web::block(move || fetcher.fetch(&query, &output_stem)).await {
        Ok(Ok(path)) => info!("Song {} downloaded to {}", song.id, path.display()),
        Ok(Err(e)) => warn!("Fetching song {} failed: {}", song.id, e),
        Err(e) => warn!("Fetch task for song {} did not complete: {}", song.id, e),
    }
}

/// start playing a queued song, admin only
#[post("/song_play/{id}")]
pub async fn song_play(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req, &state).await?;
    state.queue.start_playing(path.into_inner()).await?;
    Ok(see_other("/dashboard"))
}

/// remove a song from the queue, admin only
#[post("/song_del/{id}")]
pub async fn song_del(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req, &state).await?;
    if !state.queue.remove(path.into_inner()).await? {
        return Err(AppError::NotFound("Song"));
    }
    Ok(see_other("/dashboard"))
}

/// configure song routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_song).service(song_play).service(song_del);
}
