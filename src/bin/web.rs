//! Single binary web server: bracket sessions over a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! AUTO_RESOLVE_DELAY_MS, INACTIVITY_TIMEOUT_SECS, CLEANUP_INTERVAL_SECS.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use playlist_bracket_web::{
    drive_auto_resolution, scheduled_ticket, BracketError, BracketEvent, BracketSession,
    SeedingStrategy, ServerConfig, SessionId, Track,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: bracket data + last activity time (for auto-cleanup).
struct SessionEntry {
    session: BracketSession,
    last_activity: Instant,
}

/// In-memory state: many brackets by id. Idle entries are swept periodically.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    tracks: Vec<Track>,
    #[serde(default)]
    seeding: SeedingStrategy,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct PickBody {
    slot: u8,
}

#[derive(Deserialize)]
struct ResetBody {
    #[serde(default)]
    tracks: Option<Vec<Track>>,
    #[serde(default)]
    seeding: Option<SeedingStrategy>,
}

#[derive(Deserialize)]
struct ExportBody {
    #[serde(default)]
    name: Option<String>,
}

/// Path segment: session id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

fn error_response(e: BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::SessionNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Start a timer for a bye the controller just scheduled, if any.
fn schedule_auto_resolution(state: &AppState, id: SessionId, events: &[BracketEvent<Track>]) {
    let Some((ticket, delay)) = scheduled_ticket(events) else {
        return;
    };
    let state = state.clone();
    actix_web::rt::spawn(drive_auto_resolution(ticket, delay, move |ticket| {
        let mut g = state.write().ok()?;
        let entry = g.get_mut(&id)?;
        scheduled_ticket(&entry.session.resolve(ticket))
    }));
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "playlist-bracket-web",
    })
}

/// Create a bracket from a track list (returns it with id; client stores id for subsequent requests).
#[post("/api/brackets")]
async fn api_create_bracket(
    state: AppState,
    config: Data<ServerConfig>,
    body: Json<CreateBracketBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut session =
        BracketSession::with_auto_resolve_delay(body.tracks, body.seeding, config.auto_resolve_delay);
    session.name = body.name.filter(|n| !n.trim().is_empty());
    let id = session.id;
    let snapshot = session.snapshot();
    let pending = session
        .controller
        .pending_ticket()
        .map(|ticket| BracketEvent::AutoResolveScheduled {
            ticket,
            delay: session.controller.auto_resolve_delay(),
        });
    {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        g.insert(
            id,
            SessionEntry {
                session,
                last_activity: Instant::now(),
            },
        );
    }
    log::info!(
        "Created bracket {} ({} participants, {} rounds)",
        id,
        snapshot.plan.participant_count,
        snapshot.round_count
    );
    if let Some(event) = pending {
        schedule_auto_resolution(&state, id, &[event]);
    }
    HttpResponse::Ok().json(snapshot)
}

/// Get a bracket by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.session.snapshot())
        }
        None => error_response(BracketError::SessionNotFound(path.id)),
    }
}

/// Current match with both payloads (null for a bye) and the controller state.
#[get("/api/brackets/{id}/match")]
async fn api_current_match(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(BracketError::SessionNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    let c = &entry.session.controller;
    let current = c.current_match();
    HttpResponse::Ok().json(serde_json::json!({
        "state": c.state(),
        "round": c.round(),
        "matchIndex": c.match_index(),
        "home": current.as_ref().and_then(|m| m.home.as_ref()),
        "away": current.as_ref().and_then(|m| m.away.as_ref()),
    }))
}

/// Pick the winner of the current match (slot 0 or 1).
#[post("/api/brackets/{id}/pick")]
async fn api_pick(state: AppState, path: Path<SessionPath>, body: Json<PickBody>) -> HttpResponse {
    let (snapshot, events) = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return error_response(BracketError::SessionNotFound(path.id)),
        };
        entry.last_activity = Instant::now();
        match entry.session.pick(body.slot) {
            Ok(events) => (entry.session.snapshot(), events),
            Err(e) => return error_response(e),
        }
    };
    schedule_auto_resolution(&state, path.id, &events);
    HttpResponse::Ok().json(snapshot)
}

/// Restart the bracket, optionally with a new track list or seeding strategy.
#[post("/api/brackets/{id}/reset")]
async fn api_reset(
    state: AppState,
    path: Path<SessionPath>,
    body: Option<Json<ResetBody>>,
) -> HttpResponse {
    let (tracks, seeding) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.tracks, b.seeding)
        }
        None => (None, None),
    };
    let (snapshot, events) = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return error_response(BracketError::SessionNotFound(path.id)),
        };
        entry.last_activity = Instant::now();
        let events = entry.session.reset(tracks, seeding);
        (entry.session.snapshot(), events)
    };
    schedule_auto_resolution(&state, path.id, &events);
    HttpResponse::Ok().json(snapshot)
}

/// Ranking so far, champion first.
#[get("/api/brackets/{id}/placements")]
async fn api_placements(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.session.placements())
        }
        None => error_response(BracketError::SessionNotFound(path.id)),
    }
}

/// Placements as CSV (rank, seed, name, artist, uri).
#[get("/api/brackets/{id}/placements.csv")]
async fn api_placements_csv(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(BracketError::SessionNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    match entry.session.placements_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(e),
    }
}

/// Playlist export payload for the playlist sink (name + track URIs, best first).
#[post("/api/brackets/{id}/export")]
async fn api_export(
    state: AppState,
    path: Path<SessionPath>,
    body: Option<Json<ExportBody>>,
) -> HttpResponse {
    let name = body.and_then(|b| b.into_inner().name);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(BracketError::SessionNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    match entry.session.export(name.as_deref()) {
        Ok(export) => HttpResponse::Ok().json(export),
        Err(e) => error_response(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));

    // Background task: periodically remove sessions idle past the inactivity timeout
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    let cleanup_interval = config.cleanup_interval.max(Duration::from_secs(1));
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive bracket(s)", removed);
            }
        }
    });

    let config = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_current_match)
            .service(api_pick)
            .service(api_reset)
            .service(api_placements)
            .service(api_placements_csv)
            .service(api_export)
    })
    .bind(bind)?
    .run()
    .await
}
