//! Single binary web server: JSON API over the tournament service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! DATA_DIR switches from in-memory storage to JSON files in that directory.
//! TOURNAMENT_PASSPHRASE, when set, is required in the X-Passphrase header of every POST.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use group_knockout_tracker::{
    compute_standings, write_standings_csv, GroupStandings, JsonFileStore, MatchStore,
    MemoryStore, Progress, ScoreOutcome, ScoreSubmission, ServerConfig, ServiceError, Tournament,
    TournamentId, TournamentService, TournamentStage,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

struct AppContext {
    service: TournamentService,
    config: ServerConfig,
}

type AppState = Data<AppContext>;

const PASSPHRASE_HEADER: &str = "X-Passphrase";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    participants: Vec<String>,
    #[serde(default = "default_group_count")]
    groups: usize,
}

fn default_group_count() -> usize {
    1
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Detail view: snapshot plus everything derived from it.
#[derive(Serialize)]
struct TournamentView {
    tournament: Tournament,
    revision: u64,
    updated_at: DateTime<Utc>,
    stage: TournamentStage,
    standings: Vec<GroupStandings>,
}

#[derive(Serialize)]
struct ScoreResponse {
    outcome: ScoreOutcome,
    tournament: Tournament,
}

#[derive(Serialize)]
struct ProgressResponse {
    progress: Progress,
    tournament: Tournament,
}

fn error_body(status: actix_web::http::StatusCode, message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": message.to_string() }))
}

fn error_response(e: &ServiceError) -> HttpResponse {
    let status = e.status_code();
    if status.is_server_error() {
        log::error!("{}", e);
    } else {
        log::warn!("Request rejected: {}", e);
    }
    error_body(status, e)
}

/// Run a service call on the blocking pool (store access may hit the disk).
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(&TournamentService) -> Result<T, ServiceError> + Send + 'static,
{
    let ctx = state.clone();
    match tokio::task::spawn_blocking(move || f(&ctx.service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            log::error!("Blocking task failed: {}", e);
            Err(error_body(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
            ))
        }
    }
}

/// Passphrase gate for write endpoints. Returns the rejection when the check fails.
fn check_passphrase(state: &AppState, req: &HttpRequest) -> Option<HttpResponse> {
    let provided = req
        .headers()
        .get(PASSPHRASE_HEADER)
        .and_then(|v| v.to_str().ok());
    if state.config.passphrase_matches(provided) {
        None
    } else {
        log::warn!("Rejected {} {}: bad passphrase", req.method(), req.path());
        Some(error_body(
            actix_web::http::StatusCode::UNAUTHORIZED,
            "Passphrase required",
        ))
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "group-knockout-tracker",
    })
}

/// List all tournaments.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match run_blocking(&state, |s| s.list()).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(resp) => resp,
    }
}

/// Create a tournament: groups drawn at random, stage-1 matches scheduled.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    if let Some(resp) = check_passphrase(&state, &req) {
        return resp;
    }
    let body = body.into_inner();
    match run_blocking(&state, move |s| s.create(&body.name, body.participants, body.groups)).await
    {
        Ok(stored) => HttpResponse::Created().json(&stored.tournament),
        Err(resp) => resp,
    }
}

/// Store a complete tournament snapshot created elsewhere.
#[post("/api/tournaments/import")]
async fn api_import_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<Tournament>,
) -> HttpResponse {
    if let Some(resp) = check_passphrase(&state, &req) {
        return resp;
    }
    let tournament = body.into_inner();
    match run_blocking(&state, move |s| s.import(tournament)).await {
        Ok(stored) => HttpResponse::Created().json(&stored.tournament),
        Err(resp) => resp,
    }
}

/// Get a tournament by id with its stage and standings.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    match run_blocking(&state, move |s| s.get(id)).await {
        Ok(stored) => {
            let standings = compute_standings(&stored.tournament);
            HttpResponse::Ok().json(TournamentView {
                stage: stored.tournament.stage(),
                standings,
                revision: stored.revision,
                updated_at: stored.updated_at,
                tournament: stored.tournament,
            })
        }
        Err(resp) => resp,
    }
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    match run_blocking(&state, move |s| s.standings(id)).await {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(resp) => resp,
    }
}

/// Standings as CSV, participant names resolved.
#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    let stored = match run_blocking(&state, move |s| s.get(id)).await {
        Ok(stored) => stored,
        Err(resp) => return resp,
    };
    let mut buf = Vec::new();
    let standings = compute_standings(&stored.tournament);
    if let Err(e) = write_standings_csv(&standings, &stored.tournament.participants, &mut buf) {
        log::error!("CSV export of {} failed: {}", id, e);
        return error_body(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, e);
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(buf)
}

/// Knockout rounds in seeded display order.
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    match run_blocking(&state, move |s| s.bracket(id)).await {
        Ok(rounds) => HttpResponse::Ok().json(rounds),
        Err(resp) => resp,
    }
}

/// Record a score in the current stage.
#[post("/api/tournaments/{id}/score")]
async fn api_record_score(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<ScoreSubmission>,
) -> HttpResponse {
    if let Some(resp) = check_passphrase(&state, &req) {
        return resp;
    }
    let id = path.id;
    let submission = body.into_inner();
    match run_blocking(&state, move |s| s.record_score(id, &submission)).await {
        Ok((outcome, stored)) => HttpResponse::Ok().json(ScoreResponse {
            outcome,
            tournament: stored.tournament,
        }),
        Err(resp) => resp,
    }
}

/// Advance to the next stage once every match is played.
#[post("/api/tournaments/{id}/progress")]
async fn api_progress(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    if let Some(resp) = check_passphrase(&state, &req) {
        return resp;
    }
    let id = path.id;
    match run_blocking(&state, move |s| s.advance_stage(id)).await {
        Ok((progress, stored)) => HttpResponse::Ok().json(ProgressResponse {
            progress,
            tournament: stored.tournament,
        }),
        Err(resp) => resp,
    }
}

fn open_store(config: &ServerConfig) -> std::io::Result<Arc<dyn MatchStore>> {
    match &config.data_dir {
        Some(dir) => {
            let store = JsonFileStore::open(dir)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Ok(Arc::new(store))
        }
        None => {
            log::info!("DATA_DIR not set, tournaments are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    if config.passphrase.is_some() {
        log::info!("Write endpoints require the {} header", PASSPHRASE_HEADER);
    }
    let store = open_store(&config)?;
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppContext {
        service: TournamentService::new(store),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(actix_web::middleware::Logger::default())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_bracket)
            .service(api_record_score)
            .service(api_progress)
            .service(api_get_tournament)
    })
    .bind(bind)?
    .run()
    .await
}
