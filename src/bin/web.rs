//! Single binary JSON API over the bracket engine, backed by the in-memory fixture store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, FIXTURE_IDLE_HOURS (fixtures untouched this long are dropped).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    get_rankings, shuffle_seeding, Competitor, EngineError, Fixture, FixtureId, FixtureStatus,
    FixtureStore, MatchId, MemoryFixtureStore,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

type AppState = Data<MemoryFixtureStore>;

/// Runtime settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    idle_hours: i64,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            idle_hours: std::env::var("FIXTURE_IDLE_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(default_idle_hours),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_idle_hours() -> i64 {
    12
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CompetitorBody {
    name: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct CreateFixtureBody {
    /// In seeding order unless `shuffle` is set.
    competitors: Vec<CompetitorBody>,
    #[serde(default)]
    shuffle: bool,
}

#[derive(Deserialize)]
struct ReportResultBody {
    match_id: MatchId,
    winner_id: Uuid,
}

#[derive(Deserialize)]
struct UndoBody {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct StatusBody {
    status: FixtureStatus,
}

/// Path segment: fixture id (e.g. /api/fixtures/{id})
#[derive(Deserialize)]
struct FixturePath {
    id: FixtureId,
}

fn bad_request(e: EngineError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found(id: FixtureId) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": EngineError::UnknownFixture(id).to_string()
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a fixture and generate its bracket (returns it with id).
#[post("/api/fixtures")]
async fn api_create_fixture(store: AppState, body: Json<CreateFixtureBody>) -> HttpResponse {
    let body = body.into_inner();
    if body.competitors.iter().any(|c| c.name.trim().is_empty()) {
        return bad_request(EngineError::InvalidInput(
            "competitor names must not be blank".to_string(),
        ));
    }
    let mut competitors: Vec<Competitor> = body
        .competitors
        .into_iter()
        .map(|c| Competitor {
            attributes: c.attributes,
            ..Competitor::new(c.name.trim())
        })
        .collect();
    if body.shuffle {
        shuffle_seeding(&mut competitors, &mut rand::thread_rng());
    }
    match Fixture::start(&competitors) {
        Ok(fixture) => {
            log::info!(
                "fixture {} started with {} competitors",
                fixture.id,
                fixture.competitors.len()
            );
            store.set(fixture.clone());
            HttpResponse::Ok().json(fixture)
        }
        Err(e) => bad_request(e),
    }
}

/// Get a fixture by id (404 if not found).
#[get("/api/fixtures/{id}")]
async fn api_get_fixture(store: AppState, path: Path<FixturePath>) -> HttpResponse {
    match store.get(path.id) {
        Some(fixture) => HttpResponse::Ok().json(fixture),
        None => not_found(path.id),
    }
}

#[delete("/api/fixtures/{id}")]
async fn api_delete_fixture(store: AppState, path: Path<FixturePath>) -> HttpResponse {
    match store.remove(path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => not_found(path.id),
    }
}

/// Report the winner of a ready match. Returns the updated graph, ledger delta and rankings.
#[post("/api/fixtures/{id}/results")]
async fn api_report_result(
    store: AppState,
    path: Path<FixturePath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    let mut fixture = match store.get(path.id) {
        Some(f) => f,
        None => return not_found(path.id),
    };
    match fixture.report_result(body.match_id, body.winner_id) {
        Ok(report) => {
            store.set(fixture);
            HttpResponse::Ok().json(report)
        }
        Err(e) => bad_request(e),
    }
}

/// Take back a previously reported result.
#[post("/api/fixtures/{id}/undo")]
async fn api_undo_result(
    store: AppState,
    path: Path<FixturePath>,
    body: Json<UndoBody>,
) -> HttpResponse {
    let mut fixture = match store.get(path.id) {
        Some(f) => f,
        None => return not_found(path.id),
    };
    match fixture.undo_result(body.match_id) {
        Ok(report) => {
            store.set(fixture);
            HttpResponse::Ok().json(report)
        }
        Err(e) => bad_request(e),
    }
}

#[get("/api/fixtures/{id}/rankings")]
async fn api_get_rankings(store: AppState, path: Path<FixturePath>) -> HttpResponse {
    let fixture = match store.get(path.id) {
        Some(f) => f,
        None => return not_found(path.id),
    };
    match get_rankings(&fixture.graph) {
        Ok(rankings) => HttpResponse::Ok().json(rankings),
        Err(e) => bad_request(e),
    }
}

/// Pause or resume a fixture.
#[put("/api/fixtures/{id}/status")]
async fn api_set_status(
    store: AppState,
    path: Path<FixturePath>,
    body: Json<StatusBody>,
) -> HttpResponse {
    let mut fixture = match store.get(path.id) {
        Some(f) => f,
        None => return not_found(path.id),
    };
    let result = match body.status {
        FixtureStatus::Paused => fixture.pause(),
        FixtureStatus::Active => fixture.resume(),
        FixtureStatus::Completed => Err(EngineError::InvalidInput(
            "a fixture completes by playing its grand final".to_string(),
        )),
    };
    match result {
        Ok(()) => {
            store.set(fixture.clone());
            HttpResponse::Ok().json(fixture)
        }
        Err(e) => bad_request(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let store = Data::new(MemoryFixtureStore::new());

    // Background task: every 30 minutes, drop fixtures idle for longer than the configured window
    let store_cleanup = store.clone();
    let max_idle = chrono::Duration::hours(config.idle_hours);
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = store_cleanup.evict_idle(max_idle);
            if removed > 0 {
                log::info!("Cleaned up {} idle fixture(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .service(api_health)
            .service(api_create_fixture)
            .service(api_get_fixture)
            .service(api_delete_fixture)
            .service(api_report_result)
            .service(api_undo_result)
            .service(api_get_rankings)
            .service(api_set_status)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
