use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::api::{
    ApiSimulationRequest, ApiSimulationResponse, ContactRequest, ErrorBody, FavoriteRequest,
    FavoriteResponse,
};
use venture_sim::config::SimConfig;
use venture_sim::ideas::{Idea, IdeaCatalog};
use venture_sim::store::{ContactSubmission, Scenario, ScenarioInput, Workspace};
use venture_sim::{compose, RngJitter, SimError, SimResult, SimulationResult};

/// Stores and the jitter RNG live behind one lock so each request sees and
/// replaces whole collections.
struct Session {
    workspace: Workspace,
    jitter: RngJitter<StdRng>,
}

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
    catalog: Arc<IdeaCatalog>,
    list_limit: usize,
}

#[derive(Deserialize)]
struct TagQuery {
    tag: Option<String>,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn serve(
    args: crate::ServeArgs,
    config: SimConfig,
    catalog: IdeaCatalog,
    workspace: Workspace,
) -> SimResult<()> {
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let web_root = args.web_root.unwrap_or(config.server.web_root);

    let state = AppState {
        session: Arc::new(Mutex::new(Session {
            workspace,
            jitter: RngJitter::from_seed(config.jitter.seed),
        })),
        catalog: Arc::new(catalog),
        list_limit: config.storage.list_limit,
    };

    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(&web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/ideas", get(ideas_handler))
        .route("/api/simulate", post(simulate_handler))
        .route("/api/scenarios", get(scenarios_handler))
        .route("/api/scenarios/:id", get(scenario_handler))
        .route("/api/last-run", get(last_run_handler))
        .route("/api/favorites", get(favorites_handler).post(add_favorite_handler))
        .route("/api/contact", post(contact_handler))
        .fallback_service(static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| SimError::Config(format!("invalid bind address: {}", err)))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| SimError::Config(format!("failed to bind server: {}", err)))?;

    info!(%addr, web_root = %web_root, "serving simulator");
    axum::serve(listener, app)
        .await
        .map_err(|err| SimError::Config(format!("server error: {}", err)))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn ideas_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Json<Vec<Idea>> {
    let tag = query.tag.unwrap_or_else(|| "all".to_string());
    Json(state.catalog.filter(&tag).into_iter().cloned().collect())
}

async fn simulate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiSimulationRequest>,
) -> ApiResult<ApiSimulationResponse> {
    let save = request.save.unwrap_or(false);
    let input = request.into_input(&state.catalog).map_err(api_error)?;

    let response = with_session(&state, move |session| {
        let result = compose(&input, &mut session.jitter)?;

        // Storage failures are reported alongside the score, never instead of it.
        let mut warnings = Vec::new();
        if let Err(err) = session.workspace.last_run.store(&result) {
            warn!(error = %err, "failed to cache last run");
            warnings.push(format!("last run not cached: {}", err));
        }
        let scenario = if save {
            match session
                .workspace
                .scenarios
                .save(ScenarioInput::from_run(&input, &result))
            {
                Ok(scenario) => Some(scenario),
                Err(err) => {
                    warn!(error = %err, "failed to save scenario");
                    warnings.push(format!("scenario not saved: {}", err));
                    None
                }
            }
        } else {
            None
        };
        Ok(ApiSimulationResponse::from_result(result, scenario, warnings))
    })
    .await;

    response.map(Json).map_err(api_error)
}

async fn scenarios_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<Scenario>> {
    let limit = query.limit.unwrap_or(state.list_limit);
    with_session(&state, move |session| {
        session.workspace.scenarios.list_recent(limit)
    })
    .await
    .map(Json)
    .map_err(api_error)
}

async fn scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Scenario> {
    with_session(&state, move |session| session.workspace.scenarios.load_by_id(id))
        .await
        .map(Json)
        .map_err(api_error)
}

async fn last_run_handler(State(state): State<AppState>) -> ApiResult<Option<SimulationResult>> {
    with_session(&state, |session| session.workspace.last_run.load())
        .await
        .map(Json)
        .map_err(api_error)
}

async fn favorites_handler(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    with_session(&state, |session| session.workspace.favorites.list())
        .await
        .map(Json)
        .map_err(api_error)
}

async fn add_favorite_handler(
    State(state): State<AppState>,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<FavoriteResponse> {
    with_session(&state, move |session| {
        let favorites = &session.workspace.favorites;
        let added = favorites.add(&request.title)?;
        let favorites = favorites.list()?;
        Ok(FavoriteResponse { added, favorites })
    })
    .await
    .map(Json)
    .map_err(api_error)
}

async fn contact_handler(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> ApiResult<ContactSubmission> {
    with_session(&state, move |session| {
        session.workspace.contacts.submit(
            request.name.as_deref().unwrap_or_default(),
            request.email.as_deref().unwrap_or_default(),
            request.msg.as_deref().unwrap_or_default(),
        )
    })
    .await
    .map(Json)
    .map_err(api_error)
}

/// Runs `job` on the blocking pool while holding the session lock, since the
/// stores read and write files synchronously.
async fn with_session<T, F>(state: &AppState, job: F) -> SimResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Session) -> SimResult<T> + Send + 'static,
{
    let mut session = state.session.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || job(&mut *session))
        .await
        .map_err(|err| SimError::storage(format!("storage task failed: {}", err)))?
}

fn api_error(err: SimError) -> ApiError {
    let status = match err {
        SimError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SimError::NotFound(_) => StatusCode::NOT_FOUND,
        SimError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SimError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            session: Arc::new(Mutex::new(Session {
                workspace: Workspace::in_memory(),
                jitter: RngJitter::from_seed(Some(7)),
            })),
            catalog: Arc::new(IdeaCatalog::builtin()),
            list_limit: 6,
        }
    }

    #[tokio::test]
    async fn session_jobs_share_one_workspace() {
        let state = state();
        let added = with_session(&state, |session| session.workspace.favorites.add("Eco Bags"))
            .await
            .unwrap();
        assert!(added);

        let favorites = with_session(&state, |session| session.workspace.favorites.list())
            .await
            .unwrap();
        assert_eq!(favorites, vec!["Eco Bags".to_string()]);
    }

    #[tokio::test]
    async fn job_errors_keep_their_kind() {
        let state = state();
        let err = with_session(&state, |session| session.workspace.scenarios.load_by_id(5))
            .await
            .unwrap_err();
        assert_eq!(api_error(err).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn default_web_root_ships_an_index_page() {
        let web_root = SimConfig::default().server.web_root;
        let index = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join(web_root)
            .join("index.html");
        let page = std::fs::read_to_string(index).unwrap();
        for route in ["/api/ideas", "/api/simulate", "/api/scenarios", "/api/favorites"] {
            assert!(page.contains(route), "page never calls {}", route);
        }
    }
}
