use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method},
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult};
use platform_db::{DbCompensationStore, DbEmployeeStore, DbPool};
use products_hr::{
    Compensation, CompensationDraft, CompensationService, Employee, EmployeeDraft,
    EmployeeService, HrError, ReportingStructure,
    memory::{InMemoryCompensationStore, InMemoryEmployeeStore},
};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub compensation: CompensationService,
    pub pool: Option<DbPool>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn with_pool(config: Arc<AppConfig>, pool: DbPool) -> Self {
        Self {
            employees: EmployeeService::new(Arc::new(DbEmployeeStore::new(pool.clone()))),
            compensation: CompensationService::new(Arc::new(DbCompensationStore::new(
                pool.clone(),
            ))),
            pool: Some(pool),
            config,
        }
    }

    /// State backed by process-local stores; nothing survives a restart.
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            employees: EmployeeService::new(Arc::new(InMemoryEmployeeStore::new())),
            compensation: CompensationService::new(Arc::new(InMemoryCompensationStore::new())),
            pool: None,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hr server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    let cors = cors_layer(&state.config.cors_allowed_origins);
    Router::new()
        .route("/health", get(health_handler))
        .route("/employee", post(create_employee))
        .route("/employee/{id}", get(read_employee).put(update_employee))
        .route("/employee/reporting/{id}", get(reporting_structure))
        .route("/compensation", post(create_compensation))
        .route("/compensation/{id}", get(read_compensation))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn create_employee(
    State(state): State<AppState>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Json<Employee>> {
    debug!("received employee create request");
    let employee = state.employees.create(draft).await.map_err(api_error)?;
    Ok(Json(employee))
}

async fn read_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    debug!(%id, "received employee read request");
    let employee = state.employees.read(&id).await.map_err(api_error)?;
    Ok(Json(employee))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Json<Employee>> {
    debug!(%id, "received employee update request");
    let employee = state.employees.update(&id, draft).await.map_err(api_error)?;
    Ok(Json(employee))
}

/// Responds `null` rather than an error when the employee does not exist.
async fn reporting_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<ReportingStructure>>> {
    debug!(%id, "received reporting structure request");
    let structure = state
        .employees
        .reporting_structure(&id)
        .await
        .map_err(api_error)?;
    Ok(Json(structure))
}

async fn create_compensation(
    State(state): State<AppState>,
    Json(draft): Json<CompensationDraft>,
) -> ApiResult<Json<Compensation>> {
    debug!(employee_id = ?draft.employee_id(), "received compensation create request");
    let compensation = state.compensation.create(draft).await.map_err(api_error)?;
    Ok(Json(compensation))
}

async fn read_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Compensation>>> {
    debug!(%id, "received compensation read request");
    let compensation = state.compensation.read(&id).await.map_err(api_error)?;
    Ok(Json(compensation))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = match &state.pool {
        Some(pool) => pool
            .execute(Statement::from_string(
                pool.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .is_ok(),
        None => true,
    };
    Json(HealthResponse {
        ok: store_ok,
        store_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    version: &'static str,
}

fn api_error(err: HrError) -> ApiError {
    match err {
        HrError::NotFound(_) => ApiError::NotFound(err.to_string()),
        HrError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        HrError::Store(inner) => ApiError::internal(inner.into()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
