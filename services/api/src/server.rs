use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState, FixtureFile, InMemorySubmissionStore};
use crate::routes::with_submission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use govbid::config::AppConfig;
use govbid::error::AppError;
use govbid::storage::SqliteSubmissionStore;
use govbid::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.storage.database_path = Some(database);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let router = match &config.storage.database_path {
        Some(path) => {
            info!(database = %path.display(), "using SQLite submission store");
            let store = Arc::new(SqliteSubmissionStore::open(path)?);
            with_submission_routes(Arc::new(build_service(store, &config.llm)?))
        }
        None => {
            info!("no database configured; serving demo proposals from memory");
            let store = Arc::new(InMemorySubmissionStore::default());
            FixtureFile::demo()?.load_into_memory(&store)?;
            with_submission_routes(Arc::new(build_service(store, &config.llm)?))
        }
    };

    let app = router.layer(Extension(app_state)).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "submission readiness service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
