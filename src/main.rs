use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

use face_attendance::clock::{Clock, SystemClock};
use face_attendance::config::Config;
use face_attendance::db::init_store;
use face_attendance::docs::ApiDoc;
use face_attendance::jobs::daily_reset::DailyReset;
use face_attendance::routes;
use face_attendance::scheduler::Scheduler;
use face_attendance::service::AttendanceService;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Face recognition attendance service"
}

/// Daily rolling log file; keep the guard alive or buffered lines are lost.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    guard
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    let _guard = init_tracing(&config);

    info!(addr = %config.server_addr, "Server starting...");

    let store = init_store(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.use_utc));

    let scheduler = Scheduler::new(clock.clone())
        .add(
            config.reset_schedule(),
            Arc::new(DailyReset::new(store.clone(), clock.clone())),
        )
        .start();

    let service = Data::new(AttendanceService::new(
        store.clone(),
        clock.clone(),
        config.min_confidence,
    ));
    let limiter = routes::build_limiter(config.rate_mark_per_min);
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config_data, limiter.as_ref()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run();

    let result = server.await;

    info!("Server stopped, shutting down background jobs");
    scheduler.shutdown().await;
    store.close().await;
    info!("Shutdown complete");

    result.context("HTTP server failed")
}
