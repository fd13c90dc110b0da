use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrms_lite::config::{Config, StoreBackend};
use hrms_lite::db::{ensure_schema, init_db};
use hrms_lite::docs::ApiDoc;
use hrms_lite::routes;
use hrms_lite::service::{AttendanceLedger, EmployeeRegistry};
use hrms_lite::store::{DocumentStore, MemoryStore, MySqlStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

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

    info!(backend = %config.store_backend, addr = %config.server_addr, "Server starting...");

    // One store per process, shared by every worker.
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory if config.memory_sample_data => Arc::new(MemoryStore::with_sample_data()),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::MySql => {
            let pool = init_db(config.require_database_url()?).await?;
            ensure_schema(&pool).await?;
            Arc::new(MySqlStore::new(pool))
        }
    };

    let registry = EmployeeRegistry::new(store.clone());
    let ledger = AttendanceLedger::new(store.clone());
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(registry.clone()))
            .app_data(Data::new(ledger.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
