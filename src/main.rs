use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use review_assigner::database::init_database;
use review_assigner::middleware::RequestId;
use review_assigner::{AppState, Config, RandomSelector, ReviewerSelector};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    env_logger::init();

    log::info!("Starting review assigner...");

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);
    if config.admin_token.is_none() {
        log::warn!("ADMIN_TOKEN is not set; admin endpoints will reject every request");
    }

    let pool = init_database(&config).await?;
    log::info!("Database initialized");

    let selector: Arc<dyn ReviewerSelector> = Arc::new(RandomSelector);
    let app_state = AppState::new(pool.clone(), selector);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        let state = app_state.clone();

        App::new()
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(move |cfg| state.configure(cfg))
    })
    .shutdown_timeout(config.shutdown_timeout_secs)
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
