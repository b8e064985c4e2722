use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod models;
mod notes;

use db::Database;
use notes::{LifecycleManager, QueryEngine};

pub struct AppState {
    pub db: Arc<Database>,
    pub query_engine: QueryEngine,
    pub lifecycle: LifecycleManager,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let db_path = config::database_url();
    let db = Arc::new(
        Database::new(&db_path)
            .unwrap_or_else(|e| panic!("Failed to open database at {}: {}", db_path, e)),
    );

    // Periodically purge expired auth sessions so the table stays bounded
    let sweeper_db = Arc::clone(&db);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match sweeper_db.delete_expired_sessions() {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {} expired sessions", n),
                Err(e) => log::warn!("Failed to purge expired sessions: {}", e),
            }
        }
    });

    let port = config::port();
    log::info!("Listening on http://0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                query_engine: QueryEngine::new(Arc::clone(&db)),
                lifecycle: LifecycleManager::new(Arc::clone(&db)),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::auth::config)
            .configure(controllers::notes::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
