use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use tasknexus::config::{Config, StorageBackend};
use tasknexus::routes::{self, health};
use tasknexus::store::{MemoryStore, PgStore, TaskStore, UserStore};
use tasknexus::AppState;

fn startup_error<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

async fn open_stores(config: &Config) -> io::Result<(Arc<dyn UserStore>, Arc<dyn TaskStore>)> {
    match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| startup_error("DATABASE_URL must be set"))?;
            let store = PgStore::connect(url).await.map_err(startup_error)?;
            store.migrate().await.map_err(startup_error)?;
            let store = Arc::new(store);
            let users: Arc<dyn UserStore> = store.clone();
            let tasks: Arc<dyn TaskStore> = store;
            Ok((users, tasks))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; all data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let tasks: Arc<dyn TaskStore> = store;
            Ok((users, tasks))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        startup_error(e)
    })?;

    let (users, tasks) = open_stores(&config).await?;
    let state = AppState::from_config(&config, users, tasks).map_err(startup_error)?;

    log::info!("Starting server at {}", config.server_url());
    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);
        let state = state.clone();

        App::new()
            .configure(|cfg| state.configure(cfg))
            .configure(routes::json_config)
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
