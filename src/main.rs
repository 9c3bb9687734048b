use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use settings::{Settings, Storage};
use store::{EventStore, MemoryStore, MongoStore};
use tracing_subscriber::EnvFilter;

mod balance;
mod error;
mod routes;
mod schemas;
mod settings;
mod settlement;
mod store;
mod validation;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::new().map_err(std::io::Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.level)),
        )
        .init();

    let store: Arc<dyn EventStore> = match settings.storage {
        Storage::Memory => {
            tracing::warn!("using in-memory storage, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
        Storage::Mongo => {
            let uri = settings.database.uri.as_deref().ok_or_else(|| {
                std::io::Error::other("You need to add the MONGODB_URI to the env")
            })?;
            tracing::info!("Using the following URI: {}", uri);
            let store = MongoStore::connect(uri, &settings.database.name)
                .await
                .map_err(std::io::Error::other)?;
            tracing::info!("Connected");
            Arc::new(store)
        }
    };

    let store = web::Data::from(store);
    let validation = web::Data::new(settings.validation.clone());
    let debug_routes = settings.server.debug_routes;

    tracing::info!(
        "Listening on {}:{}",
        settings.server.host,
        settings.server.port
    );
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(validation.clone())
            .configure(|cfg| routes::configure(cfg, debug_routes))
    })
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run()
    .await
}
