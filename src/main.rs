use crate::{
    config::{AppConfig, SeedHostel},
    db::{hostel_repository::HostelRepository, schema::init_db},
    models::hostel::Hostel,
    state::AppState,
    utils::{ensure_data_dir, token::TokenService},
};
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod utils;

// Hostels are managed outside this service; seeding lets a fresh database
// accept registrations.
fn seed_hostel(state: &AppState, seed: &SeedHostel) -> Result<(), errors::AdminError> {
    state.with_conn(|conn| {
        let repo = HostelRepository::new(conn);
        if repo.find_hostel_by_name(&seed.name)?.is_none() {
            info!("Hostel '{}' not found, creating...", seed.name);
            repo.create_hostel(&Hostel::new(
                seed.name.clone(),
                seed.location.clone(),
                0,
                0,
            ))?;
            info!("Hostel '{}' created", seed.name);
        } else {
            info!("Hostel '{}' already exists", seed.name);
        }
        Ok(())
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    if let Err(e) = ensure_data_dir(&config.database_path) {
        warn!("Failed to create data directory: {}", e);
    }

    let conn = init_db(&config.database_path).map_err(|e| {
        error!("Failed to open database {}: {}", config.database_path, e);
        std::io::Error::other(e.to_string())
    })?;

    let state = web::Data::new(AppState::new(
        conn,
        TokenService::new(&config.jwt_secret, config.jwt_expiry_secs),
        config.bcrypt_cost,
    ));

    if let Some(seed) = &config.seed_hostel {
        if let Err(e) = seed_hostel(&state, seed) {
            error!("Failed to seed hostel: {}", e);
        }
    }

    info!("Starting server on http://{}:{}...", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(actix_web::middleware::Logger::default())
            .configure(routes::admin::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
