use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Mutex;

mod catalog;
mod config;
mod controllers;
mod imagery;
mod labellog;

use catalog::StarTable;
use config::Config;

pub struct AppState {
    /// The star table, loaded once at startup. The mutex serializes every
    /// read-modify-write save so concurrent requests cannot lose updates.
    pub table: Mutex<StarTable>,
    pub config: Config,
}

/// Serve the labeling UI's index.html when the static bundle is present.
async fn index() -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(config::static_dir().join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("speclabel-backend v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using star table: {}", config.star_table.display());
    log::info!("Logging saves to: {}", config.log_path().display());

    if let Err(e) = config::initialize_workspace(&config) {
        log::error!("Failed to initialize workspace: {}", e);
    }

    let table = StarTable::load(&config.star_table).expect("Failed to load star table");
    log::info!("Loaded {} observation(s)", table.len());

    let serve_static = config::static_dir().join("index.html").exists();
    if !serve_static {
        log::warn!(
            "Static frontend not found at {:?} - UI serving disabled, JSON API only",
            config::static_dir()
        );
    }

    let state = web::Data::new(AppState {
        table: Mutex::new(table),
        config,
    });

    log::info!("Starting speclabel server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::status::config_routes)
            .configure(controllers::catalog::config)
            .configure(controllers::labels::config)
            .configure(controllers::images::config);

        if serve_static {
            app = app
                .route("/", web::get().to(index))
                .service(Files::new("/static", config::static_dir()));
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
