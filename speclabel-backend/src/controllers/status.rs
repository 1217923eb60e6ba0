//! Diagnostic endpoint: reports which of the on-disk pieces the service
//! depends on actually exist, for debugging a misconfigured deployment.

use actix_web::{HttpResponse, Responder, web};

use crate::{AppState, config};

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/debug").route(web::get().to(debug_status)));
}

async fn debug_status(state: web::Data<AppState>) -> impl Responder {
    let star_data_count = state.table.lock().unwrap().len();

    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION,
        "static_dir": config::static_dir().to_string_lossy(),
        "li_dir_exists": config::li_fig_dir().exists(),
        "halpha_dir_exists": config::halpha_fig_dir().exists(),
        "csv_exists": state.config.star_table.exists(),
        "log_exists": state.config.log_path().exists(),
        "star_data_count": star_data_count,
    }))
}
