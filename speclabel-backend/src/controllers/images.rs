//! Raw image byte serving for the two spectral-region crops.
//!
//! Filenames are suffix-mapped to exactly one directory; anything else is
//! rejected before touching the filesystem.

use actix_web::{HttpResponse, web};

use crate::config::{halpha_fig_dir, li_fig_dir};
use crate::imagery;

async fn serve_image(path: web::Path<String>) -> HttpResponse {
    let filename = path.into_inner();

    let dir = match imagery::resolve_dir(&li_fig_dir(), &halpha_fig_dir(), &filename) {
        Some(dir) => dir,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Invalid filename"
            }));
        }
    };

    match tokio::fs::read(dir.join(&filename)).await {
        Ok(contents) => HttpResponse::Ok()
            .content_type("image/jpeg")
            .append_header(("Cache-Control", "public, max-age=300"))
            .body(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "File not found"
            }))
        }
        Err(e) => {
            log::error!("Failed to serve image {}: {}", filename, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/images/{filename}", web::get().to(serve_image));
}
