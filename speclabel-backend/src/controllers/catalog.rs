//! Read endpoints over the in-memory star table.
//!
//! `/get_initial_data` is the bulk fetch the UI loads once; `/get_spectrum`
//! is the per-position display payload, images resolved at request time.

use actix_web::{HttpResponse, Responder, web};

use crate::AppState;
use crate::config::{halpha_fig_dir, li_fig_dir};
use crate::imagery;

async fn get_initial_data(data: web::Data<AppState>) -> impl Responder {
    let table = data.table.lock().unwrap();

    HttpResponse::Ok().json(serde_json::json!({
        "star_data": table.rows_json(),
        "total": table.len(),
    }))
}

async fn get_spectrum(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let index = path.into_inner();
    let table = data.table.lock().unwrap();

    let record = match table.get(index) {
        Ok(record) => record,
        Err(e) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let images = imagery::locate(&li_fig_dir(), &halpha_fig_dir(), record.obsid);

    HttpResponse::Ok().json(serde_json::json!({
        "obsid": record.obsid,
        "li_img": images.li_img,
        "halpha_img": images.halpha_img,
        "label": record.label,
        "tag_count": record.tag,
        "notes": record.notes_list(),
        "total": table.len(),
        "position": index + 1,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/get_initial_data", web::get().to(get_initial_data))
        .route("/get_spectrum/{index}", web::get().to(get_spectrum));
}
