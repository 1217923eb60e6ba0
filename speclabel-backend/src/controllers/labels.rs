//! Label save endpoint and last-save lookup for cross-session resume.

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::catalog::NOTES_DELIMITER;
use crate::labellog;

#[derive(Debug, Deserialize)]
struct SaveLabelRequest {
    #[serde(default)]
    label: String,
    #[serde(default)]
    notes: Vec<String>,
    obsid: Option<i64>,
}

async fn save_label(
    data: web::Data<AppState>,
    body: web::Json<SaveLabelRequest>,
) -> impl Responder {
    let req = body.into_inner();

    let obsid = match req.obsid {
        Some(obsid) => obsid,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "No obsid provided"
            }));
        }
    };

    // Hold the table lock across the whole read-modify-write sequence so a
    // second save cannot interleave between the tag read and the rewrite.
    let mut table = data.table.lock().unwrap();

    let index = match table.find_by_obsid(obsid) {
        Some(index) => index,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid obsid"
            }));
        }
    };

    let notes_joined = req.notes.join(NOTES_DELIMITER);
    let new_tag = table.records()[index].next_tag();

    // Log first, then memory, then the CSV rewrite. The log line survives
    // even if the rewrite fails, so the action is never silently lost.
    if let Err(e) = labellog::append(
        &data.config.log_path(),
        obsid,
        &req.label,
        &notes_joined,
        &new_tag,
    ) {
        log::error!("Failed to append to save log: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    match table.save(index, &req.label, &notes_joined) {
        Ok(new_tag) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "new_tag": new_tag,
            "label": req.label,
            "notes": notes_joined,
            "updated_data": table.rows_json(),
        })),
        Err(e) => {
            log::error!("Failed to save label for obsid {}: {}", obsid, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn get_shared_last_obsid(data: web::Data<AppState>) -> impl Responder {
    let last_obsid = match labellog::last_entry(&data.config.log_path()) {
        Ok(last) => last,
        Err(e) => {
            log::error!("Failed to read save log: {}", e);
            None
        }
    };

    HttpResponse::Ok().json(serde_json::json!({ "last_obsid": last_obsid }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/save_label", web::post().to(save_label))
        .route("/get_shared_last_obsid", web::get().to(get_shared_last_obsid));
}
