//! Notes REST API, the HTTP surface over the query engine and lifecycle
//! manager. Handlers resolve the bearer token to a user identity first and
//! pass that identity into every core call; status mapping and JSON
//! envelopes live here, decision logic does not.

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{CreateNoteRequest, UpdateNoteRequest};
use crate::notes::{FilterRequest, NoteError};
use crate::AppState;

/// Resolve the session token from the request to a user id, or reject.
/// Every notes route goes through this before touching the engine.
pub(crate) fn require_user(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<i64, HttpResponse> {
    let token = match super::auth::bearer_token(req) {
        Some(t) => t,
        None => {
            return Err(HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "No authorization token provided"
            })));
        }
    };

    match state.db.validate_session(&token) {
        Ok(Some(session)) => Ok(session.user_id),
        Ok(None) => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid or expired session"
        }))),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })))
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Note not found"
    }))
}

fn engine_error(context: &str, err: NoteError) -> HttpResponse {
    match err {
        NoteError::EmptyTitle => HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string()
        })),
        NoteError::Storage(e) => {
            log::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Storage unavailable"
            }))
        }
    }
}

async fn list_notes(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<FilterRequest>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.query_engine.list(user_id, &query) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => engine_error("Failed to list notes", e),
    }
}

async fn get_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.query_engine.get(user_id, note_id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => engine_error("Failed to get note", e),
    }
}

async fn create_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.lifecycle.create(user_id, &body.title, &body.text) {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => engine_error("Failed to create note", e),
    }
}

async fn update_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.lifecycle.edit(user_id, note_id, &body.title, &body.text) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => engine_error("Failed to update note", e),
    }
}

async fn archive_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.lifecycle.archive(user_id, note_id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => engine_error("Failed to archive note", e),
    }
}

async fn unarchive_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.lifecycle.unarchive(user_id, note_id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => engine_error("Failed to unarchive note", e),
    }
}

async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.lifecycle.delete(user_id, note_id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "deleted": true })),
        Ok(false) => not_found(),
        Err(e) => engine_error("Failed to delete note", e),
    }
}

async fn delete_archived_notes(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.lifecycle.delete_all_archived(user_id) {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "deleted": count })),
        Err(e) => engine_error("Failed to delete archived notes", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("", web::delete().to(delete_archived_notes))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::patch().to(update_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/archive", web::post().to(archive_note))
            .route("/{id}/unarchive", web::post().to(unarchive_note)),
    );
}
