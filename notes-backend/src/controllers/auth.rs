//! Auth routes (signup, login, logout, current user).
//!
//! Thin glue around the users and auth_sessions tables. Note operations
//! never touch credentials; they only consume the user identity a valid
//! session token resolves to.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::AppState;

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    username: String,
    password: String,
}

fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Extract the bearer token from the Authorization header
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_start_matches("Bearer ").to_string())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

async fn signup(data: web::Data<AppState>, body: web::Json<CredentialsRequest>) -> impl Responder {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Username and password are required"
        }));
    }

    let user = match data.db.create_user(username, &password_digest(&body.password)) {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Username is already taken"
            }));
        }
        Err(e) => {
            log::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    match data.db.create_session(user.id) {
        Ok(session) => HttpResponse::Created().json(serde_json::json!({
            "token": session.token,
            "username": user.username
        })),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

async fn login(data: web::Data<AppState>, body: web::Json<CredentialsRequest>) -> impl Responder {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Username and password are required"
        }));
    }

    let user = match data.db.find_user_by_username(username) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Wrong username or password"
            }));
        }
        Err(e) => {
            log::error!("Failed to look up user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    if user.password_hash != password_digest(&body.password) {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Wrong username or password"
        }));
    }

    match data.db.create_session(user.id) {
        Ok(session) => HttpResponse::Ok().json(serde_json::json!({
            "token": session.token,
            "username": user.username
        })),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "No authorization token provided"
            }));
        }
    };

    match data.db.delete_session(&token) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Failed to delete session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

async fn me(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user_id = match super::notes::require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.db.get_user(user_id) {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid or expired session"
        })),
        Err(e) => {
            log::error!("Failed to load user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_digest_is_stable_hex() {
        let digest = password_digest("hunter2");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, password_digest("hunter2"));
        assert_ne!(digest, password_digest("hunter3"));
    }
}
