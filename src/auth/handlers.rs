use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::auth::jwt::generate_session_token;
use crate::config::Config;

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer", value_type = String)]
    pub token_type: &'static str,
    #[schema(example = "2f1c7e0a-6b5d-4c1e-9f3a-8d2b7c6e5a41")]
    pub session_id: String,
    /// Seconds until the token expires.
    #[schema(example = 86400)]
    pub expires_in: usize,
}

/// Anonymous sign-in. Called once per client session before any store access.
#[utoipa::path(
    post,
    path = "/auth/anonymous",
    responses(
        (status = 200, description = "Session started", body = SessionResponse),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Could not start a session"
        }))
    ),
    tag = "Session"
)]
#[instrument(name = "auth_anonymous", skip(config))]
pub async fn anonymous_sign_in(config: web::Data<Config>) -> impl Responder {
    match generate_session_token(&config.jwt_secret, config.session_ttl) {
        Ok((access_token, claims)) => {
            info!(session_id = %claims.sub, "Anonymous session started");
            HttpResponse::Ok().json(SessionResponse {
                access_token,
                token_type: "Bearer",
                session_id: claims.sub,
                expires_in: config.session_ttl,
            })
        }
        Err(e) => {
            error!(error = %e, "Failed to sign session token");
            HttpResponse::InternalServerError().json(json!({
                "message": "Could not start a session"
            }))
        }
    }
}
