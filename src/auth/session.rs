use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::models::Claims;

/// The anonymous admin session behind a request.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub expires_at: usize,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            session_id: claims.sub,
            expires_at: claims.exp,
        }
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Set by the session middleware on guarded routes.
        if let Some(session) = req.extensions().get::<Session>() {
            return ready(Ok(session.clone()));
        }

        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        match verify_token(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(Session::from(claims))),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
        }
    }
}
