//! `Auth` request extractor: pulls a bearer token out of the
//! `Authorization` header and validates it against the configured auth
//! service. Mirrors the teacher's `Auth`/`FromRequest` extractor, minus
//! the session-revocation lookup this system has no session table for.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::{AuthService, Claims};

pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_service = req.app_data::<web::Data<Arc<AuthService>>>().cloned();
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_owned());
        Box::pin(async move {
            let header = header.ok_or_else(|| actix_web::error::ErrorUnauthorized("missing authorization header"))?;
            let token = header
                .strip_prefix("Bearer ")
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("invalid authorization format"))?;
            let service = auth_service.ok_or_else(|| actix_web::error::ErrorInternalServerError("auth service not configured"))?;
            let claims = service
                .validate_token(token)
                .await
                .map_err(|_| actix_web::error::ErrorUnauthorized("invalid or expired token"))?;
            Ok(Auth(claims))
        })
    }
}
