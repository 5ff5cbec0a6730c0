use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::respond::err_response;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn register(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> impl Responder {
    match state.auth.register(&body.username, &body.email, &body.password).await {
        Ok(user) => HttpResponse::Created().json(serde_json::json!({ "id": user.id, "username": user.username })),
        Err(err) => err_response(err),
    }
}

pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    match state.auth.login(&body.username, &body.password).await {
        Ok(pair) => HttpResponse::Ok().json(pair_json(&pair)),
        Err(err) => err_response(err),
    }
}

pub async fn refresh(state: web::Data<AppState>, body: web::Json<RefreshRequest>) -> impl Responder {
    match state.auth.refresh(&body.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(pair_json(&pair)),
        Err(err) => err_response(err),
    }
}

fn pair_json(pair: &crate::auth::TokenPair) -> serde_json::Value {
    serde_json::json!({
        "access_token": pair.access_token,
        "refresh_token": pair.refresh_token,
        "expires_in": pair.expires_in,
    })
}
