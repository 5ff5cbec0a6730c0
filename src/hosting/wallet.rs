use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::extractor::Auth;
use super::respond::err_response;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

pub async fn balance(state: web::Data<AppState>, auth: Auth) -> impl Responder {
    match state.ledger.balance(auth.claims().sub).await {
        Ok(wallet) => HttpResponse::Ok().json(wallet),
        Err(err) => err_response(err),
    }
}

pub async fn transactions(
    state: web::Data<AppState>,
    auth: Auth,
    query: web::Query<TransactionsQuery>,
) -> impl Responder {
    match state.ledger.transactions(auth.claims().sub, query.limit, query.offset).await {
        Ok(txs) => HttpResponse::Ok().json(txs),
        Err(err) => err_response(err),
    }
}
