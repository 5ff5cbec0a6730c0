use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::BetType;
use crate::dto::PlaceBetRequest;
use crate::error::ErrorKind;

use super::extractor::Auth;
use super::respond::err_response;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

pub async fn get_table(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.roulette_runner(path.into_inner()).await {
        Some(runner) => HttpResponse::Ok().json(&runner.table),
        None => err_response(ErrorKind::NotFound("roulette table".to_string())),
    }
}

pub async fn list_active_tables(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.active_roulette_tables().await)
}

pub async fn current_round(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.roulette_runner(path.into_inner()).await {
        Some(runner) => match runner.current_round().await {
            Some(round) => HttpResponse::Ok().json(round),
            None => HttpResponse::Ok().json(serde_json::Value::Null),
        },
        None => err_response(ErrorKind::NotFound("roulette table".to_string())),
    }
}

pub async fn round(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.roulette_repository.round(path.into_inner()).await {
        Ok(round) => HttpResponse::Ok().json(round),
        Err(err) => err_response(err),
    }
}

pub async fn history(state: web::Data<AppState>, path: web::Path<Uuid>, query: web::Query<PageQuery>) -> impl Responder {
    match state.roulette_repository.history(path.into_inner(), query.limit, query.offset).await {
        Ok(rounds) => HttpResponse::Ok().json(rounds),
        Err(err) => err_response(err),
    }
}

pub async fn user_bets(state: web::Data<AppState>, auth: Auth, query: web::Query<PageQuery>) -> impl Responder {
    match state.roulette_repository.bets_for_user(auth.claims().sub, query.limit, query.offset).await {
        Ok(bets) => HttpResponse::Ok().json(bets),
        Err(err) => err_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceBetQuery {
    pub table_id: Uuid,
}

pub async fn place_bet(
    state: web::Data<AppState>,
    auth: Auth,
    query: web::Query<PlaceBetQuery>,
    body: web::Json<PlaceBetRequest>,
) -> impl Responder {
    let Some(runner) = state.roulette_runner(query.table_id).await else {
        return err_response(ErrorKind::NotFound("roulette table".to_string()));
    };
    let bet_type = match parse_bet_type(&body.bet_type) {
        Ok(bet_type) => bet_type,
        Err(err) => return err_response(err),
    };
    match runner
        .place_bet(auth.claims().sub, bet_type, body.bet_value.clone(), body.amount)
        .await
    {
        Ok(bet) => HttpResponse::Ok().json(bet),
        Err(err) => err_response(err),
    }
}

fn parse_bet_type(raw: &str) -> Result<BetType, ErrorKind> {
    match raw {
        "straight" => Ok(BetType::Straight),
        "split" => Ok(BetType::Split),
        "street" => Ok(BetType::Street),
        "corner" => Ok(BetType::Corner),
        "line" => Ok(BetType::Line),
        "dozen" => Ok(BetType::Dozen),
        "column" => Ok(BetType::Column),
        "red" => Ok(BetType::Red),
        "black" => Ok(BetType::Black),
        "odd" => Ok(BetType::Odd),
        "even" => Ok(BetType::Even),
        "high" => Ok(BetType::High),
        "low" => Ok(BetType::Low),
        other => Err(ErrorKind::InvalidBet(format!("unknown bet type {other}"))),
    }
}
