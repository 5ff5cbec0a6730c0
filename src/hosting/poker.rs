use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures::StreamExt;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{PokerTable, TableStatus};
use crate::dto::{JoinTableRequest, PlayerActionRequest};
use crate::gameroom::{Event, TableConfig};

use super::extractor::Auth;
use super::respond::err_response;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub name: String,
    pub small_blind: Decimal,
    pub big_blind: Decimal,
    pub min_buy_in: Decimal,
    pub max_buy_in: Decimal,
    pub max_players: u8,
}

fn config_of(table: &PokerTable) -> TableConfig {
    TableConfig {
        id: table.id,
        name: table.name.clone(),
        small_blind: table.small_blind,
        big_blind: table.big_blind,
        min_buy_in: table.min_buy_in,
        max_buy_in: table.max_buy_in,
        max_players: table.max_players,
    }
}

pub async fn create_table(state: web::Data<AppState>, body: web::Json<CreateTableRequest>) -> impl Responder {
    let table = PokerTable {
        id: Uuid::now_v7(),
        name: body.name.clone(),
        small_blind: body.small_blind,
        big_blind: body.big_blind,
        min_buy_in: body.min_buy_in,
        max_buy_in: body.max_buy_in,
        max_players: body.max_players,
        status: TableStatus::Waiting,
    };
    match state.tables.save(&table).await {
        Ok(()) => HttpResponse::Created().json(&table),
        Err(err) => err_response(err),
    }
}

pub async fn get_table(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.tables.get(path.into_inner()).await {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(err) => err_response(err),
    }
}

pub async fn list_tables(state: web::Data<AppState>) -> impl Responder {
    match state.tables.list().await {
        Ok(tables) => HttpResponse::Ok().json(tables),
        Err(err) => err_response(err),
    }
}

pub async fn join_table(
    state: web::Data<AppState>,
    auth: Auth,
    path: web::Path<Uuid>,
    body: web::Json<JoinTableRequest>,
) -> impl Responder {
    let table_id = path.into_inner();
    let table = match state.tables.get(table_id).await {
        Ok(table) => table,
        Err(err) => return err_response(err),
    };
    state.hubs.get_or_create(config_of(&table)).await;
    let event = Event::PlayerJoin {
        user_id: auth.claims().sub,
        player_id: Uuid::now_v7(),
        seat: body.seat,
        buy_in: body.buy_in,
        username: auth.claims().usr.clone(),
    };
    match state.hubs.dispatch(table_id, event).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "joined" })),
        Err(err) => err_response(err),
    }
}

pub async fn leave_table(state: web::Data<AppState>, auth: Auth, path: web::Path<Uuid>) -> impl Responder {
    let table_id = path.into_inner();
    match state.hubs.dispatch(table_id, Event::PlayerLeave { user_id: auth.claims().sub }).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "left" })),
        Err(err) => err_response(err),
    }
}

pub async fn player_action(
    state: web::Data<AppState>,
    auth: Auth,
    path: web::Path<Uuid>,
    body: web::Json<PlayerActionRequest>,
) -> impl Responder {
    let table_id = path.into_inner();
    let event = Event::PlayerAction {
        user_id: auth.claims().sub,
        action: body.action.into(),
        amount: body.amount,
    };
    match state.hubs.dispatch(table_id, event).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "accepted" })),
        Err(err) => err_response(err),
    }
}

pub async fn get_table_state(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let table_id = path.into_inner();
    match state.hubs.dispatch(table_id, Event::GetState).await {
        Ok(reply) => HttpResponse::Ok().json(reply.state.unwrap_or(serde_json::Value::Null)),
        Err(err) => err_response(err),
    }
}

/// Upgrades to a WebSocket and bridges it to the table's broadcaster
/// channel, the same split the teacher's `Casino::bridge` uses: one task
/// pumps outbound broadcasts to the socket, the inbound stream decodes
/// player actions and dispatches them to the hub.
pub async fn connect(
    state: web::Data<AppState>,
    auth: Auth,
    path: web::Path<Uuid>,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let table_id = path.into_inner();
    let user_id = auth.claims().sub;
    let (response, mut session, mut stream) = actix_ws::handle(&req, body)?;
    let mut rx = state.broadcaster.subscribe(table_id, user_id);
    let outbox = state.hubs.clone();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(json) => if session.text(json).await.is_err() { break },
                    None => break,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        if let Ok(request) = serde_json::from_str::<PlayerActionRequest>(&text) {
                            let event = Event::PlayerAction {
                                user_id,
                                action: request.action.into(),
                                amount: request.amount,
                            };
                            let _ = outbox.dispatch(table_id, event).await;
                        }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => continue,
                },
            }
        }
        state.broadcaster.unsubscribe(table_id, user_id);
    });

    Ok(response)
}
