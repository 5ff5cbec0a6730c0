//! HTTP edge: route wiring, request extraction, and error-kind-to-status
//! mapping. Mirrors the teacher's `hosting::Server` — one `App::new()`
//! factory wrapped in CORS and request logging — except this façade
//! fronts auth, wallet, poker, and roulette instead of one room type.

pub mod auth;
pub mod extractor;
pub mod poker;
pub mod respond;
pub mod roulette;
pub mod state;
pub mod wallet;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

pub use state::AppState;

pub struct Server;

impl Server {
    pub async fn run(state: AppState) -> std::io::Result<()> {
        let data = web::Data::new(state);
        let port = data.server_port;
        log::info!("starting hosting server on port {port}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
                .app_data(data.clone())
                .route("/auth/register", web::post().to(auth::register))
                .route("/auth/login", web::post().to(auth::login))
                .route("/auth/refresh", web::post().to(auth::refresh))
                .route("/wallet/balance", web::get().to(wallet::balance))
                .route("/wallet/transactions", web::get().to(wallet::transactions))
                .route("/poker/tables", web::post().to(poker::create_table))
                .route("/poker/tables", web::get().to(poker::list_tables))
                .route("/poker/tables/{table_id}", web::get().to(poker::get_table))
                .route("/poker/tables/{table_id}/state", web::get().to(poker::get_table_state))
                .route("/poker/tables/{table_id}/join", web::post().to(poker::join_table))
                .route("/poker/tables/{table_id}/leave", web::post().to(poker::leave_table))
                .route("/poker/tables/{table_id}/action", web::post().to(poker::player_action))
                .route("/poker/tables/{table_id}/connect", web::get().to(poker::connect))
                .route("/roulette/tables", web::get().to(roulette::list_active_tables))
                .route("/roulette/tables/{table_id}", web::get().to(roulette::get_table))
                .route("/roulette/tables/{table_id}/round", web::get().to(roulette::current_round))
                .route("/roulette/tables/{table_id}/history", web::get().to(roulette::history))
                .route("/roulette/rounds/{round_id}", web::get().to(roulette::round))
                .route("/roulette/bets", web::post().to(roulette::place_bet))
                .route("/roulette/bets", web::get().to(roulette::user_bets))
        })
        .workers(4)
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}
