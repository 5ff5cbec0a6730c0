//! Postgres-backed adapters for the poker and roulette repositories,
//! mirroring the `impl Trait for Arc<Client>` pattern and table-name
//! constants used by `ledger::postgres` and `auth::postgres`.

use super::{ActionRepository, HandRepository, PlayerRepository, RouletteRepository, TableRepository};
use crate::domain::{
    ActionKind, BetStatus, BetType, Hand, HandStage, PlayerStatus, PokerAction, PokerPlayer, PokerTable,
    RouletteBet, RouletteColor, RouletteRound, TableStatus,
};
use crate::error::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Client;
use uuid::Uuid;

#[rustfmt::skip]
pub const POKER_TABLES: &str = "poker_tables";
#[rustfmt::skip]
pub const POKER_PLAYERS: &str = "poker_players";
#[rustfmt::skip]
pub const POKER_HANDS: &str = "poker_hands";
#[rustfmt::skip]
pub const POKER_ACTIONS: &str = "poker_actions";
#[rustfmt::skip]
pub const ROULETTE_ROUNDS: &str = "roulette_rounds";
#[rustfmt::skip]
pub const ROULETTE_BETS: &str = "roulette_bets";

pub const DDL: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ", POKER_TABLES, " (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        small_blind NUMERIC(38, 18) NOT NULL,
        big_blind NUMERIC(38, 18) NOT NULL,
        min_buy_in NUMERIC(38, 18) NOT NULL,
        max_buy_in NUMERIC(38, 18) NOT NULL,
        max_players SMALLINT NOT NULL,
        status TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS ", POKER_PLAYERS, " (
        id UUID PRIMARY KEY,
        table_id UUID NOT NULL REFERENCES ", POKER_TABLES, "(id),
        user_id UUID NOT NULL,
        username TEXT NOT NULL,
        stack NUMERIC(38, 18) NOT NULL,
        seat_number SMALLINT NOT NULL,
        status TEXT NOT NULL,
        joined_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    CREATE TABLE IF NOT EXISTS ", POKER_HANDS, " (
        id UUID PRIMARY KEY,
        table_id UUID NOT NULL REFERENCES ", POKER_TABLES, "(id),
        hand_number BIGINT NOT NULL,
        pot NUMERIC(38, 18) NOT NULL,
        community_cards TEXT[] NOT NULL,
        stage TEXT NOT NULL,
        winner_id UUID,
        started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        ended_at TIMESTAMPTZ
    );
    CREATE TABLE IF NOT EXISTS ", POKER_ACTIONS, " (
        hand_id UUID NOT NULL REFERENCES ", POKER_HANDS, "(id),
        player_id UUID NOT NULL,
        kind TEXT NOT NULL,
        amount NUMERIC(38, 18) NOT NULL,
        stage TEXT NOT NULL,
        action_order BIGINT NOT NULL,
        PRIMARY KEY (hand_id, action_order)
    );
    CREATE TABLE IF NOT EXISTS ", ROULETTE_ROUNDS, " (
        id UUID PRIMARY KEY,
        table_id UUID NOT NULL,
        round_number BIGINT NOT NULL,
        result SMALLINT,
        result_color TEXT,
        seed_hash TEXT NOT NULL,
        seed_revealed TEXT,
        betting_ends_at TIMESTAMPTZ NOT NULL,
        settled_at TIMESTAMPTZ
    );
    CREATE TABLE IF NOT EXISTS ", ROULETTE_BETS, " (
        id UUID PRIMARY KEY,
        round_id UUID NOT NULL REFERENCES ", ROULETTE_ROUNDS, "(id),
        user_id UUID NOT NULL,
        bet_type TEXT NOT NULL,
        bet_value SMALLINT[] NOT NULL,
        amount NUMERIC(38, 18) NOT NULL,
        payout NUMERIC(38, 18) NOT NULL,
        status TEXT NOT NULL
    );"
);

fn map_pg_err(err: tokio_postgres::Error) -> ErrorKind {
    ErrorKind::Internal(err.to_string())
}

fn table_status_str(s: TableStatus) -> &'static str {
    match s {
        TableStatus::Waiting => "waiting",
        TableStatus::Active => "active",
        TableStatus::Closed => "closed",
    }
}

fn table_status_from_str(s: &str) -> TableStatus {
    match s {
        "waiting" => TableStatus::Waiting,
        "active" => TableStatus::Active,
        "closed" => TableStatus::Closed,
        other => panic!("unknown table status in storage: {other}"),
    }
}

fn player_status_str(s: PlayerStatus) -> &'static str {
    match s {
        PlayerStatus::Active => "active",
        PlayerStatus::SittingOut => "sitting-out",
        PlayerStatus::AllIn => "all-in",
        PlayerStatus::Folded => "folded",
    }
}

fn player_status_from_str(s: &str) -> PlayerStatus {
    match s {
        "active" => PlayerStatus::Active,
        "sitting-out" => PlayerStatus::SittingOut,
        "all-in" => PlayerStatus::AllIn,
        "folded" => PlayerStatus::Folded,
        other => panic!("unknown player status in storage: {other}"),
    }
}

fn hand_stage_str(s: HandStage) -> &'static str {
    match s {
        HandStage::Waiting => "waiting",
        HandStage::Preflop => "preflop",
        HandStage::Flop => "flop",
        HandStage::Turn => "turn",
        HandStage::River => "river",
        HandStage::Showdown => "showdown",
        HandStage::Complete => "complete",
    }
}

fn action_kind_str(k: ActionKind) -> &'static str {
    match k {
        ActionKind::Fold => "fold",
        ActionKind::Check => "check",
        ActionKind::Call => "call",
        ActionKind::Bet => "bet",
        ActionKind::Raise => "raise",
        ActionKind::AllIn => "all-in",
        ActionKind::Blind => "blind",
    }
}

fn roulette_color_str(c: RouletteColor) -> &'static str {
    match c {
        RouletteColor::Red => "red",
        RouletteColor::Black => "black",
        RouletteColor::Green => "green",
    }
}

fn roulette_color_from_str(s: &str) -> RouletteColor {
    match s {
        "red" => RouletteColor::Red,
        "black" => RouletteColor::Black,
        "green" => RouletteColor::Green,
        other => panic!("unknown roulette color in storage: {other}"),
    }
}

fn bet_type_str(b: BetType) -> &'static str {
    match b {
        BetType::Straight => "straight",
        BetType::Split => "split",
        BetType::Street => "street",
        BetType::Corner => "corner",
        BetType::Line => "line",
        BetType::Dozen => "dozen",
        BetType::Column => "column",
        BetType::Red => "red",
        BetType::Black => "black",
        BetType::Odd => "odd",
        BetType::Even => "even",
        BetType::High => "high",
        BetType::Low => "low",
    }
}

fn bet_type_from_str(s: &str) -> BetType {
    match s {
        "straight" => BetType::Straight,
        "split" => BetType::Split,
        "street" => BetType::Street,
        "corner" => BetType::Corner,
        "line" => BetType::Line,
        "dozen" => BetType::Dozen,
        "column" => BetType::Column,
        "red" => BetType::Red,
        "black" => BetType::Black,
        "odd" => BetType::Odd,
        "even" => BetType::Even,
        "high" => BetType::High,
        "low" => BetType::Low,
        other => panic!("unknown bet type in storage: {other}"),
    }
}

fn bet_status_str(s: BetStatus) -> &'static str {
    match s {
        BetStatus::Pending => "pending",
        BetStatus::Won => "won",
        BetStatus::Lost => "lost",
    }
}

fn bet_status_from_str(s: &str) -> BetStatus {
    match s {
        "pending" => BetStatus::Pending,
        "won" => BetStatus::Won,
        "lost" => BetStatus::Lost,
        other => panic!("unknown bet status in storage: {other}"),
    }
}

fn bet_value_to_i16(bet_value: &[u8]) -> Vec<i16> {
    bet_value.iter().map(|&v| v as i16).collect()
}

fn bet_value_from_i16(bet_value: Vec<i16>) -> Vec<u8> {
    bet_value.into_iter().map(|v| v as u8).collect()
}

#[async_trait]
impl TableRepository for Arc<Client> {
    async fn get(&self, id: Uuid) -> Result<PokerTable, ErrorKind> {
        let row = self
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, name, small_blind, big_blind, min_buy_in, max_buy_in, max_players, status FROM ",
                    POKER_TABLES,
                    " WHERE id = $1"
                ),
                &[&id],
            )
            .await
            .map_err(map_pg_err)?
            .ok_or_else(|| ErrorKind::NotFound("table".to_string()))?;
        Ok(PokerTable {
            id: row.get(0),
            name: row.get(1),
            small_blind: row.get(2),
            big_blind: row.get(3),
            min_buy_in: row.get(4),
            max_buy_in: row.get(5),
            max_players: row.get::<_, i16>(6) as u8,
            status: table_status_from_str(row.get(7)),
        })
    }

    async fn list(&self) -> Result<Vec<PokerTable>, ErrorKind> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT id, name, small_blind, big_blind, min_buy_in, max_buy_in, max_players, status FROM ",
                    POKER_TABLES
                ),
                &[],
            )
            .await
            .map_err(map_pg_err)?;
        Ok(rows
            .into_iter()
            .map(|row| PokerTable {
                id: row.get(0),
                name: row.get(1),
                small_blind: row.get(2),
                big_blind: row.get(3),
                min_buy_in: row.get(4),
                max_buy_in: row.get(5),
                max_players: row.get::<_, i16>(6) as u8,
                status: table_status_from_str(row.get(7)),
            })
            .collect())
    }

    async fn save(&self, table: &PokerTable) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", POKER_TABLES,
                " (id, name, small_blind, big_blind, min_buy_in, max_buy_in, max_players, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name, small_blind = EXCLUDED.small_blind, big_blind = EXCLUDED.big_blind,
                    min_buy_in = EXCLUDED.min_buy_in, max_buy_in = EXCLUDED.max_buy_in,
                    max_players = EXCLUDED.max_players, status = EXCLUDED.status"
            ),
            &[
                &table.id,
                &table.name,
                &table.small_blind,
                &table.big_blind,
                &table.min_buy_in,
                &table.max_buy_in,
                &(table.max_players as i16),
                &table_status_str(table.status),
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for Arc<Client> {
    async fn save(&self, player: &PokerPlayer) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", POKER_PLAYERS,
                " (id, table_id, user_id, username, stack, seat_number, status, joined_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (id) DO UPDATE SET
                    stack = EXCLUDED.stack, seat_number = EXCLUDED.seat_number, status = EXCLUDED.status"
            ),
            &[
                &player.id,
                &player.table_id,
                &player.user_id,
                &player.username,
                &player.stack,
                &(player.seat_number as i16),
                &player_status_str(player.status),
                &player.joined_at,
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", POKER_PLAYERS, " WHERE id = $1"),
            &[&id],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }

    async fn for_table(&self, table_id: Uuid) -> Result<Vec<PokerPlayer>, ErrorKind> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT id, table_id, user_id, username, stack, seat_number, status, joined_at FROM ",
                    POKER_PLAYERS,
                    " WHERE table_id = $1"
                ),
                &[&table_id],
            )
            .await
            .map_err(map_pg_err)?;
        Ok(rows
            .into_iter()
            .map(|row| PokerPlayer {
                id: row.get(0),
                table_id: row.get(1),
                user_id: row.get(2),
                username: row.get(3),
                stack: row.get(4),
                seat_number: row.get::<_, i16>(5) as u8,
                status: player_status_from_str(row.get(6)),
                joined_at: row.get(7),
            })
            .collect())
    }
}

#[async_trait]
impl HandRepository for Arc<Client> {
    async fn save(&self, hand: &Hand) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", POKER_HANDS,
                " (id, table_id, hand_number, pot, community_cards, stage, winner_id, started_at, ended_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (id) DO UPDATE SET
                    pot = EXCLUDED.pot, community_cards = EXCLUDED.community_cards, stage = EXCLUDED.stage,
                    winner_id = EXCLUDED.winner_id, ended_at = EXCLUDED.ended_at"
            ),
            &[
                &hand.id,
                &hand.table_id,
                &hand.hand_number,
                &hand.pot,
                &hand.community_cards,
                &hand_stage_str(hand.stage),
                &hand.winner_id,
                &hand.started_at,
                &hand.ended_at,
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }
}

#[async_trait]
impl ActionRepository for Arc<Client> {
    async fn append(&self, action: &PokerAction) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", POKER_ACTIONS,
                " (hand_id, player_id, kind, amount, stage, action_order) VALUES ($1, $2, $3, $4, $5, $6)"
            ),
            &[
                &action.hand_id,
                &action.player_id,
                &action_kind_str(action.kind),
                &action.amount,
                &hand_stage_str(action.stage),
                &action.action_order,
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }
}

#[async_trait]
impl RouletteRepository for Arc<Client> {
    async fn save_round(&self, round: &RouletteRound) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", ROULETTE_ROUNDS,
                " (id, table_id, round_number, result, result_color, seed_hash, seed_revealed, betting_ends_at, settled_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (id) DO UPDATE SET
                    result = EXCLUDED.result, result_color = EXCLUDED.result_color,
                    seed_revealed = EXCLUDED.seed_revealed, settled_at = EXCLUDED.settled_at"
            ),
            &[
                &round.id,
                &round.table_id,
                &round.round_number,
                &round.result.map(|r| r as i16),
                &round.result_color.map(roulette_color_str),
                &round.seed_hash,
                &round.seed_revealed,
                &round.betting_ends_at,
                &round.settled_at,
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }

    async fn save_bet(&self, bet: &RouletteBet) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ", ROULETTE_BETS,
                " (id, round_id, user_id, bet_type, bet_value, amount, payout, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (id) DO UPDATE SET payout = EXCLUDED.payout, status = EXCLUDED.status"
            ),
            &[
                &bet.id,
                &bet.round_id,
                &bet.user_id,
                &bet_type_str(bet.bet_type),
                &bet_value_to_i16(&bet.bet_value),
                &bet.amount,
                &bet.payout,
                &bet_status_str(bet.status),
            ],
        )
        .await
        .map_err(map_pg_err)?;
        Ok(())
    }

    async fn round(&self, round_id: Uuid) -> Result<RouletteRound, ErrorKind> {
        let row = self
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, table_id, round_number, result, result_color, seed_hash, seed_revealed, betting_ends_at, settled_at FROM ",
                    ROULETTE_ROUNDS,
                    " WHERE id = $1"
                ),
                &[&round_id],
            )
            .await
            .map_err(map_pg_err)?
            .ok_or_else(|| ErrorKind::NotFound("round".to_string()))?;
        Ok(row_to_round(&row))
    }

    async fn history(&self, table_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteRound>, ErrorKind> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT id, table_id, round_number, result, result_color, seed_hash, seed_revealed, betting_ends_at, settled_at FROM ",
                    ROULETTE_ROUNDS,
                    " WHERE table_id = $1 ORDER BY round_number DESC LIMIT $2 OFFSET $3"
                ),
                &[&table_id, &(limit as i64), &(offset as i64)],
            )
            .await
            .map_err(map_pg_err)?;
        Ok(rows.iter().map(row_to_round).collect())
    }

    async fn bets_for_user(&self, user_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteBet>, ErrorKind> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT id, round_id, user_id, bet_type, bet_value, amount, payout, status FROM ",
                    ROULETTE_BETS,
                    " WHERE user_id = $1 ORDER BY id DESC LIMIT $2 OFFSET $3"
                ),
                &[&user_id, &(limit as i64), &(offset as i64)],
            )
            .await
            .map_err(map_pg_err)?;
        Ok(rows
            .into_iter()
            .map(|row| RouletteBet {
                id: row.get(0),
                round_id: row.get(1),
                user_id: row.get(2),
                bet_type: bet_type_from_str(row.get(3)),
                bet_value: bet_value_from_i16(row.get(4)),
                amount: row.get(5),
                payout: row.get(6),
                status: bet_status_from_str(row.get(7)),
            })
            .collect())
    }
}

fn row_to_round(row: &tokio_postgres::Row) -> RouletteRound {
    RouletteRound {
        id: row.get(0),
        table_id: row.get(1),
        round_number: row.get(2),
        result: row.get::<_, Option<i16>>(3).map(|r| r as u8),
        result_color: row.get::<_, Option<&str>>(4).map(roulette_color_from_str),
        seed_hash: row.get(5),
        seed_revealed: row.get(6),
        betting_ends_at: row.get(7),
        settled_at: row.get(8),
    }
}
