//! The persisted row shapes from spec §3. These are plain data; the hub
//! and ledger are the only things that own mutation rights over them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hashword: String,
    pub refresh_token_hash: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: Uuid,
    pub balance: Decimal,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    Deposit,
    Withdrawal,
    PokerBuyIn,
    PokerPayout,
    RouletteBet,
    RoulettePayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_user_id: Uuid,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub reference_type: ReferenceType,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Waiting,
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerTable {
    pub id: Uuid,
    pub name: String,
    pub small_blind: Decimal,
    pub big_blind: Decimal,
    pub min_buy_in: Decimal,
    pub max_buy_in: Decimal,
    pub max_players: u8,
    pub status: TableStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    SittingOut,
    AllIn,
    Folded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerPlayer {
    pub id: Uuid,
    pub table_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub stack: Decimal,
    pub seat_number: u8,
    pub status: PlayerStatus,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStage {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub id: Uuid,
    pub table_id: Uuid,
    pub hand_number: i64,
    pub pot: Decimal,
    pub community_cards: Vec<String>,
    pub stage: HandStage,
    pub winner_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    Blind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPlayer {
    pub hand_id: Uuid,
    pub player_id: Uuid,
    pub hole_cards: [String; 2],
    pub bet_amount: Decimal,
    pub last_action: Option<ActionKind>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerAction {
    pub hand_id: Uuid,
    pub player_id: Uuid,
    pub kind: ActionKind,
    pub amount: Decimal,
    pub stage: HandStage,
    pub action_order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouletteTableStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteTable {
    pub id: Uuid,
    pub min_bet: Decimal,
    pub max_bet: Decimal,
    pub status: RouletteTableStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouletteColor {
    Red,
    Black,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteRound {
    pub id: Uuid,
    pub table_id: Uuid,
    pub round_number: i64,
    pub result: Option<u8>,
    pub result_color: Option<RouletteColor>,
    pub seed_hash: String,
    pub seed_revealed: Option<String>,
    pub betting_ends_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetType {
    Straight,
    Split,
    Street,
    Corner,
    Line,
    Dozen,
    Column,
    Red,
    Black,
    Odd,
    Even,
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteBet {
    pub id: Uuid,
    pub round_id: Uuid,
    pub user_id: Uuid,
    pub bet_type: BetType,
    pub bet_value: Vec<u8>,
    pub amount: Decimal,
    pub payout: Decimal,
    pub status: BetStatus,
}
