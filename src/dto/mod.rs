//! Wire types exchanged with clients. Every broadcast message is
//! `{type: string, payload: object}` with a payload shape fixed per type
//! (spec §6); requests are the typed arguments to the service façade.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::betting::Action as BettingAction;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    TableState { state: serde_json::Value },
    CardsDealt { hole_cards: [String; 2] },
    PlayerActed { player_id: Uuid, action: String, amount: Decimal },
    CommunityCards { cards: Vec<String> },
    HandResult { winners: Vec<Uuid>, pot: Decimal },
    PlayerJoined { player_id: Uuid, seat: u8 },
    PlayerLeft { player_id: Uuid },
    TurnChanged { player_id: Uuid, timeout_secs: u64 },
    NewHand { hand_id: Uuid, hand_number: i64, dealer_seat: u8 },
    PotUpdated { pot: Decimal },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error { message: message.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerActionRequest {
    pub action: ActionWire,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionWire {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl From<ActionWire> for BettingAction {
    fn from(action: ActionWire) -> Self {
        match action {
            ActionWire::Fold => BettingAction::Fold,
            ActionWire::Check => BettingAction::Check,
            ActionWire::Call => BettingAction::Call,
            ActionWire::Bet => BettingAction::Bet,
            ActionWire::Raise => BettingAction::Raise,
            ActionWire::AllIn => BettingAction::AllIn,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinTableRequest {
    pub seat: u8,
    pub buy_in: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBetRequest {
    pub bet_type: String,
    pub bet_value: Vec<u8>,
    pub amount: Decimal,
}
