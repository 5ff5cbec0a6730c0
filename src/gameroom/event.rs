use crate::betting::Action;
use crate::error::ErrorKind;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Event {
    PlayerAction {
        user_id: Uuid,
        action: Action,
        amount: Decimal,
    },
    PlayerJoin {
        user_id: Uuid,
        player_id: Uuid,
        seat: u8,
        buy_in: Decimal,
        username: String,
    },
    PlayerLeave {
        user_id: Uuid,
    },
    StartHand,
    GetState,
    Shutdown,
}

#[derive(Debug, Clone, Default)]
pub struct EventReply {
    pub state: Option<serde_json::Value>,
}

impl EventReply {
    pub fn state(value: serde_json::Value) -> Self {
        EventReply { state: Some(value) }
    }
}

pub type Reply = Result<EventReply, ErrorKind>;
