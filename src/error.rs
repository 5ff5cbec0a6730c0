//! The closed set of error kinds every core component returns. The HTTP
//! edge (out of scope for this crate) maps these to status codes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("seat already taken")]
    SeatTaken,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("optimistic lock conflict")]
    OptimisticLock,
    #[error("betting closed")]
    BettingClosed,
    #[error("invalid bet: {0}")]
    InvalidBet(String),
    #[error("not this player's turn")]
    NotPlayerTurn,
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid state transition")]
    InvalidTransition,
    #[error("game not started")]
    GameNotStarted,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("at least two players required")]
    MinPlayersRequired,
    #[error("table hub closed")]
    HubClosed,
    #[error("internal error: {0}")]
    Internal(String),
}

/// HTTP status code this kind maps to at the (out-of-scope) HTTP edge.
impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound(_) => 404,
            ErrorKind::SeatTaken | ErrorKind::UserAlreadyExists => 409,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::InsufficientFunds => 422,
            ErrorKind::InvalidInput(_)
            | ErrorKind::InvalidBet(_)
            | ErrorKind::NotPlayerTurn
            | ErrorKind::InvalidAction(_) => 400,
            ErrorKind::BettingClosed => 422,
            ErrorKind::HubClosed => 503,
            ErrorKind::OptimisticLock
            | ErrorKind::InvalidTransition
            | ErrorKind::GameNotStarted
            | ErrorKind::GameAlreadyStarted
            | ErrorKind::MinPlayersRequired
            | ErrorKind::Internal(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ErrorKind>;
