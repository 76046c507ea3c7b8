//! Error kinds shared by the engine and the wire protocol.
//!
//! Every variant carries a stable `code()` string that clients can match on;
//! the Display text is the human-readable message sent alongside it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    // Validation
    #[error("action out of turn")]
    OutOfTurn,
    #[error("cannot check while facing a bet")]
    CheckWhenBehind,
    #[error("raise is below the minimum")]
    RaiseBelowMinimum,
    #[error("raise exceeds remaining stack")]
    RaiseExceedsStack,
    #[error("raise requires an amount")]
    RaiseMissingAmount,
    #[error("action is not available to this seat")]
    InvalidAction,

    // State
    #[error("no active hand at this table")]
    NoActiveHand,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("not enough players to start a hand")]
    InsufficientPlayers,
    #[error("table is full")]
    TableFull,
    #[error("seat not found")]
    SeatNotFound,
    #[error("table not found")]
    TableNotFound,
    #[error("not seated at a table")]
    NotSeated,
    #[error("already seated at a table")]
    AlreadySeated,

    // Resource
    #[error("insufficient cards in deck")]
    InsufficientCards,

    // Transport
    #[error("malformed message")]
    BadMessage,
}

impl GameError {
    /// Stable wire code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::OutOfTurn => "out_of_turn",
            GameError::CheckWhenBehind => "check_when_behind",
            GameError::RaiseBelowMinimum => "raise_below_minimum",
            GameError::RaiseExceedsStack => "raise_exceeds_stack",
            GameError::RaiseMissingAmount => "raise_missing_amount",
            GameError::InvalidAction => "invalid_action",
            GameError::NoActiveHand => "no_active_hand",
            GameError::HandInProgress => "hand_in_progress",
            GameError::InsufficientPlayers => "insufficient_players",
            GameError::TableFull => "table_full",
            GameError::SeatNotFound => "seat_not_found",
            GameError::TableNotFound => "table_not_found",
            GameError::NotSeated => "not_seated",
            GameError::AlreadySeated => "already_seated",
            GameError::InsufficientCards => "insufficient_cards",
            GameError::BadMessage => "bad_message",
        }
    }
}
