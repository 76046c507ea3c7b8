//! Wire protocol and common types for the holdem server.

pub mod cards;
pub mod error;
pub mod game;
pub mod messages;

pub use cards::{Card, Rank, Suit};
pub use error::GameError;
pub use game::{ActionType, SeatStatus, Street};
pub use messages::{
    ActionRequest, ActionResult, BlindPosted, BoardDealt, ClientMsg, ErrorMsg, HandEnded,
    HandStarted, LobbyTable, PlayerActionMsg, PlayerBusted, PotAward, SeatView, ServerMsg,
    SitRequest, TableState, WinnerInfo,
};
