//! Client-server messaging protocol.
//!
//! Every frame is a JSON envelope `{"type": ..., "payload": ...}`. Optional
//! payload fields are omitted from the JSON when absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::Card;
use crate::error::GameError;
use crate::game::{ActionType, SeatStatus, Street};

/// Hole cards keyed by seat index. JSON object keys are strings.
pub type HoleCardMap = BTreeMap<usize, [Card; 2]>;

/// Messages that clients send to the server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Take the lowest empty seat at a table.
    Sit(SitRequest),
    /// Give up the seat (and any live hand).
    Leave,
    /// Deal a new hand at the table the sender is seated at.
    StartHand,
    /// Act in the current hand.
    PlayerAction(PlayerActionMsg),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitRequest {
    pub table_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActionMsg {
    pub action: ActionType,
    /// Raise target total for the street; required for raises only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

/// Messages the server sends to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Payload is the list of tables.
    LobbyState(Vec<LobbyTable>),
    TableState(TableState),
    HandStarted(HandStarted),
    BlindPosted(BlindPosted),
    /// Envelope only; hole cards arrive per-recipient inside `table_state`.
    CardsDealt,
    ActionRequest(ActionRequest),
    ActionResult(ActionResult),
    BoardDealt(BoardDealt),
    HandEnded(HandEnded),
    PlayerBusted(PlayerBusted),
    Error(ErrorMsg),
}

impl ServerMsg {
    pub fn error(err: &GameError) -> Self {
        ServerMsg::Error(ErrorMsg {
            code: err.code().to_string(),
            message: err.to_string(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyTable {
    pub id: String,
    pub name: String,
    pub max_seats: usize,
    pub seats_occupied: usize,
}

/// One seat as seen by a particular recipient.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub status: SeatStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<u32>,
    /// Number of hole cards held (2 during a hand); omitted for empty seats
    /// and outside a hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_count: Option<u8>,
}

/// Full snapshot for one recipient. Hand-scoped fields are present only while
/// a hand is running; `hole_cards` carries at most the recipient's own entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub table_id: String,
    pub seats: Vec<SeatView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_seat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_blind_seat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_blind_seat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot: Option<u32>,
    pub hand_in_progress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<HoleCardMap>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandStarted {
    pub dealer_seat: usize,
    pub small_blind_seat: usize,
    pub big_blind_seat: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindPosted {
    pub seat_index: usize,
    pub amount: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub seat_index: usize,
    pub valid_actions: Vec<ActionType>,
    pub call_amount: u32,
    pub current_bet: u32,
    pub pot: u32,
    /// Minimum raise target total for the street.
    pub min_raise: u32,
    /// Maximum raise target total (all-in) for the street.
    pub max_raise: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub seat_index: usize,
    pub action: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    pub chips_moved: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDealt {
    pub street: Street,
    pub board_cards: Vec<Card>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerInfo {
    pub seat_index: usize,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotAward {
    pub amount: u32,
    pub eligible_seats: Vec<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandEnded {
    pub winners: Vec<WinnerInfo>,
    pub pots_awarded: Vec<PotAward>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revealed_hole_cards: Option<HoleCardMap>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBusted {
    pub seat_index: usize,
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMsg {
    pub code: String,
    pub message: String,
}
