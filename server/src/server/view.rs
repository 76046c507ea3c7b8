//! Neutral table snapshots and the per-recipient privacy projection.
//!
//! The state machine produces one full view per transition; recipients get a
//! projection of it. Seated players see their own hole cards only; everyone
//! else sees card counts.

use holdem_shared::messages::HoleCardMap;
use holdem_shared::{SeatStatus, SeatView, TableState};

use crate::table::Table;

/// Everything about a table at one instant, including all hole cards.
/// Never serialized as-is.
#[derive(Clone, Debug)]
pub struct TableView {
    pub table_id: String,
    pub seats: Vec<SeatView>,
    pub dealer_seat: Option<usize>,
    pub small_blind_seat: Option<usize>,
    pub big_blind_seat: Option<usize>,
    pub pot: Option<u32>,
    pub hand_in_progress: bool,
    pub hole_cards: HoleCardMap,
}

/// Capture the full view. Called under the table lock.
pub fn snapshot(table: &Table) -> TableView {
    let hand = table.hand.as_ref();
    let hole_cards = table.hole_cards();

    let seats = table
        .seats
        .iter()
        .enumerate()
        .map(|(index, seat)| SeatView {
            index,
            token: seat.token.clone(),
            status: seat.status,
            stack: if seat.status == SeatStatus::Empty {
                None
            } else {
                Some(seat.stack)
            },
            card_count: hole_cards.contains_key(&index).then_some(2),
        })
        .collect();

    TableView {
        table_id: table.id.clone(),
        seats,
        dealer_seat: hand.map(|h| h.dealer_seat),
        small_blind_seat: hand.map(|h| h.small_blind_seat),
        big_blind_seat: hand.map(|h| h.big_blind_seat),
        pot: hand.map(|h| h.pot),
        hand_in_progress: hand.is_some(),
        hole_cards,
    }
}

/// Shape the view for one recipient. `seat` is the recipient's seat at this
/// table, or None for spectators, who get no hole cards at all.
pub fn project(view: &TableView, seat: Option<usize>) -> TableState {
    let hole_cards = seat
        .and_then(|s| view.hole_cards.get(&s).map(|cards| (s, *cards)))
        .map(|(s, cards)| {
            let mut own = HoleCardMap::new();
            own.insert(s, cards);
            own
        });

    TableState {
        table_id: view.table_id.clone(),
        seats: view.seats.clone(),
        dealer_seat: view.dealer_seat,
        small_blind_seat: view.small_blind_seat,
        big_blind_seat: view.big_blind_seat,
        pot: view.pot,
        hand_in_progress: view.hand_in_progress,
        hole_cards,
    }
}
