//! A table: six seats, a dealer button and at most one running hand.
//!
//! The table is the concurrency boundary. Callers wrap it in a single
//! reader-writer lock; every method here assumes it is already serialized.
//! Seat stacks live on the table, the hand only reports chips moved.

use std::collections::BTreeMap;

use holdem_shared::messages::HoleCardMap;
use holdem_shared::{
    ActionRequest, ActionType, Card, GameError, LobbyTable, PotAward, SeatStatus, Street,
    WinnerInfo,
};

use crate::game::Hand;
use crate::poker::Deck;

pub const MAX_SEATS: usize = 6;

#[derive(Clone, Debug)]
pub struct Seat {
    pub token: Option<String>,
    pub status: SeatStatus,
    pub stack: u32,
}

impl Seat {
    fn empty() -> Self {
        Seat {
            token: None,
            status: SeatStatus::Empty,
            stack: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

/// State transitions produced under the table lock, translated to wire
/// messages by the broadcast layer after the lock is released.
#[derive(Clone, Debug)]
pub enum TableEvent {
    HandStarted {
        dealer_seat: usize,
        small_blind_seat: usize,
        big_blind_seat: usize,
    },
    BlindPosted {
        seat: usize,
        amount: u32,
    },
    CardsDealt,
    ActionResult {
        seat: usize,
        action: ActionType,
        amount: Option<u32>,
        chips_moved: u32,
    },
    BoardDealt {
        street: Street,
        board: Vec<Card>,
    },
    ActionRequest(ActionRequest),
    HandEnded {
        winners: Vec<WinnerInfo>,
        pots: Vec<PotAward>,
        revealed: Option<HoleCardMap>,
    },
    PlayerBusted {
        seat: usize,
        token: String,
    },
}

#[derive(Clone, Debug)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub seats: Vec<Seat>,
    pub dealer_seat: Option<usize>,
    pub hand: Option<Hand>,
    pub small_blind: u32,
    pub big_blind: u32,
    pub buy_in: u32,
}

impl Table {
    pub fn new(id: String, name: String, small_blind: u32, big_blind: u32, buy_in: u32) -> Self {
        Table {
            id,
            name,
            seats: (0..MAX_SEATS).map(|_| Seat::empty()).collect(),
            dealer_seat: None,
            hand: None,
            small_blind,
            big_blind,
            buy_in,
        }
    }

    pub fn occupied(&self) -> usize {
        self.seats.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn lobby_info(&self) -> LobbyTable {
        LobbyTable {
            id: self.id.clone(),
            name: self.name.clone(),
            max_seats: MAX_SEATS,
            seats_occupied: self.occupied(),
        }
    }

    pub fn seat_by_token(&self, token: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.token.as_deref() == Some(token))
    }

    /// Put the token in the lowest empty seat with a fresh buy-in. Sitting
    /// down twice is a no-op returning the existing seat.
    pub fn assign_seat(&mut self, token: &str) -> Result<usize, GameError> {
        if let Some(seat) = self.seat_by_token(token) {
            return Ok(seat);
        }
        let seat = self
            .seats
            .iter()
            .position(Seat::is_empty)
            .ok_or(GameError::TableFull)?;
        self.seats[seat] = Seat {
            token: Some(token.to_string()),
            status: SeatStatus::Waiting,
            stack: self.buy_in,
        };
        Ok(seat)
    }

    /// Empty the token's seat. The caller is responsible for folding the
    /// seat out of a live hand first (see [`Table::leave`]).
    pub fn clear_seat(&mut self, token: &str) -> Result<usize, GameError> {
        let seat = self.seat_by_token(token).ok_or(GameError::SeatNotFound)?;
        self.seats[seat] = Seat::empty();
        Ok(seat)
    }

    /// Seats that would be dealt into the next hand.
    fn dealable(&self) -> Vec<usize> {
        (0..self.seats.len())
            .filter(|&i| {
                let s = &self.seats[i];
                !s.is_empty()
                    && s.stack > 0
                    && matches!(s.status, SeatStatus::Active | SeatStatus::Waiting)
            })
            .collect()
    }

    pub fn can_start_hand(&self) -> bool {
        self.hand.is_none() && self.dealable().len() >= 2
    }

    fn next_active_from(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        (1..=n)
            .map(|i| (from + i) % n)
            .find(|&s| self.seats[s].status == SeatStatus::Active)
    }

    /// Start a hand with a cryptographically shuffled deck.
    pub fn start_hand(&mut self) -> Result<Vec<TableEvent>, GameError> {
        self.start_hand_with_deck(Deck::shuffled(&mut rand::rng()))
    }

    /// Start a hand with the given deck order (tests stack the deck).
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<Vec<TableEvent>, GameError> {
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }

        // Seated, funded tokens are dealt in; promotion happens here.
        for seat in &mut self.seats {
            if seat.status == SeatStatus::Waiting && seat.stack > 0 {
                seat.status = SeatStatus::Active;
            }
        }
        let active: Vec<usize> = (0..self.seats.len())
            .filter(|&i| self.seats[i].status == SeatStatus::Active)
            .collect();
        if active.len() < 2 {
            return Err(GameError::InsufficientPlayers);
        }

        // First hand: the button starts at the lowest active seat. Later
        // hands use the seat the teardown rotation chose, falling back to
        // the next active seat if that player has since left.
        let dealer = match self.dealer_seat {
            Some(d) if self.seats[d].status == SeatStatus::Active => d,
            Some(d) => self
                .next_active_from(d)
                .ok_or(GameError::InsufficientPlayers)?,
            None => active[0],
        };
        self.dealer_seat = Some(dealer);

        let (hand, posts) = Hand::deal(
            deck,
            &mut self.seats,
            dealer,
            self.small_blind,
            self.big_blind,
        )?;

        let mut events = vec![TableEvent::HandStarted {
            dealer_seat: hand.dealer_seat,
            small_blind_seat: hand.small_blind_seat,
            big_blind_seat: hand.big_blind_seat,
        }];
        events.extend(posts.into_iter().map(|p| TableEvent::BlindPosted {
            seat: p.seat,
            amount: p.amount,
        }));
        events.push(TableEvent::CardsDealt);

        tracing::info!(
            table = %self.id,
            dealer = hand.dealer_seat,
            sb = hand.small_blind_seat,
            bb = hand.big_blind_seat,
            "hand started"
        );

        self.hand = Some(hand);
        self.run_flow(&mut events)?;
        Ok(events)
    }

    /// Apply one player action and drive the hand forward: street advances,
    /// all-in runouts and showdown as far as they follow without input.
    pub fn apply_action(
        &mut self,
        seat: usize,
        action: ActionType,
        amount: Option<u32>,
    ) -> Result<Vec<TableEvent>, GameError> {
        let stack = self.seats[seat].stack;
        let hand = self.hand.as_mut().ok_or(GameError::NoActiveHand)?;
        let chips_moved = hand.process_action(seat, action, stack, amount)?;
        self.seats[seat].stack -= chips_moved;

        let mut events = vec![TableEvent::ActionResult {
            seat,
            action,
            amount,
            chips_moved,
        }];
        if let Some(hand) = self.hand.as_mut() {
            hand.advance_action(&self.seats);
        }
        self.run_flow(&mut events)?;
        Ok(events)
    }

    /// Fold the token's seat out of any live hand, then vacate the seat.
    pub fn leave(&mut self, token: &str) -> Result<Vec<TableEvent>, GameError> {
        let seat = self.seat_by_token(token).ok_or(GameError::SeatNotFound)?;
        let mut events = Vec::new();
        if let Some(hand) = self.hand.as_mut() {
            if hand.is_live(seat) {
                hand.folded.insert(seat);
                hand.acted.insert(seat);
                if hand.current_actor == Some(seat) {
                    hand.advance_action(&self.seats);
                }
                events.push(TableEvent::ActionResult {
                    seat,
                    action: ActionType::Fold,
                    amount: None,
                    chips_moved: 0,
                });
                self.run_flow(&mut events)?;
            }
        }
        // The flow may already have busted this seat out.
        if self.seat_by_token(token).is_some() {
            self.clear_seat(token)?;
        }
        Ok(events)
    }

    fn action_request(&self, seat: usize) -> Option<TableEvent> {
        let hand = self.hand.as_ref()?;
        let stack = self.seats[seat].stack;
        Some(TableEvent::ActionRequest(ActionRequest {
            seat_index: seat,
            valid_actions: hand.valid_actions(seat, stack),
            call_amount: hand.call_amount(seat),
            current_bet: hand.current_bet,
            pot: hand.pot,
            min_raise: hand.min_raise_to(),
            max_raise: hand.max_raise_to(seat, stack),
        }))
    }

    /// Drive the hand until it needs a player decision or ends. Handles
    /// betting-round completion, all-in fast-forward and showdown.
    fn run_flow(&mut self, events: &mut Vec<TableEvent>) -> Result<(), GameError> {
        enum Step {
            Finish,
            Advance,
            Request(usize),
            Stalled,
        }
        loop {
            let step = {
                let hand = match &self.hand {
                    Some(hand) => hand,
                    None => return Ok(()),
                };
                if hand.live_count() <= 1 {
                    Step::Finish
                } else if hand.is_betting_round_complete(&self.seats) {
                    if hand.street == Street::River {
                        Step::Finish
                    } else {
                        Step::Advance
                    }
                } else if let Some(actor) = hand.current_actor {
                    Step::Request(actor)
                } else {
                    Step::Stalled
                }
            };
            match step {
                Step::Finish => {
                    self.finish_hand(events);
                    return Ok(());
                }
                Step::Advance => {
                    if let Some(hand) = self.hand.as_mut() {
                        if let Err(err) = hand.advance_street(&self.seats) {
                            // Deck underflow mid-hand is a bug; halt the hand
                            // instead of wedging the table.
                            tracing::error!(table = %self.id, %err, "halting hand");
                            self.hand = None;
                            return Err(err);
                        }
                        events.push(TableEvent::BoardDealt {
                            street: hand.street,
                            board: hand.board.clone(),
                        });
                    }
                }
                Step::Request(actor) => {
                    if let Some(req) = self.action_request(actor) {
                        events.push(req);
                    }
                    return Ok(());
                }
                Step::Stalled => {
                    // Should be unreachable: an incomplete round always has a
                    // seat able to act. Close the hand rather than wedge the
                    // table.
                    tracing::error!(table = %self.id, "no actor in an incomplete betting round");
                    self.finish_hand(events);
                    return Ok(());
                }
            }
        }
    }

    /// Showdown, payouts, bust-outs, dealer rotation, teardown.
    fn finish_hand(&mut self, events: &mut Vec<TableEvent>) {
        let mut hand = match self.hand.take() {
            Some(hand) => hand,
            None => return,
        };
        let settlement = hand.settle();
        for (&seat, &amount) in &settlement.payouts {
            self.seats[seat].stack += amount;
        }
        events.push(TableEvent::HandEnded {
            winners: settlement.winners.clone(),
            pots: settlement.pots.clone(),
            revealed: settlement.revealed.clone(),
        });
        tracing::info!(
            table = %self.id,
            winners = ?settlement.payouts,
            "hand ended"
        );

        // A busted seat is vacated; winning all-in seats have chips again.
        for &seat in hand.hole_cards.keys() {
            if self.seats[seat].stack == 0 {
                if let Some(token) = self.seats[seat].token.take() {
                    self.seats[seat] = Seat::empty();
                    events.push(TableEvent::PlayerBusted { seat, token });
                }
            }
        }

        // The button moves at teardown, to the next still-active seat.
        self.dealer_seat = self.next_active_from(hand.dealer_seat);
    }

    /// Chips on the table plus everything in flight in the hand; test hook
    /// for the conservation invariant.
    pub fn total_chips(&self) -> u32 {
        let stacks: u32 = self.seats.iter().map(|s| s.stack).sum();
        let in_hand: u32 = self
            .hand
            .as_ref()
            .map(|h| h.pot + h.bets.values().sum::<u32>())
            .unwrap_or(0);
        stacks + in_hand
    }

    /// All dealt hole cards, for per-recipient projection.
    pub fn hole_cards(&self) -> BTreeMap<usize, [Card; 2]> {
        self.hand
            .as_ref()
            .map(|h| h.hole_cards.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_players(n: usize) -> Table {
        let mut table = Table::new("table-1".into(), "Table 1".into(), 10, 20, 1000);
        for i in 0..n {
            table.assign_seat(&format!("tok{}", i)).unwrap();
        }
        table
    }

    #[test]
    fn assign_fills_lowest_empty_seat() {
        let mut table = table_with_players(2);
        assert_eq!(table.seat_by_token("tok0"), Some(0));
        assert_eq!(table.seat_by_token("tok1"), Some(1));
        table.clear_seat("tok0").unwrap();
        assert_eq!(table.assign_seat("tok2").unwrap(), 0);
    }

    #[test]
    fn assign_rejects_full_table() {
        let mut table = table_with_players(MAX_SEATS);
        assert_eq!(table.assign_seat("late"), Err(GameError::TableFull));
    }

    #[test]
    fn sitting_twice_is_idempotent() {
        let mut table = table_with_players(1);
        assert_eq!(table.assign_seat("tok0").unwrap(), 0);
        assert_eq!(table.occupied(), 1);
    }

    #[test]
    fn cannot_start_without_two_players() {
        let mut table = table_with_players(1);
        assert!(!table.can_start_hand());
        assert_eq!(
            table.start_hand().unwrap_err(),
            GameError::InsufficientPlayers
        );
    }

    #[test]
    fn start_promotes_waiting_seats_and_deals() {
        let mut table = table_with_players(3);
        assert!(table.can_start_hand());
        let events = table.start_hand().unwrap();
        assert!(matches!(events[0], TableEvent::HandStarted { .. }));
        assert!(table.hand.is_some());
        assert!(!table.can_start_hand());
        assert!(table
            .seats
            .iter()
            .take(3)
            .all(|s| s.status == SeatStatus::Active));
        // First hand: button at the lowest active seat.
        assert_eq!(table.dealer_seat, Some(0));
    }

    #[test]
    fn chip_conservation_through_a_hand() {
        let mut table = table_with_players(2);
        let before = table.total_chips();
        table
            .start_hand_with_deck(Deck::shuffled_with_seed(11))
            .unwrap();
        assert_eq!(table.total_chips(), before);
        let actor = table.hand.as_ref().unwrap().current_actor.unwrap();
        table.apply_action(actor, ActionType::Call, None).unwrap();
        assert_eq!(table.total_chips(), before);
    }

    #[test]
    fn leave_mid_hand_folds_and_vacates() {
        let mut table = table_with_players(3);
        table
            .start_hand_with_deck(Deck::shuffled_with_seed(12))
            .unwrap();
        let events = table.leave("tok0").unwrap();
        assert!(table.seat_by_token("tok0").is_none());
        assert!(events
            .iter()
            .any(|e| matches!(e, TableEvent::ActionResult { action: ActionType::Fold, .. })));
        // Two players remain in the hand.
        assert_eq!(table.hand.as_ref().unwrap().live_count(), 2);
    }
}
