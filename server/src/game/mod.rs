//! The per-hand state machine and betting engine.
//!
//! A [`Hand`] owns everything that lives and dies with one deal: the deck,
//! the board, hole cards, per-street bets and cumulative contributions. It
//! never touches seat stacks directly; action processing returns the chips
//! moved and the owning table applies them. All mutation happens under the
//! owning table's lock.

pub mod betting;
pub mod dealing;
pub mod flow;
pub mod pots;
pub mod showdown;

use std::collections::{BTreeMap, BTreeSet};

use holdem_shared::{Card, Street};

use crate::poker::Deck;
use crate::table::Seat;

pub use pots::{calculate_side_pots, SidePot};
pub use showdown::Settlement;

#[derive(Clone, Debug)]
pub struct Hand {
    pub dealer_seat: usize,
    pub small_blind_seat: usize,
    pub big_blind_seat: usize,
    pub street: Street,
    pub deck: Deck,
    pub board: Vec<Card>,
    /// Two cards per seat dealt in at hand start.
    pub hole_cards: BTreeMap<usize, [Card; 2]>,
    /// Chips committed on completed streets. In-street bets stay in `bets`
    /// until the street advances.
    pub pot: u32,
    /// Chips committed in the current street, per seat.
    pub bets: BTreeMap<usize, u32>,
    /// Cumulative commitment across the whole hand; feeds side pots.
    pub contributions: BTreeMap<usize, u32>,
    /// Highest per-seat bet this street; the amount to match.
    pub current_bet: u32,
    /// Size of the last bet/raise increment; sets the minimum legal raise.
    pub last_raise: u32,
    pub folded: BTreeSet<usize>,
    /// Seats that have taken a voluntary action this street. Blind posts do
    /// not count.
    pub acted: BTreeSet<usize>,
    pub current_actor: Option<usize>,
    /// Preflop only: the big blind still gets to check or raise an unopened
    /// pot when action comes back around.
    pub bb_has_option: bool,
    pub big_blind: u32,
    pub(crate) seat_count: usize,
}

impl Hand {
    pub fn bet_of(&self, seat: usize) -> u32 {
        self.bets.get(&seat).copied().unwrap_or(0)
    }

    pub fn contribution_of(&self, seat: usize) -> u32 {
        self.contributions.get(&seat).copied().unwrap_or(0)
    }

    /// Seat was dealt into this hand.
    pub fn is_dealt_in(&self, seat: usize) -> bool {
        self.hole_cards.contains_key(&seat)
    }

    /// Dealt in and not folded. All-in seats are live.
    pub fn is_live(&self, seat: usize) -> bool {
        self.is_dealt_in(seat) && !self.folded.contains(&seat)
    }

    pub fn live_seats(&self) -> Vec<usize> {
        self.hole_cards
            .keys()
            .copied()
            .filter(|s| !self.folded.contains(s))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.live_seats().len()
    }

    /// Seat indices clockwise after `from`, one full cycle.
    pub(crate) fn clockwise_from(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.seat_count;
        (1..=n).map(move |i| (from + i) % n)
    }

    /// Next live seat clockwise from `from`. All-in seats are returned;
    /// callers that offer actions skip them separately.
    pub fn next_live_seat(&self, from: usize) -> Option<usize> {
        self.clockwise_from(from).find(|&s| self.is_live(s))
    }

    /// Live seats that still have chips behind.
    pub(crate) fn live_with_chips(&self, seats: &[Seat]) -> usize {
        self.live_seats()
            .iter()
            .filter(|&&s| seats[s].stack > 0)
            .count()
    }
}
