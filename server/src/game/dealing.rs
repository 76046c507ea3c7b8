//! Hand initialization: blind positions, hole cards and blind posting.

use std::collections::{BTreeMap, BTreeSet};

use holdem_shared::{GameError, SeatStatus, Street};

use super::Hand;
use crate::poker::Deck;
use crate::table::Seat;

/// A blind taken from a seat's stack during hand setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindPost {
    pub seat: usize,
    pub amount: u32,
}

/// Small- and big-blind seats for the given dealer.
///
/// Heads-up, the dealer posts the small blind; with three or more players the
/// blinds are the next two active seats clockwise from the dealer.
pub fn blind_positions(
    seats: &[Seat],
    dealer_seat: usize,
) -> Result<(usize, usize), GameError> {
    let n = seats.len();
    let active: Vec<usize> = (0..n)
        .filter(|&i| seats[i].status == SeatStatus::Active)
        .collect();
    if active.len() < 2 {
        return Err(GameError::InsufficientPlayers);
    }
    if !active.contains(&dealer_seat) {
        return Err(GameError::SeatNotFound);
    }

    let next_active = |from: usize| -> usize {
        (1..=n)
            .map(|i| (from + i) % n)
            .find(|&s| seats[s].status == SeatStatus::Active)
            .unwrap_or(from)
    };

    if active.len() == 2 {
        Ok((dealer_seat, next_active(dealer_seat)))
    } else {
        let sb = next_active(dealer_seat);
        Ok((sb, next_active(sb)))
    }
}

impl Hand {
    /// Deal a fresh hand: hole cards to every active seat, blinds posted
    /// (capped to stack, decremented here), first actor set.
    pub fn deal(
        mut deck: Deck,
        seats: &mut [Seat],
        dealer_seat: usize,
        small_blind: u32,
        big_blind: u32,
    ) -> Result<(Hand, Vec<BlindPost>), GameError> {
        let (sb_seat, bb_seat) = blind_positions(seats, dealer_seat)?;

        let mut hole_cards = BTreeMap::new();
        for (i, seat) in seats.iter().enumerate() {
            if seat.status == SeatStatus::Active {
                let c1 = deck.deal()?;
                let c2 = deck.deal()?;
                hole_cards.insert(i, [c1, c2]);
            }
        }

        let mut hand = Hand {
            dealer_seat,
            small_blind_seat: sb_seat,
            big_blind_seat: bb_seat,
            street: Street::Preflop,
            deck,
            board: Vec::new(),
            hole_cards,
            pot: 0,
            bets: BTreeMap::new(),
            contributions: BTreeMap::new(),
            current_bet: 0,
            last_raise: big_blind,
            folded: BTreeSet::new(),
            acted: BTreeSet::new(),
            current_actor: None,
            bb_has_option: true,
            big_blind,
            seat_count: seats.len(),
        };

        let mut posts = Vec::with_capacity(2);
        posts.push(hand.post_blind(seats, sb_seat, small_blind));
        posts.push(hand.post_blind(seats, bb_seat, big_blind));

        // The bet to match is the nominal big blind even when the BB posted
        // short all-in.
        hand.current_bet = big_blind;
        hand.current_actor = hand.first_to_act(seats);

        Ok((hand, posts))
    }

    fn post_blind(&mut self, seats: &mut [Seat], seat: usize, amount: u32) -> BlindPost {
        let posted = amount.min(seats[seat].stack);
        seats[seat].stack -= posted;
        *self.bets.entry(seat).or_insert(0) += posted;
        *self.contributions.entry(seat).or_insert(0) += posted;
        tracing::debug!(seat, posted, stack = seats[seat].stack, "posted blind");
        BlindPost {
            seat,
            amount: posted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Seat;
    use holdem_shared::SeatStatus;

    fn seats(stacks: &[u32]) -> Vec<Seat> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &stack)| Seat {
                token: Some(format!("t{}", i)),
                status: if stack > 0 {
                    SeatStatus::Active
                } else {
                    SeatStatus::Empty
                },
                stack,
            })
            .collect()
    }

    #[test]
    fn heads_up_dealer_posts_small_blind() {
        let s = seats(&[1000, 1000]);
        let (sb, bb) = blind_positions(&s, 0).unwrap();
        assert_eq!((sb, bb), (0, 1));
    }

    #[test]
    fn three_way_blinds_are_left_of_dealer() {
        let s = seats(&[1000, 1000, 1000]);
        let (sb, bb) = blind_positions(&s, 0).unwrap();
        assert_eq!((sb, bb), (1, 2));
    }

    #[test]
    fn blind_positions_skip_gaps() {
        let mut s = seats(&[1000, 0, 1000, 0, 1000, 0]);
        s[1].status = SeatStatus::Empty;
        s[3].status = SeatStatus::Empty;
        s[5].status = SeatStatus::Empty;
        let (sb, bb) = blind_positions(&s, 0).unwrap();
        assert_eq!((sb, bb), (2, 4));
    }

    #[test]
    fn rejects_single_player() {
        let s = seats(&[1000, 0]);
        assert_eq!(
            blind_positions(&s, 0).unwrap_err(),
            GameError::InsufficientPlayers
        );
    }

    #[test]
    fn rejects_inactive_dealer() {
        let mut s = seats(&[1000, 1000, 1000]);
        s[0].status = SeatStatus::Waiting;
        assert_eq!(blind_positions(&s, 0).unwrap_err(), GameError::SeatNotFound);
    }

    #[test]
    fn deal_posts_blinds_and_sets_first_actor() {
        let mut s = seats(&[1000, 1000, 1000]);
        let deck = Deck::shuffled_with_seed(1);
        let (hand, posts) = Hand::deal(deck, &mut s, 0, 10, 20).unwrap();

        assert_eq!(posts, vec![BlindPost { seat: 1, amount: 10 }, BlindPost { seat: 2, amount: 20 }]);
        assert_eq!(s[1].stack, 990);
        assert_eq!(s[2].stack, 980);
        assert_eq!(hand.pot, 0, "blinds stay in street bets until the sweep");
        assert_eq!(hand.bet_of(1), 10);
        assert_eq!(hand.bet_of(2), 20);
        assert_eq!(hand.current_bet, 20);
        assert_eq!(hand.last_raise, 20);
        assert!(hand.bb_has_option);
        // First to act preflop with 3 players is left of the big blind.
        assert_eq!(hand.current_actor, Some(0));
        // Two hole cards per active seat, none shared.
        assert_eq!(hand.hole_cards.len(), 3);
    }

    #[test]
    fn short_big_blind_posts_full_stack() {
        let mut s = seats(&[1000, 1000, 15]);
        let deck = Deck::shuffled_with_seed(2);
        let (hand, posts) = Hand::deal(deck, &mut s, 0, 10, 20).unwrap();
        assert_eq!(posts[1], BlindPost { seat: 2, amount: 15 });
        assert_eq!(s[2].stack, 0);
        // The nominal big blind is still the bet to match.
        assert_eq!(hand.current_bet, 20);
    }
}
