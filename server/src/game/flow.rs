//! Turn order, betting-round completion and street advancement.

use holdem_shared::{GameError, Street};

use super::Hand;
use crate::table::Seat;

impl Hand {
    /// Positional first actor for the current street, before skipping all-in
    /// seats: preflop it is left of the big blind (the dealer heads-up),
    /// postflop left of the dealer.
    fn first_actor_origin(&self) -> usize {
        match self.street {
            // Scanning starts after the origin, so this covers heads-up too:
            // the first live seat after the BB is the dealer.
            Street::Preflop => self.big_blind_seat,
            _ => self.dealer_seat,
        }
    }

    /// First seat that can actually act on this street: live, with chips,
    /// scanning clockwise from the positional origin. None when no seat can
    /// act (everyone all-in or folded).
    pub fn first_to_act(&self, seats: &[Seat]) -> Option<usize> {
        let origin = self.first_actor_origin();
        self.clockwise_from(origin)
            .find(|&s| self.is_live(s) && seats[s].stack > 0)
    }

    /// True when no further action is needed this street.
    ///
    /// All-in seats count as having acted and are exempt from bet matching.
    /// When at most one live seat has chips behind, no bet can be answered,
    /// so the round is complete regardless of who has acted.
    pub fn is_betting_round_complete(&self, seats: &[Seat]) -> bool {
        let live = self.live_seats();
        if live.len() <= 1 {
            return true;
        }
        // Everyone with chips must have matched the current bet.
        for &s in &live {
            if seats[s].stack > 0 && self.bet_of(s) != self.current_bet {
                return false;
            }
        }
        if self.live_with_chips(seats) <= 1 {
            return true;
        }
        // And everyone with chips must have had their say, which preflop
        // includes the big blind's option on an unopened pot.
        live.iter()
            .all(|&s| seats[s].stack == 0 || self.acted.contains(&s))
    }

    /// Move `current_actor` to the next seat that can act, or None when the
    /// round is complete. All-in seats are passed through silently.
    pub fn advance_action(&mut self, seats: &[Seat]) {
        if self.is_betting_round_complete(seats) {
            self.current_actor = None;
            return;
        }
        let from = self.current_actor.unwrap_or(self.dealer_seat);
        let next = self
            .clockwise_from(from)
            .find(|&s| self.is_live(s) && seats[s].stack > 0);
        self.current_actor = next;
    }

    /// True when at least one live seat is all-in and no more than one live
    /// seat still has chips to bet: the hand can be dealt out with no
    /// further action.
    pub fn all_active_players_all_in(&self, seats: &[Seat]) -> bool {
        let live = self.live_seats();
        let all_in = live.iter().filter(|&&s| seats[s].stack == 0).count();
        all_in >= 1 && live.len() - all_in <= 1
    }

    /// Sweep street bets into the pot, deal the next street and hand the
    /// action to the first eligible seat. No-op on the river.
    pub fn advance_street(&mut self, seats: &[Seat]) -> Result<(), GameError> {
        let next = match self.street.next() {
            Some(next) => next,
            None => return Ok(()),
        };

        // Pot sweep: in-street bets become pot only here.
        let swept: u32 = self.bets.values().sum();
        self.pot += swept;
        self.bets.clear();
        self.current_bet = 0;
        self.acted.clear();
        // last_raise is preserved; the minimum open on the new street is
        // handled by min_raise_to().

        self.street = next;
        self.deck.burn()?;
        let count = if next == Street::Flop { 3 } else { 1 };
        for _ in 0..count {
            let card = self.deck.deal()?;
            self.board.push(card);
        }

        self.bb_has_option = false;
        self.current_actor = self.first_to_act(seats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Hand;
    use crate::poker::Deck;
    use crate::table::Seat;
    use holdem_shared::{ActionType, SeatStatus};

    fn seats(stacks: &[u32]) -> Vec<Seat> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &stack)| Seat {
                token: Some(format!("t{}", i)),
                status: SeatStatus::Active,
                stack,
            })
            .collect()
    }

    fn fresh_hand(stacks: &[u32]) -> (Hand, Vec<Seat>) {
        let mut s = seats(stacks);
        let deck = Deck::shuffled_with_seed(5);
        let (hand, _) = Hand::deal(deck, &mut s, 0, 10, 20).unwrap();
        (hand, s)
    }

    fn act(hand: &mut Hand, seats: &mut [Seat], seat: usize, action: ActionType, amount: Option<u32>) {
        let stack = seats[seat].stack;
        let pay = hand.process_action(seat, action, stack, amount).unwrap();
        seats[seat].stack -= pay;
        hand.advance_action(seats);
    }

    #[test]
    fn big_blind_option_keeps_round_open() {
        let (mut hand, mut s) = fresh_hand(&[1000, 1000]);
        // Heads-up: dealer/SB is seat 0 and acts first.
        assert_eq!(hand.current_actor, Some(0));
        act(&mut hand, &mut s, 0, ActionType::Call, None);
        // Bets are level but the BB has not spoken.
        assert!(!hand.is_betting_round_complete(&s));
        assert_eq!(hand.current_actor, Some(1));
        act(&mut hand, &mut s, 1, ActionType::Check, None);
        assert!(hand.is_betting_round_complete(&s));
        assert!(!hand.bb_has_option);
    }

    #[test]
    fn round_completes_when_bets_match_and_all_acted() {
        let (mut hand, mut s) = fresh_hand(&[1000, 1000, 1000]);
        act(&mut hand, &mut s, 0, ActionType::Call, None);
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        assert!(!hand.is_betting_round_complete(&s));
        act(&mut hand, &mut s, 2, ActionType::Check, None);
        assert!(hand.is_betting_round_complete(&s));
    }

    #[test]
    fn all_in_seats_do_not_block_completion() {
        let (mut hand, mut s) = fresh_hand(&[1000, 1000, 30]);
        // Seat 0 min-raises to 40; seat 1 calls; seat 2 (BB with 10 behind)
        // calls all-in for 30 total.
        act(&mut hand, &mut s, 0, ActionType::Raise, Some(40));
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        act(&mut hand, &mut s, 2, ActionType::Call, None);
        assert_eq!(s[2].stack, 0);
        // Seat 2 is all-in short of 40 yet does not hold the round open.
        assert!(hand.is_betting_round_complete(&s));
    }

    #[test]
    fn all_in_fairness_with_unequal_bets() {
        let (mut hand, mut s) = fresh_hand(&[100, 40, 1000]);
        // Everyone jams preflop; the bets are unequal but nobody can act.
        act(&mut hand, &mut s, 0, ActionType::Raise, Some(100));
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        act(&mut hand, &mut s, 2, ActionType::Call, None);
        assert_eq!(s[0].stack, 0);
        assert_eq!(s[1].stack, 0);
        assert!(hand.is_betting_round_complete(&s));
        assert!(hand.all_active_players_all_in(&s));
    }

    #[test]
    fn advance_street_sweeps_pot_and_deals_board() {
        let (mut hand, mut s) = fresh_hand(&[1000, 1000]);
        act(&mut hand, &mut s, 0, ActionType::Call, None);
        act(&mut hand, &mut s, 1, ActionType::Check, None);
        assert_eq!(hand.pot, 0);

        let deck_before = hand.deck.len();
        hand.advance_street(&s).unwrap();
        assert_eq!(hand.street, Street::Flop);
        assert_eq!(hand.pot, 40);
        assert!(hand.bets.is_empty());
        assert_eq!(hand.current_bet, 0);
        assert_eq!(hand.board.len(), 3);
        // One burn plus three flop cards.
        assert_eq!(hand.deck.len(), deck_before - 4);
        // Heads-up postflop the big blind acts first (left of dealer).
        assert_eq!(hand.current_actor, Some(1));
    }

    #[test]
    fn river_is_terminal() {
        let (mut hand, mut s) = fresh_hand(&[1000, 1000]);
        act(&mut hand, &mut s, 0, ActionType::Call, None);
        act(&mut hand, &mut s, 1, ActionType::Check, None);
        for _ in 0..3 {
            hand.advance_street(&s).unwrap();
            hand.acted.insert(0);
            hand.acted.insert(1);
        }
        assert_eq!(hand.street, Street::River);
        assert_eq!(hand.board.len(), 5);
        let len = hand.deck.len();
        hand.advance_street(&s).unwrap();
        assert_eq!(hand.street, Street::River);
        assert_eq!(hand.deck.len(), len, "river advance must be a no-op");
    }

    #[test]
    fn seat_rotation_returns_all_in_seats_but_skips_folds() {
        let (mut hand, mut s) = fresh_hand(&[1000, 50, 1000]);
        act(&mut hand, &mut s, 0, ActionType::Raise, Some(50));
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        assert_eq!(s[1].stack, 0);
        hand.folded.insert(2);
        // Rotation still lands on the all-in seat 1; the fold is skipped.
        assert_eq!(hand.next_live_seat(0), Some(1));
        assert_eq!(hand.next_live_seat(1), Some(0));
    }

    #[test]
    fn postflop_first_actor_skips_all_in_seats() {
        let (mut hand, mut s) = fresh_hand(&[1000, 50, 1000]);
        // Seat 1 (SB) jams for 50; others call.
        act(&mut hand, &mut s, 0, ActionType::Raise, Some(50));
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        act(&mut hand, &mut s, 2, ActionType::Call, None);
        assert_eq!(s[1].stack, 0);
        hand.advance_street(&s).unwrap();
        // Postflop action starts left of dealer, but seat 1 is all-in.
        assert_eq!(hand.current_actor, Some(2));
    }

    #[test]
    fn lone_funded_seat_cannot_be_asked_to_act() {
        let (mut hand, mut s) = fresh_hand(&[1000, 30, 30]);
        act(&mut hand, &mut s, 0, ActionType::Raise, Some(40));
        act(&mut hand, &mut s, 1, ActionType::Call, None);
        act(&mut hand, &mut s, 2, ActionType::Call, None);
        assert!(hand.is_betting_round_complete(&s));
        hand.advance_street(&s).unwrap();
        // Only seat 0 has chips; no betting is possible on the flop.
        assert!(hand.is_betting_round_complete(&s));
        assert!(hand.all_active_players_all_in(&s));
    }
}
