//! Action validity and processing.

use holdem_shared::{ActionType, GameError, Street};

use super::Hand;

impl Hand {
    /// Chips this seat must add to match the current bet.
    pub fn call_amount(&self, seat: usize) -> u32 {
        self.current_bet.saturating_sub(self.bet_of(seat))
    }

    /// Minimum raise target total for the street. With no bet outstanding
    /// postflop, the minimum open is the big blind.
    pub fn min_raise_to(&self) -> u32 {
        if self.current_bet == 0 {
            self.big_blind
        } else {
            self.current_bet + self.last_raise
        }
    }

    /// Maximum raise target total: the seat's whole stack goes in. Never
    /// capped by opponents' stacks.
    pub fn max_raise_to(&self, seat: usize, stack: u32) -> u32 {
        self.bet_of(seat) + stack
    }

    /// The actions available to a seat holding `stack` chips. All-in seats
    /// get none; a seat that has already acted and faces only a short
    /// all-in bump may call or fold but not raise again.
    pub fn valid_actions(&self, seat: usize, stack: u32) -> Vec<ActionType> {
        if stack == 0 || !self.is_live(seat) {
            return Vec::new();
        }
        let mut actions = vec![ActionType::Fold];
        let need = self.call_amount(seat);
        if need == 0 {
            actions.push(ActionType::Check);
        } else {
            actions.push(ActionType::Call);
        }
        if stack > need && !self.acted.contains(&seat) {
            actions.push(ActionType::Raise);
        }
        actions
    }

    /// Check a raise to `target` (street total) for legality. An all-in for
    /// less than the minimum raise is legal but does not reopen the action.
    pub fn validate_raise(&self, seat: usize, target: u32, stack: u32) -> Result<(), GameError> {
        if target <= self.current_bet {
            return Err(GameError::RaiseBelowMinimum);
        }
        let increment = target.saturating_sub(self.bet_of(seat));
        if increment > stack {
            return Err(GameError::RaiseExceedsStack);
        }
        if target < self.min_raise_to() && increment != stack {
            return Err(GameError::RaiseBelowMinimum);
        }
        Ok(())
    }

    /// Apply one action for the seat currently due to act. Returns the chips
    /// taken from the stack; the caller decrements the seat.
    pub fn process_action(
        &mut self,
        seat: usize,
        action: ActionType,
        stack: u32,
        amount: Option<u32>,
    ) -> Result<u32, GameError> {
        if self.current_actor != Some(seat) {
            return Err(GameError::OutOfTurn);
        }
        if !self.is_live(seat) || stack == 0 {
            return Err(GameError::InvalidAction);
        }

        let chips_moved = match action {
            ActionType::Fold => {
                self.folded.insert(seat);
                self.acted.insert(seat);
                0
            }
            ActionType::Check => {
                if self.call_amount(seat) != 0 {
                    return Err(GameError::CheckWhenBehind);
                }
                self.acted.insert(seat);
                0
            }
            ActionType::Call => {
                let pay = self.call_amount(seat).min(stack);
                *self.bets.entry(seat).or_insert(0) += pay;
                *self.contributions.entry(seat).or_insert(0) += pay;
                self.acted.insert(seat);
                pay
            }
            ActionType::Raise => {
                let target = amount.ok_or(GameError::RaiseMissingAmount)?;
                self.validate_raise(seat, target, stack)?;
                let full_raise = target >= self.min_raise_to();
                let pay = target.saturating_sub(self.bet_of(seat)).min(stack);
                *self.bets.entry(seat).or_insert(0) += pay;
                *self.contributions.entry(seat).or_insert(0) += pay;

                let previous = self.current_bet;
                self.current_bet = self.bet_of(seat);
                if full_raise {
                    // A full raise reopens the betting: everyone still in must
                    // act again against the new price. A short all-in bumps
                    // current_bet only.
                    self.last_raise = self.current_bet - previous;
                    let folded = self.folded.clone();
                    self.acted
                        .retain(|&s| s == seat || folded.contains(&s));
                }
                self.acted.insert(seat);
                pay
            }
        };

        // Any action by the big blind, and any raise, ends the preflop option.
        if self.street == Street::Preflop
            && (seat == self.big_blind_seat || self.current_bet > self.big_blind)
        {
            self.bb_has_option = false;
        }

        Ok(chips_moved)
    }
}
