//! Showdown resolution: evaluation, pot distribution and the odd-chip rule.

use std::collections::BTreeMap;

use holdem_shared::messages::HoleCardMap;
use holdem_shared::{PotAward, WinnerInfo};

use super::pots::calculate_side_pots;
use super::Hand;
use crate::poker::evaluate_best_hand;

/// Everything the table needs to close out a hand: per-seat payouts, the
/// awarded pot layers, and the winners list for the wire.
#[derive(Clone, Debug)]
pub struct Settlement {
    pub payouts: BTreeMap<usize, u32>,
    pub pots: Vec<PotAward>,
    /// Ordered clockwise from the seat left of the dealer; the first listed
    /// winner received any odd chip.
    pub winners: Vec<WinnerInfo>,
    /// Hole cards revealed to everyone; None when the hand ended on folds.
    pub revealed: Option<HoleCardMap>,
}

impl Hand {
    /// Distance of `seat` clockwise from the seat left of the dealer; the
    /// ordering key for odd-chip distribution.
    fn clockwise_rank(&self, seat: usize) -> usize {
        let n = self.seat_count;
        (seat + n - (self.dealer_seat + 1) % n) % n
    }

    /// Resolve the hand. Sweeps any outstanding street bets, then either
    /// awards everything to the last live seat or evaluates each side pot.
    pub fn settle(&mut self) -> Settlement {
        let swept: u32 = self.bets.values().sum();
        self.pot += swept;
        self.bets.clear();

        let live = self.live_seats();
        if live.len() == 1 {
            let winner = live[0];
            let amount = self.pot;
            self.pot = 0;
            return Settlement {
                payouts: [(winner, amount)].into_iter().collect(),
                pots: vec![PotAward {
                    amount,
                    eligible_seats: vec![winner],
                }],
                winners: vec![WinnerInfo {
                    seat_index: winner,
                    amount,
                    rank_description: None,
                }],
                revealed: None,
            };
        }

        let ranks: BTreeMap<usize, _> = live
            .iter()
            .map(|&s| (s, evaluate_best_hand(self.hole_cards[&s], &self.board)))
            .collect();

        let mut payouts: BTreeMap<usize, u32> = BTreeMap::new();
        let mut awards = Vec::new();
        for pot in calculate_side_pots(&self.contributions, &self.folded) {
            awards.push(PotAward {
                amount: pot.amount,
                eligible_seats: pot.eligible.clone(),
            });
            let best = match pot.eligible.iter().map(|s| &ranks[s]).max() {
                Some(best) => best.clone(),
                None => continue, // unawardable residue
            };
            let mut winners: Vec<usize> = pot
                .eligible
                .iter()
                .copied()
                .filter(|s| ranks[s] == best)
                .collect();
            winners.sort_by_key(|&s| self.clockwise_rank(s));

            let share = pot.amount / winners.len() as u32;
            let mut remainder = pot.amount % winners.len() as u32;
            for &w in &winners {
                let mut take = share;
                if remainder > 0 {
                    take += 1;
                    remainder -= 1;
                }
                *payouts.entry(w).or_insert(0) += take;
            }
        }
        self.pot = 0;

        let mut winners: Vec<WinnerInfo> = payouts
            .iter()
            .map(|(&seat, &amount)| WinnerInfo {
                seat_index: seat,
                amount,
                rank_description: Some(ranks[&seat].describe()),
            })
            .collect();
        winners.sort_by_key(|w| self.clockwise_rank(w.seat_index));

        let revealed: HoleCardMap = live
            .iter()
            .map(|&s| (s, self.hole_cards[&s]))
            .collect();

        Settlement {
            payouts,
            pots: awards,
            winners,
            revealed: Some(revealed),
        }
    }
}
