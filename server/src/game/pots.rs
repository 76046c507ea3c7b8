//! Side-pot construction from cumulative contributions.

use std::collections::{BTreeMap, BTreeSet};

/// One layer of the pot with the seats that can win it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidePot {
    pub amount: u32,
    /// Ascending seat order. May be empty when every contributor to the
    /// layer folded; such chips are unawardable residue.
    pub eligible: Vec<usize>,
}

/// Layer the total contributions into pots.
///
/// Each distinct contribution level closes a layer funded by everyone who
/// put in at least that much; folded seats fund layers but cannot win them.
pub fn calculate_side_pots(
    contributions: &BTreeMap<usize, u32>,
    folded: &BTreeSet<usize>,
) -> Vec<SidePot> {
    let mut levels: Vec<u32> = contributions
        .values()
        .copied()
        .filter(|&c| c > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::new();
    let mut prev = 0u32;
    for level in levels {
        let participants: Vec<usize> = contributions
            .iter()
            .filter(|&(_, &c)| c >= level)
            .map(|(&s, _)| s)
            .collect();
        let amount = (level - prev) * participants.len() as u32;
        let eligible: Vec<usize> = participants
            .iter()
            .copied()
            .filter(|s| !folded.contains(s))
            .collect();
        if amount > 0 {
            pots.push(SidePot { amount, eligible });
        }
        prev = level;
    }
    pots
}
