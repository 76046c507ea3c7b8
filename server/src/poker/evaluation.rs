//! 7-card hand evaluation.
//!
//! `evaluate_best_hand` takes two hole cards plus up to five board cards and
//! returns a totally ordered [`HandRank`]. Two hands with equal rank split.

use holdem_shared::{Card, Rank, Suit};

/// Hand categories in ascending strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

/// Total order over poker hands: category first, then tiebreaker values
/// (ace-high, most significant first) compared lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreakers: Vec<u8>,
}

impl HandRank {
    /// Human-readable form for showdown payloads, e.g. "pair of Kings".
    pub fn describe(&self) -> String {
        let high = self.tiebreakers.first().copied().unwrap_or(0);
        match self.category {
            HandCategory::HighCard => format!("high card {}", value_name(high)),
            HandCategory::Pair => format!("pair of {}s", value_name(high)),
            HandCategory::TwoPair => {
                let low = self.tiebreakers.get(1).copied().unwrap_or(0);
                format!("two pair, {}s and {}s", value_name(high), value_name(low))
            }
            HandCategory::ThreeOfAKind => format!("three of a kind, {}s", value_name(high)),
            HandCategory::Straight => format!("straight, {} high", value_name(high)),
            HandCategory::Flush => format!("flush, {} high", value_name(high)),
            HandCategory::FullHouse => {
                let low = self.tiebreakers.get(1).copied().unwrap_or(0);
                format!(
                    "full house, {}s over {}s",
                    value_name(high),
                    value_name(low)
                )
            }
            HandCategory::FourOfAKind => format!("four of a kind, {}s", value_name(high)),
            HandCategory::StraightFlush => {
                format!("straight flush, {} high", value_name(high))
            }
        }
    }
}

fn value_name(v: u8) -> &'static str {
    Rank::ALL
        .iter()
        .find(|r| r.value() == v)
        .map(|r| r.name())
        .unwrap_or("?")
}

/// Evaluate the best 5-card hand available from hole + board (5..=7 cards).
pub fn evaluate_best_hand(hole: [Card; 2], board: &[Card]) -> HandRank {
    let mut cards = Vec::with_capacity(7);
    cards.push(hole[0]);
    cards.push(hole[1]);
    cards.extend_from_slice(board);
    rank_cards(&cards)
}

/// Rank an arbitrary 5..=7 card set.
pub fn rank_cards(cards: &[Card]) -> HandRank {
    let flush_suit = flush_suit(cards);

    if let Some(suit) = flush_suit {
        let suited: Vec<u8> = cards
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.rank.value())
            .collect();
        if let Some(high) = straight_high(&suited) {
            return HandRank {
                category: HandCategory::StraightFlush,
                tiebreakers: vec![high],
            };
        }
    }

    let counts = value_counts(cards);
    let values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();

    if let Some(rank) = find_quads(&counts, &values) {
        return rank;
    }
    if let Some(rank) = find_full_house(&counts) {
        return rank;
    }
    if let Some(suit) = flush_suit {
        let mut suited: Vec<u8> = cards
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.rank.value())
            .collect();
        suited.sort_unstable_by(|a, b| b.cmp(a));
        suited.truncate(5);
        return HandRank {
            category: HandCategory::Flush,
            tiebreakers: suited,
        };
    }
    if let Some(high) = straight_high(&values) {
        return HandRank {
            category: HandCategory::Straight,
            tiebreakers: vec![high],
        };
    }
    if let Some(rank) = find_set_with_kickers(&counts, &values, 3, 2, HandCategory::ThreeOfAKind) {
        return rank;
    }
    if let Some(rank) = find_two_pair(&counts, &values) {
        return rank;
    }
    if let Some(rank) = find_set_with_kickers(&counts, &values, 2, 3, HandCategory::Pair) {
        return rank;
    }

    let mut highs = values;
    highs.sort_unstable_by(|a, b| b.cmp(a));
    highs.dedup();
    highs.truncate(5);
    HandRank {
        category: HandCategory::HighCard,
        tiebreakers: highs,
    }
}

fn flush_suit(cards: &[Card]) -> Option<Suit> {
    Suit::ALL
        .iter()
        .copied()
        .find(|&s| cards.iter().filter(|c| c.suit == s).count() >= 5)
}

fn value_counts(cards: &[Card]) -> [u8; 15] {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.rank.value() as usize] += 1;
    }
    counts
}

/// Highest straight top-card among the values, treating the Ace as 1 for the
/// wheel (A-2-3-4-5). Returns None if there is no 5-card run.
fn straight_high(values: &[u8]) -> Option<u8> {
    let mut present = [false; 15];
    for &v in values {
        present[v as usize] = true;
    }
    if present[14] {
        present[1] = true;
    }
    let mut best = None;
    for high in (5..=14u8).rev() {
        if (high - 4..=high).all(|v| present[v as usize]) {
            best = Some(high);
            break;
        }
    }
    best
}

fn find_quads(counts: &[u8; 15], values: &[u8]) -> Option<HandRank> {
    let quad = (2..=14u8).rev().find(|&v| counts[v as usize] == 4)?;
    let kicker = values.iter().copied().filter(|&v| v != quad).max()?;
    Some(HandRank {
        category: HandCategory::FourOfAKind,
        tiebreakers: vec![quad, kicker],
    })
}

fn find_full_house(counts: &[u8; 15]) -> Option<HandRank> {
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    for v in (2..=14u8).rev() {
        match counts[v as usize] {
            c if c >= 3 => trips.push(v),
            2 => pairs.push(v),
            _ => {}
        }
    }
    let trip = *trips.first()?;
    // A second set of trips can fill the pair slot.
    let pair = pairs
        .first()
        .copied()
        .or_else(|| trips.get(1).copied())?;
    Some(HandRank {
        category: HandCategory::FullHouse,
        tiebreakers: vec![trip, pair],
    })
}

fn find_set_with_kickers(
    counts: &[u8; 15],
    values: &[u8],
    n: u8,
    kicker_count: usize,
    category: HandCategory,
) -> Option<HandRank> {
    let set = (2..=14u8).rev().find(|&v| counts[v as usize] == n)?;
    let mut kickers: Vec<u8> = values.iter().copied().filter(|&v| v != set).collect();
    kickers.sort_unstable_by(|a, b| b.cmp(a));
    kickers.dedup();
    kickers.truncate(kicker_count);
    let mut tiebreakers = vec![set];
    tiebreakers.extend(kickers);
    Some(HandRank {
        category,
        tiebreakers,
    })
}

fn find_two_pair(counts: &[u8; 15], values: &[u8]) -> Option<HandRank> {
    let pairs: Vec<u8> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] >= 2)
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let (high, low) = (pairs[0], pairs[1]);
    let kicker = values
        .iter()
        .copied()
        .filter(|&v| v != high && v != low)
        .max()
        .unwrap_or(0);
    Some(HandRank {
        category: HandCategory::TwoPair,
        tiebreakers: vec![high, low, kicker],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &str) -> Vec<Card> {
        list.split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    fn hole(a: &str, b: &str) -> [Card; 2] {
        [a.parse().unwrap(), b.parse().unwrap()]
    }

    #[test]
    fn detects_wheel_straight() {
        let rank = evaluate_best_hand(hole("As", "2h"), &cards("3d 4c 5s Kh 9d"));
        assert_eq!(rank.category, HandCategory::Straight);
        assert_eq!(rank.tiebreakers, vec![5]);
    }

    #[test]
    fn straight_flush_beats_quads() {
        let sf = evaluate_best_hand(hole("9h", "8h"), &cards("7h 6h 5h Ac Ad"));
        let quads = evaluate_best_hand(hole("Ac", "Ad"), &cards("As Ah Kc 2d 3s"));
        assert_eq!(sf.category, HandCategory::StraightFlush);
        assert_eq!(quads.category, HandCategory::FourOfAKind);
        assert!(sf > quads);
    }

    #[test]
    fn two_trips_make_a_full_house() {
        let rank = evaluate_best_hand(hole("Kc", "Kd"), &cards("Ks 7h 7d 7c 2s"));
        assert_eq!(rank.category, HandCategory::FullHouse);
        assert_eq!(rank.tiebreakers, vec![13, 7]);
    }

    #[test]
    fn kickers_break_pair_ties() {
        let a = evaluate_best_hand(hole("Ah", "Kd"), &cards("As 9c 7d 4s 2h"));
        let b = evaluate_best_hand(hole("Ac", "Qd"), &cards("As 9c 7d 4s 2h"));
        assert_eq!(a.category, HandCategory::Pair);
        assert!(a > b);
    }

    #[test]
    fn identical_boards_tie() {
        let board = cards("Ah Kh Qh Jh Th");
        let a = evaluate_best_hand(hole("2c", "3d"), &board);
        let b = evaluate_best_hand(hole("4s", "5c"), &board);
        assert_eq!(a, b);
        assert_eq!(a.category, HandCategory::StraightFlush);
    }

    #[test]
    fn describe_is_humane() {
        let rank = evaluate_best_hand(hole("Kc", "Kd"), &cards("2s 7h 9d Tc 4s"));
        assert_eq!(rank.describe(), "pair of Kings");
    }
}
