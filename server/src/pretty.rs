//! Human-readable console lines for table events.

use owo_colors::OwoColorize;

use holdem_shared::ActionType;

use crate::table::TableEvent;

/// One line per event; `color` should be tied to the output being a terminal.
pub fn format_event(event: &TableEvent, color: bool) -> String {
    match event {
        TableEvent::HandStarted {
            dealer_seat,
            small_blind_seat,
            big_blind_seat,
        } => format!(
            "{} button seat {}, SB seat {}, BB seat {}",
            tag("HAND", color),
            dealer_seat,
            small_blind_seat,
            big_blind_seat
        ),
        TableEvent::BlindPosted { seat, amount } => {
            format!("{} seat {} posts {}", tag("BLIND", color), seat, amount)
        }
        TableEvent::CardsDealt => format!("{} hole cards out", tag("DEAL", color)),
        TableEvent::ActionResult {
            seat,
            action,
            chips_moved,
            ..
        } => match action {
            ActionType::Fold => format!("{} seat {} folds", tag("FOLD", color), seat),
            ActionType::Check => format!("{} seat {} checks", tag("CHECK", color), seat),
            ActionType::Call => {
                format!("{} seat {} calls {}", tag("CALL", color), seat, chips_moved)
            }
            ActionType::Raise => format!(
                "{} seat {} raises, {} in",
                tag("RAISE", color),
                seat,
                chips_moved
            ),
        },
        TableEvent::BoardDealt { street, board } => {
            let cards = board
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} {}: {}", tag("BOARD", color), street, cards)
        }
        TableEvent::ActionRequest(req) => format!(
            "{} seat {} to act (call {}, pot {})",
            tag("TURN", color),
            req.seat_index,
            req.call_amount,
            req.pot
        ),
        TableEvent::HandEnded { winners, .. } => {
            let list = winners
                .iter()
                .map(|w| format!("seat {} +{}", w.seat_index, w.amount))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} {}", tag("SHOWDOWN", color), list)
        }
        TableEvent::PlayerBusted { seat, .. } => {
            format!("{} seat {} busted", tag("BUST", color), seat)
        }
    }
}

fn tag(name: &str, color: bool) -> String {
    if color {
        format!("[{}]", name.bold())
    } else {
        format!("[{}]", name)
    }
}
