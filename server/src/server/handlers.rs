//! Inbound message handling: validate, mutate under the table lock, then
//! broadcast after the lock is released.

use std::io::IsTerminal;

use holdem_shared::{
    ActionResult, BlindPosted, BoardDealt, ClientMsg, GameError, HandEnded, HandStarted,
    PlayerActionMsg, PlayerBusted, ServerMsg, SitRequest,
};

use super::hub::TableBroadcast;
use super::state::AppState;
use super::view::{self, TableView};
use crate::pretty;
use crate::table::TableEvent;

/// Dispatch one client message. Validation failures come back as `Err` and
/// are answered only to the sender; successful mutations broadcast.
pub async fn handle_client_msg(
    state: &AppState,
    token: &str,
    msg: ClientMsg,
) -> Result<(), GameError> {
    match msg {
        ClientMsg::Sit(req) => handle_sit(state, token, req).await,
        ClientMsg::Leave => handle_leave(state, token).await,
        ClientMsg::StartHand => handle_start_hand(state, token).await,
        ClientMsg::PlayerAction(action) => handle_action(state, token, action).await,
    }
}

async fn handle_sit(state: &AppState, token: &str, req: SitRequest) -> Result<(), GameError> {
    let session = state.sessions.get(token).await.ok_or(GameError::NotSeated)?;
    match session.table_id.as_deref() {
        None => {}
        // Re-sitting at the same table is a no-op; the snapshot below resyncs.
        Some(current) if current == req.table_id => {}
        // One seat per session; leave first.
        Some(_) => return Err(GameError::AlreadySeated),
    }
    let table_arc = state
        .table(&req.table_id)
        .await
        .ok_or(GameError::TableNotFound)?;

    let snapshot = {
        let mut table = table_arc.write().await;
        let seat = table.assign_seat(token)?;
        // Lock order: table outer, sessions inner.
        state.sessions.set_seat(token, &req.table_id, seat).await;
        tracing::info!(table = %table.id, seat, "player seated");
        view::snapshot(&table)
    };

    state
        .hub
        .broadcast(&req.table_id, TableBroadcast::Snapshot(snapshot))
        .await;
    broadcast_lobby(state).await;
    Ok(())
}

async fn handle_leave(state: &AppState, token: &str) -> Result<(), GameError> {
    let session = state.sessions.get(token).await.ok_or(GameError::NotSeated)?;
    let table_id = session.table_id.ok_or(GameError::NotSeated)?;
    let table_arc = state
        .table(&table_id)
        .await
        .ok_or(GameError::TableNotFound)?;

    let (events, snapshot) = {
        let mut table = table_arc.write().await;
        let events = table.leave(token)?;
        state.sessions.clear_seat(token).await;
        tracing::info!(table = %table.id, "player left");
        (events, view::snapshot(&table))
    };

    publish(state, &table_id, events, snapshot).await;
    broadcast_lobby(state).await;
    Ok(())
}

async fn handle_start_hand(state: &AppState, token: &str) -> Result<(), GameError> {
    let session = state.sessions.get(token).await.ok_or(GameError::NotSeated)?;
    let table_id = session.table_id.ok_or(GameError::NotSeated)?;
    let table_arc = state
        .table(&table_id)
        .await
        .ok_or(GameError::TableNotFound)?;

    let (events, snapshot) = {
        let mut table = table_arc.write().await;
        let events = table.start_hand()?;
        (events, view::snapshot(&table))
    };

    publish(state, &table_id, events, snapshot).await;
    Ok(())
}

async fn handle_action(
    state: &AppState,
    token: &str,
    action: PlayerActionMsg,
) -> Result<(), GameError> {
    let session = state.sessions.get(token).await.ok_or(GameError::NotSeated)?;
    let table_id = session.table_id.ok_or(GameError::NotSeated)?;
    let table_arc = state
        .table(&table_id)
        .await
        .ok_or(GameError::TableNotFound)?;

    let (events, snapshot, busted) = {
        let mut table = table_arc.write().await;
        let seat = table
            .seat_by_token(token)
            .ok_or(GameError::SeatNotFound)?;
        let events = table.apply_action(seat, action.action, action.amount)?;
        let busted: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                TableEvent::PlayerBusted { token, .. } => Some(token.clone()),
                _ => None,
            })
            .collect();
        for token in &busted {
            state.sessions.clear_seat(token).await;
        }
        (events, view::snapshot(&table), busted)
    };

    publish(state, &table_id, events, snapshot).await;
    if !busted.is_empty() {
        broadcast_lobby(state).await;
    }
    Ok(())
}

/// Translate engine events to wire messages and hand them to the hub, ending
/// with a projected snapshot so every client converges on the same state.
pub async fn publish(
    state: &AppState,
    table_id: &str,
    events: Vec<TableEvent>,
    snapshot: TableView,
) {
    let color = std::io::stderr().is_terminal();
    for event in events {
        tracing::info!("{}", pretty::format_event(&event, color));
        match event {
            TableEvent::CardsDealt => {
                // The envelope announces the deal; the cards themselves ride
                // in the per-recipient snapshot that follows.
                state
                    .hub
                    .broadcast(table_id, TableBroadcast::Uniform(ServerMsg::CardsDealt))
                    .await;
                state
                    .hub
                    .broadcast(table_id, TableBroadcast::Snapshot(snapshot.clone()))
                    .await;
            }
            other => {
                state
                    .hub
                    .broadcast(table_id, TableBroadcast::Uniform(to_wire(other)))
                    .await;
            }
        }
    }
    state
        .hub
        .broadcast(table_id, TableBroadcast::Snapshot(snapshot))
        .await;
}

fn to_wire(event: TableEvent) -> ServerMsg {
    match event {
        TableEvent::HandStarted {
            dealer_seat,
            small_blind_seat,
            big_blind_seat,
        } => ServerMsg::HandStarted(HandStarted {
            dealer_seat,
            small_blind_seat,
            big_blind_seat,
        }),
        TableEvent::BlindPosted { seat, amount } => ServerMsg::BlindPosted(BlindPosted {
            seat_index: seat,
            amount,
        }),
        TableEvent::CardsDealt => ServerMsg::CardsDealt,
        TableEvent::ActionResult {
            seat,
            action,
            amount,
            chips_moved,
        } => ServerMsg::ActionResult(ActionResult {
            seat_index: seat,
            action,
            amount,
            chips_moved,
        }),
        TableEvent::BoardDealt { street, board } => ServerMsg::BoardDealt(BoardDealt {
            street,
            board_cards: board,
        }),
        TableEvent::ActionRequest(req) => ServerMsg::ActionRequest(req),
        TableEvent::HandEnded {
            winners,
            pots,
            revealed,
        } => ServerMsg::HandEnded(HandEnded {
            winners,
            pots_awarded: pots,
            revealed_hole_cards: revealed,
        }),
        TableEvent::PlayerBusted { seat, token } => ServerMsg::PlayerBusted(PlayerBusted {
            seat_index: seat,
            token,
        }),
    }
}

async fn broadcast_lobby(state: &AppState) {
    let lobby = state.lobby_state().await;
    state
        .hub
        .broadcast_all(ServerMsg::LobbyState(lobby))
        .await;
}
