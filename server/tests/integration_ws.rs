//! WebSocket integration: lobby census, seating, hand start and the
//! hole-card privacy filter, observed through real client connections.

use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use holdem_server::config::Config;
use holdem_server::server::{build_router, AppState};
use holdem_shared::{ClientMsg, ServerMsg, SitRequest};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> Result<(u16, tokio::task::JoinHandle<()>)> {
    let state = AppState::new(Config::default());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok((port, handle))
}

async fn connect(port: u16, token: &str, name: &str) -> Result<WsStream> {
    let url = format!("ws://127.0.0.1:{}/ws?token={}&name={}", port, token, name);
    let (stream, _) = tokio_tungstenite::connect_async(&url).await?;
    Ok(stream)
}

async fn send(ws: &mut WsStream, msg: &ClientMsg) -> Result<()> {
    ws.send(Message::Text(serde_json::to_string(msg)?)).await?;
    Ok(())
}

/// Read frames until one matches, with a deadline; returns the match.
async fn recv_until<F, T>(ws: &mut WsStream, mut pick: F) -> Option<T>
where
    F: FnMut(&ServerMsg) -> Option<T>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline {
        let frame = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
        if let Ok(Some(Ok(Message::Text(txt)))) = frame {
            if let Ok(msg) = serde_json::from_str::<ServerMsg>(&txt) {
                if let Some(out) = pick(&msg) {
                    return Some(out);
                }
            }
        }
    }
    None
}

fn sit(table_id: &str) -> ClientMsg {
    ClientMsg::Sit(SitRequest {
        table_id: table_id.to_string(),
    })
}

#[tokio::test]
async fn fresh_lobby_lists_four_empty_tables() -> Result<()> {
    let (port, server) = start_server().await?;
    let mut ws = connect(port, "census", "Census").await?;

    let lobby = recv_until(&mut ws, |m| match m {
        ServerMsg::LobbyState(l) => Some(l.clone()),
        _ => None,
    })
    .await
    .expect("lobby_state on connect");

    assert_eq!(lobby.len(), 4);
    for (i, table) in lobby.iter().enumerate() {
        assert_eq!(table.id, format!("table-{}", i + 1));
        assert_eq!(table.max_seats, 6);
        assert_eq!(table.seats_occupied, 0);
    }

    server.abort();
    Ok(())
}

#[tokio::test]
async fn seating_updates_the_lobby_census() -> Result<()> {
    let (port, server) = start_server().await?;
    let mut alice = connect(port, "tok-a", "Alice").await?;
    let mut bob = connect(port, "tok-b", "Bob").await?;

    send(&mut alice, &sit("table-2")).await?;

    // Bob, an unseated spectator, sees the census change.
    let lobby = recv_until(&mut bob, |m| match m {
        ServerMsg::LobbyState(l) if l[1].seats_occupied == 1 => Some(l.clone()),
        _ => None,
    })
    .await
    .expect("lobby update after sit");
    assert_eq!(lobby[1].id, "table-2");

    server.abort();
    Ok(())
}

#[tokio::test]
async fn hand_broadcast_preserves_hole_card_privacy() -> Result<()> {
    let (port, server) = start_server().await?;
    let mut alice = connect(port, "tok-a", "Alice").await?;
    let mut bob = connect(port, "tok-b", "Bob").await?;
    let mut spectator = connect(port, "tok-s", "Watcher").await?;

    // Seat deterministically: Alice takes seat 0 before Bob sits.
    send(&mut alice, &sit("table-1")).await?;
    recv_until(&mut alice, |m| match m {
        ServerMsg::TableState(t) if t.seats[0].token.as_deref() == Some("tok-a") => Some(()),
        _ => None,
    })
    .await
    .expect("alice seated");
    send(&mut bob, &sit("table-1")).await?;
    recv_until(&mut bob, |m| match m {
        ServerMsg::TableState(t) if t.seats[1].token.as_deref() == Some("tok-b") => Some(()),
        _ => None,
    })
    .await
    .expect("bob seated");

    send(&mut alice, &ClientMsg::StartHand).await?;

    // Everyone observes the same lifecycle ordering.
    recv_until(&mut spectator, |m| match m {
        ServerMsg::HandStarted(h) => Some(h.clone()),
        _ => None,
    })
    .await
    .expect("hand_started reaches spectators");

    // Alice sees exactly her own two cards.
    let alice_state = recv_until(&mut alice, |m| match m {
        ServerMsg::TableState(t) if t.hand_in_progress => Some(t.clone()),
        _ => None,
    })
    .await
    .expect("alice table_state");
    let hole = alice_state.hole_cards.expect("own cards visible");
    assert_eq!(hole.len(), 1);
    assert!(hole.contains_key(&0));

    // Bob sees only seat 1's entry.
    let bob_state = recv_until(&mut bob, |m| match m {
        ServerMsg::TableState(t) if t.hand_in_progress => Some(t.clone()),
        _ => None,
    })
    .await
    .expect("bob table_state");
    let hole = bob_state.hole_cards.expect("own cards visible");
    assert_eq!(hole.len(), 1);
    assert!(hole.contains_key(&1));

    // The spectator gets card counts but no cards.
    let spec_state = recv_until(&mut spectator, |m| match m {
        ServerMsg::TableState(t) if t.hand_in_progress => Some(t.clone()),
        _ => None,
    })
    .await
    .expect("spectator table_state");
    assert!(spec_state.hole_cards.is_none());
    assert_eq!(spec_state.seats[0].card_count, Some(2));
    assert_eq!(spec_state.seats[1].card_count, Some(2));
    assert!(spec_state.seats[2].card_count.is_none());

    // An action request names the heads-up dealer as first to act.
    let req = recv_until(&mut spectator, |m| match m {
        ServerMsg::ActionRequest(r) => Some(r.clone()),
        _ => None,
    })
    .await
    .expect("action_request broadcast");
    assert_eq!(req.seat_index, 0);
    assert_eq!(req.call_amount, 10);
    assert_eq!(req.current_bet, 20);

    server.abort();
    Ok(())
}

#[tokio::test]
async fn acting_out_of_turn_returns_a_directed_error() -> Result<()> {
    let (port, server) = start_server().await?;
    let mut alice = connect(port, "tok-a", "Alice").await?;
    let mut bob = connect(port, "tok-b", "Bob").await?;

    send(&mut alice, &sit("table-1")).await?;
    recv_until(&mut alice, |m| match m {
        ServerMsg::TableState(t) if t.seats[0].token.as_deref() == Some("tok-a") => Some(()),
        _ => None,
    })
    .await
    .expect("alice seated");
    send(&mut bob, &sit("table-1")).await?;
    recv_until(&mut bob, |m| match m {
        ServerMsg::TableState(t) if t.seats[1].token.as_deref() == Some("tok-b") => Some(()),
        _ => None,
    })
    .await
    .expect("bob seated");
    send(&mut alice, &ClientMsg::StartHand).await?;
    recv_until(&mut bob, |m| match m {
        ServerMsg::ActionRequest(_) => Some(()),
        _ => None,
    })
    .await
    .expect("hand running");

    // Heads-up it is Alice's (seat 0) turn; Bob acts anyway.
    send(
        &mut bob,
        &ClientMsg::PlayerAction(holdem_shared::PlayerActionMsg {
            action: holdem_shared::ActionType::Call,
            amount: None,
        }),
    )
    .await?;

    let err = recv_until(&mut bob, |m| match m {
        ServerMsg::Error(e) => Some(e.clone()),
        _ => None,
    })
    .await
    .expect("directed error");
    assert_eq!(err.code, "out_of_turn");

    server.abort();
    Ok(())
}

#[tokio::test]
async fn malformed_frames_get_bad_message_errors() -> Result<()> {
    let (port, server) = start_server().await?;
    let mut ws = connect(port, "tok-x", "X").await?;

    ws.send(Message::Text("{not json".to_string())).await?;
    let err = recv_until(&mut ws, |m| match m {
        ServerMsg::Error(e) => Some(e.clone()),
        _ => None,
    })
    .await
    .expect("bad_message error");
    assert_eq!(err.code, "bad_message");

    server.abort();
    Ok(())
}
