//! The hub: a single dispatch loop that owns the client registry and fans
//! broadcasts out to per-client bounded channels.
//!
//! Register/unregister and broadcasts arrive over one command channel, so the
//! registry needs no lock. The loop never blocks on a client: a full outbound
//! queue drops that client rather than stalling everyone else.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use holdem_shared::ServerMsg;

use super::session::SessionStore;
use super::view::{self, TableView};

pub type ConnId = u64;

/// One broadcast to the clients watching a table.
#[derive(Clone, Debug)]
pub enum TableBroadcast {
    /// Identical payload for every recipient; never carries hole cards.
    Uniform(ServerMsg),
    /// A full snapshot, projected per recipient.
    Snapshot(TableView),
}

enum HubCommand {
    Register {
        conn: ConnId,
        token: String,
        tx: mpsc::Sender<ServerMsg>,
    },
    Unregister {
        conn: ConnId,
    },
    Broadcast {
        table_id: String,
        message: TableBroadcast,
    },
    BroadcastAll {
        message: ServerMsg,
    },
}

#[derive(Clone)]
pub struct Hub {
    tx: mpsc::Sender<HubCommand>,
}

impl Hub {
    /// Start the dispatch loop. The hub reads sessions to resolve each
    /// recipient's seat; it never takes a table lock.
    pub fn spawn(sessions: Arc<SessionStore>, buffer: usize) -> Hub {
        let (tx, rx) = mpsc::channel(buffer);
        tokio::spawn(dispatch_loop(rx, sessions));
        Hub { tx }
    }

    pub async fn register(&self, conn: ConnId, token: String, tx: mpsc::Sender<ServerMsg>) {
        let _ = self
            .tx
            .send(HubCommand::Register { conn, token, tx })
            .await;
    }

    pub async fn unregister(&self, conn: ConnId) {
        let _ = self.tx.send(HubCommand::Unregister { conn }).await;
    }

    /// Fan a table event out to seated players and spectators of `table_id`.
    pub async fn broadcast(&self, table_id: &str, message: TableBroadcast) {
        let _ = self
            .tx
            .send(HubCommand::Broadcast {
                table_id: table_id.to_string(),
                message,
            })
            .await;
    }

    /// Send to every connected client (lobby updates).
    pub async fn broadcast_all(&self, message: ServerMsg) {
        let _ = self.tx.send(HubCommand::BroadcastAll { message }).await;
    }
}

struct ClientEntry {
    token: String,
    tx: mpsc::Sender<ServerMsg>,
}

async fn dispatch_loop(mut rx: mpsc::Receiver<HubCommand>, sessions: Arc<SessionStore>) {
    let mut clients: HashMap<ConnId, ClientEntry> = HashMap::new();

    while let Some(cmd) = rx.recv().await {
        match cmd {
            HubCommand::Register { conn, token, tx } => {
                tracing::info!(conn, "client registered");
                clients.insert(conn, ClientEntry { token, tx });
            }
            HubCommand::Unregister { conn } => {
                tracing::info!(conn, "client unregistered");
                clients.remove(&conn);
            }
            HubCommand::BroadcastAll { message } => {
                let dropped = send_filtered(&clients, |_| Some(message.clone())).await;
                evict(&mut clients, dropped);
            }
            HubCommand::Broadcast { table_id, message } => {
                // Resolve each recipient's relationship to the table first;
                // sessions change rarely and the lookup takes no table lock.
                let mut seats: HashMap<ConnId, Option<usize>> = HashMap::new();
                for (&conn, entry) in &clients {
                    match sessions.get(&entry.token).await {
                        // Seated at this table: project their own cards.
                        Some(s) if s.table_id.as_deref() == Some(table_id.as_str()) => {
                            seats.insert(conn, s.seat);
                        }
                        // No table: a lobby spectator, receives everything.
                        Some(s) if s.table_id.is_none() => {
                            seats.insert(conn, None);
                        }
                        // Seated elsewhere or unknown: not a recipient.
                        _ => {}
                    }
                }
                let dropped = send_filtered(&clients, |conn| {
                    let seat = seats.get(&conn)?;
                    Some(match &message {
                        TableBroadcast::Uniform(msg) => msg.clone(),
                        TableBroadcast::Snapshot(view_full) => {
                            ServerMsg::TableState(view::project(view_full, *seat))
                        }
                    })
                })
                .await;
                evict(&mut clients, dropped);
            }
        }
    }
}

/// Try-send a per-recipient message to every client; returns the connections
/// whose queues were full or closed.
async fn send_filtered<F>(clients: &HashMap<ConnId, ClientEntry>, make: F) -> Vec<ConnId>
where
    F: Fn(ConnId) -> Option<ServerMsg>,
{
    let mut dropped = Vec::new();
    for (&conn, entry) in clients {
        let Some(msg) = make(conn) else { continue };
        if let Err(err) = entry.tx.try_send(msg) {
            tracing::warn!(conn, %err, "dropping unresponsive client");
            dropped.push(conn);
        }
    }
    dropped
}

fn evict(clients: &mut HashMap<ConnId, ClientEntry>, dropped: Vec<ConnId>) {
    for conn in dropped {
        clients.remove(&conn);
    }
}
