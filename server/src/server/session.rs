//! Session store: token to display name, table and seat.
//!
//! Token issuance happens elsewhere; any token presented on connect gets an
//! entry here. The store has its own lock, always taken after (never before)
//! a table lock.

use std::collections::HashMap;

use tokio::sync::RwLock;

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub name: String,
    pub table_id: Option<String>,
    pub seat: Option<usize>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session on first sight of the token; keep an existing one.
    pub async fn ensure(&self, token: &str, name: &str) {
        let mut inner = self.inner.write().await;
        inner.entry(token.to_string()).or_insert_with(|| Session {
            name: name.to_string(),
            table_id: None,
            seat: None,
        });
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.inner.read().await.get(token).cloned()
    }

    pub async fn set_seat(&self, token: &str, table_id: &str, seat: usize) {
        let mut inner = self.inner.write().await;
        if let Some(session) = inner.get_mut(token) {
            session.table_id = Some(table_id.to_string());
            session.seat = Some(seat);
        }
    }

    pub async fn clear_seat(&self, token: &str) {
        let mut inner = self.inner.write().await;
        if let Some(session) = inner.get_mut(token) {
            session.table_id = None;
            session.seat = None;
        }
    }
}
