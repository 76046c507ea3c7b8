//! Shared application state: the tables, the session store and the hub.

use std::sync::Arc;

use tokio::sync::RwLock;

use holdem_shared::LobbyTable;

use super::hub::Hub;
use super::session::SessionStore;
use crate::config::Config;
use crate::table::Table;

#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<Vec<Arc<RwLock<Table>>>>,
    pub sessions: Arc<SessionStore>,
    pub hub: Hub,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the lobby and start the hub. Must run inside a tokio runtime.
    pub fn new(config: Config) -> Self {
        let tables: Vec<Arc<RwLock<Table>>> = (1..=config.tables)
            .map(|i| {
                Arc::new(RwLock::new(Table::new(
                    format!("table-{}", i),
                    format!("Table {}", i),
                    config.small_blind,
                    config.big_blind,
                    config.buy_in,
                )))
            })
            .collect();
        let sessions = Arc::new(SessionStore::new());
        let hub = Hub::spawn(Arc::clone(&sessions), config.channel_buffer);
        AppState {
            tables: Arc::new(tables),
            sessions,
            hub,
            config: Arc::new(config),
        }
    }

    /// Look a table up by id. The lobby is small and fixed.
    pub async fn table(&self, id: &str) -> Option<Arc<RwLock<Table>>> {
        for table in self.tables.iter() {
            if table.read().await.id == id {
                return Some(Arc::clone(table));
            }
        }
        None
    }

    pub async fn lobby_state(&self) -> Vec<LobbyTable> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for table in self.tables.iter() {
            tables.push(table.read().await.lobby_info());
        }
        tables
    }
}
