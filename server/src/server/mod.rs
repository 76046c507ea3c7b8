pub mod handlers;
pub mod hub;
pub mod run;
pub mod session;
pub mod state;
pub mod view;
pub mod ws;

pub use run::{build_router, run_server};
pub use state::AppState;
