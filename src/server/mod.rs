pub mod server;
pub mod context;
pub mod routes;
pub mod state;

pub use server::{build_app, start_server};
pub use state::ServerState;
