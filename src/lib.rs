pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod utils;
pub mod version;

/// Re-export commonly used items
pub use app::App;
pub use error::{Error, Result};
pub use logging::{create_logger, Level, Logger, RequestContext};
pub use version::VERSION;
