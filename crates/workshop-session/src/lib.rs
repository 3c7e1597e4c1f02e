//! # workshop-session: Host Layer for the Billing Engine
//!
//! Wraps [`workshop_core`] for a console process: loads the engine
//! configuration, sets up logging, and keeps the drafts that are open.
//!
//! ## Module Organization
//! ```text
//! workshop_session/
//! ├── lib.rs      ◄─── You are here (tracing setup, exports)
//! ├── audit.rs    ◄─── Stored-record recompute and stale-total check
//! ├── config.rs   ◄─── engine.toml + environment overrides
//! ├── state.rs    ◄─── DraftRegistry (open drafts)
//! ├── error.rs    ◄─── SessionError
//! └── main.rs     ◄─── workshop-recompute audit binary
//! ```
//!
//! ## Startup Sequence
//! ```rust,ignore
//! workshop_session::init_tracing();
//! let config = EngineConfig::load_or_default(None);
//! let registry = DraftRegistry::new(config.policy());
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::{EngineConfig, TaxSettings};
pub use error::{SessionError, SessionResult};
pub use state::DraftRegistry;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=workshop=trace` - Show trace for workshop crates only
/// - Default: INFO, DEBUG for workshop crates
///
/// Calling it again after a subscriber is installed has no effect.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,workshop=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
