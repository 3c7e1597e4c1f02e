//! # Session Error Types
//!
//! Errors raised by the host layer around the engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Engine      │  │    Registry     │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  DraftNotFound  │  │  ConfigLoad / Save      │ │
//! │  │                 │  │                 │  │  TomlDe / TomlSer       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  I/O: Io, Json (payload files and stdin for the audit binary)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use uuid::Uuid;
use workshop_core::CoreError;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Engine Errors
    // =========================================================================
    /// An edit was rejected by the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Draft not found: {0}")]
    DraftNotFound(Uuid),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    #[error("Failed to save config: {0}")]
    ConfigSave(String),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
