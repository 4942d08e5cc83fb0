//! # securechat-observability
//!
//! Structured Logging (Text oder JSON) via tracing-subscriber fuer alle
//! SecureChat-Binaries. Logs gehen nach stderr, damit stdout fuer
//! Kommando-Ausgaben frei bleibt.

pub mod logging;

pub use logging::{log_level_gueltig, logging_initialisieren, LogFormat};
