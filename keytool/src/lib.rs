//! securechat-keytool – Bibliotheks-Root
//!
//! Deklariert die Module des Keytools und stellt sie fuer Tests bereit.

pub mod commands;
pub mod config;

pub use commands::{ausfuehren, Befehl, Cli, Umgebung};
pub use config::KeytoolConfig;
