//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable (ueberschreibt die Konfigurationsdatei):
//! - `SC_LOG_LEVEL`: Log-Level oder Filter-Direktive, Standard: info
//! - `SC_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Ausgabe immer nach stderr.

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

/// Umgebungsvariable fuer den Log-Level
pub const ENV_LOG_LEVEL: &str = "SC_LOG_LEVEL";

/// Umgebungsvariable fuer das Log-Format
pub const ENV_LOG_FORMAT: &str = "SC_LOG_FORMAT";

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anders => Err(format!("Unbekanntes Log-Format: '{anders}'")),
        }
    }
}

/// Initialisiert das Logging-System.
///
/// Werte aus `SC_LOG_LEVEL` / `SC_LOG_FORMAT` haben Vorrang vor den
/// uebergebenen. Ungueltige Werte fallen auf `info` / `text` zurueck.
/// Schlaegt fehl, wenn bereits ein globaler Subscriber gesetzt ist.
pub fn logging_initialisieren(
    level: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = wert_aufloesen(level, std::env::var(ENV_LOG_LEVEL).ok());
    let format = wert_aufloesen(format, std::env::var(ENV_LOG_FORMAT).ok());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    match format.parse::<LogFormat>().unwrap_or_default() {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    }
}

/// Umgebungswert vor Konfigurationswert, leere Werte zaehlen nicht
fn wert_aufloesen(konfiguriert: &str, umgebung: Option<String>) -> String {
    umgebung
        .filter(|wert| !wert.trim().is_empty())
        .unwrap_or_else(|| konfiguriert.to_string())
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
