//! Keytool-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass das Keytool ohne Konfigurationsdatei
//! lauffaehig ist. Das Master-Passwort steht nie in der Datei.

use serde::{Deserialize, Serialize};

use securechat_crypto::CryptoConfig;
use securechat_observability::{log_level_gueltig, LogFormat};

/// Vollstaendige Keytool-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeytoolConfig {
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// KDF-Kosten und Schluessel-Policy
    pub krypto: CryptoConfig,
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl KeytoolConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        config
            .krypto
            .validieren()
            .map_err(|e| anyhow::anyhow!("Konfiguration '{pfad}' ungueltig: {e}"))?;
        config
            .logging
            .validieren()
            .map_err(|e| anyhow::anyhow!("Konfiguration '{pfad}' ungueltig: {e}"))?;
        Ok(config)
    }

    /// Parst einen TOML-String (ohne Validierung)
    pub fn aus_toml(inhalt: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(inhalt)
    }
}

impl LoggingEinstellungen {
    /// Prueft Log-Level und Format
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.level) {
            anyhow::bail!("Unbekannter Log-Level: '{}'", self.level);
        }
        self.format
            .parse::<LogFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    }
}
