//! Fehlertypen fuer das Kryptografie-Subsystem
//!
//! Jeder Fehler ist fail-closed: es wird nie ein teilweise entschluesselter
//! Klartext oder ein halb abgeleiteter Schluessel zurueckgegeben.

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Ungueltiger Schluessel: {0}")]
    UngueltigerSchluessel(String),

    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Nonce-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeNonce { erwartet: usize, erhalten: usize },

    /// Auth-Tag stimmt nicht (falscher Schluessel, manipulierte Daten oder falsche Nonce)
    #[error("Entschluesselung fehlgeschlagen: Auth-Tag ungueltig")]
    Authentifizierung,

    /// Gespeicherter Schluessel-Blob laesst sich mit dem Master-Schluessel nicht oeffnen
    #[error("Token ungueltig oder mit anderem Master-Schluessel erstellt")]
    UngueltigesToken,

    #[error("Passwort zu schwach: {0}")]
    SchwachesPasswort(String),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Key Derivation fehlgeschlagen: {0}")]
    KeyDerivation(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("Ungueltige Konfiguration: {0}")]
    Konfiguration(String),

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptoError {
    /// `true` fuer alle Varianten, die einen formal ungueltigen Schluessel melden
    pub fn ist_ungueltiger_schluessel(&self) -> bool {
        matches!(
            self,
            Self::UngueltigerSchluessel(_) | Self::UngueltigeSchluesselLaenge { .. }
        )
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
