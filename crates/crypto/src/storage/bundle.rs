//! Public-Key-Bundles fuer den Austausch ausserhalb des Chats
//!
//! Format: URL-sicheres Base64 eines JSON-Objekts
//! `{public_key, algorithm: "X25519", version, exported_at}`.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::Utc;

use crate::error::{CryptoError, CryptoResult};
use crate::storage::records::{PublicKeyBundle, BUNDLE_ALGORITHMUS, BUNDLE_VERSION};
use crate::types::PublicKey;

/// Exportiert einen oeffentlichen Schluessel als Bundle-String
pub fn export_public_key_bundle(public_key: &PublicKey) -> CryptoResult<String> {
    let bundle = PublicKeyBundle {
        public_key: *public_key,
        algorithm: BUNDLE_ALGORITHMUS.to_string(),
        version: BUNDLE_VERSION,
        exported_at: Utc::now(),
    };
    Ok(URL_SAFE.encode(serde_json::to_vec(&bundle)?))
}

/// Liest ein Bundle und gibt den enthaltenen oeffentlichen Schluessel zurueck
///
/// Unbekannte Algorithmen, Versionen und Schluessel falscher Laenge werden
/// abgelehnt.
pub fn import_public_key_bundle(bundle: &str) -> CryptoResult<PublicKey> {
    let json = URL_SAFE.decode(bundle.trim())?;
    let bundle = parse_bundle(&json)?;

    if bundle.algorithm != BUNDLE_ALGORITHMUS {
        return Err(CryptoError::UngueltigeDaten(format!(
            "Unbekannter Algorithmus im Bundle: {}",
            bundle.algorithm
        )));
    }
    if bundle.version != BUNDLE_VERSION {
        return Err(CryptoError::UngueltigeDaten(format!(
            "Nicht unterstuetzte Bundle-Version: {}",
            bundle.version
        )));
    }

    tracing::debug!(
        fingerprint = %bundle.public_key.fingerprint(),
        exportiert = %bundle.exported_at,
        "Public-Key-Bundle importiert"
    );
    Ok(bundle.public_key)
}

/// Ein Schluessel falscher Laenge scheitert schon beim Deserialisieren; das
/// wird als ungueltiger Schluessel gemeldet, nicht als JSON-Fehler.
fn parse_bundle(json: &[u8]) -> CryptoResult<PublicKeyBundle> {
    let value: serde_json::Value = serde_json::from_slice(json)?;

    if let Some(encoded) = value.get("public_key").and_then(|v| v.as_str()) {
        PublicKey::from_base64(encoded)?;
    }
    Ok(serde_json::from_value(value)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
