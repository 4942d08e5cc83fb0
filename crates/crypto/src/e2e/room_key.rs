//! Raum-Schluessel
//!
//! Jeder Raum hat einen symmetrischen 256-Bit-Schluessel. Verteilt wird er pro
//! Mitglied eingewickelt: der Base64-Text des Schluessels wird als
//! Direktnachricht vom Admin an das Mitglied verschluesselt.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroize;

use crate::e2e::decrypt::decrypt_direct;
use crate::e2e::encrypt::encrypt_direct;
use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedPayload, PublicKey, SecretBytes, SecretKey};

/// Erzeugt einen neuen, zufaelligen Raum-Schluessel
pub fn generate_room_key() -> SecretKey {
    SecretKey::random()
}

/// Wickelt einen Raum-Schluessel fuer ein einzelnes Mitglied ein
///
/// Nur der Inhaber des zu `recipient_public_key` gehoerenden privaten
/// Schluessels kann ihn wieder auswickeln.
pub fn wrap_room_key_for_user(
    room_key: &[u8],
    recipient_public_key: &[u8],
    admin_private_key: &[u8],
) -> CryptoResult<EncryptedPayload> {
    let room_key = SecretKey::from_slice(room_key)?;
    let mut encoded = room_key.to_base64();
    let result = encrypt_direct(encoded.as_bytes(), admin_private_key, recipient_public_key);
    encoded.zeroize();
    result
}

/// Entschluesselt einen eingewickelten Raum-Schluessel mit dem eigenen
/// privaten Schluessel
pub fn unwrap_room_key(
    payload: &EncryptedPayload,
    recipient_private_key: &[u8],
) -> CryptoResult<SecretKey> {
    let encoded = SecretBytes::new(decrypt_direct(payload, recipient_private_key)?);

    let mut raw = STANDARD.decode(encoded.as_bytes()).map_err(|_| {
        CryptoError::UngueltigeDaten("Raum-Schluessel ist kein gueltiges Base64".to_string())
    })?;
    let key = SecretKey::from_slice(&raw);
    raw.zeroize();
    key
}

/// Verteilt einen Raum-Schluessel an eine Liste von Mitgliedern
///
/// Gibt eine Map user_id -> Speicher-String (`encrypted_room_key_for_user`) zurueck.
pub fn distribute_room_key(
    room_key: &SecretKey,
    admin_private_key: &[u8],
    recipients: &HashMap<String, PublicKey>,
) -> CryptoResult<HashMap<String, String>> {
    let mut result = HashMap::with_capacity(recipients.len());

    for (user_id, public_key) in recipients {
        let wrapped =
            wrap_room_key_for_user(room_key.as_bytes(), public_key.as_bytes(), admin_private_key)?;
        result.insert(user_id.clone(), wrapped.to_storage_string());
    }

    tracing::debug!(empfaenger = result.len(), "Raum-Schluessel verteilt");
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
