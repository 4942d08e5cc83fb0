//! Nachrichten-Entschluesselung
//!
//! Gegenstueck zu `encrypt`. Verifiziert immer den Auth-Tag, bei Fehlern
//! wird kein Klartext zurueckgegeben.

use crate::e2e::aead;
use crate::e2e::key_exchange::shared_secret;
use crate::error::CryptoResult;
use crate::types::{EncryptedPayload, PrivateKey, SecretKey};

/// Entschluesselt eine Direktnachricht mit dem eigenen privaten Schluessel
///
/// Das gemeinsame Geheimnis wird aus `payload.sender_public_key` neu abgeleitet.
pub fn decrypt_direct(
    payload: &EncryptedPayload,
    recipient_private_key: &[u8],
) -> CryptoResult<Vec<u8>> {
    let recipient = PrivateKey::from_slice(recipient_private_key)?;
    let key = shared_secret(&recipient, &payload.sender_public_key)?;
    aead::decrypt(&key, &payload.ciphertext, &payload.nonce)
}

/// Entschluesselt rohe Bytes im Speicherformat (ohne EncryptedPayload-Wrapper)
///
/// Nuetzlich wenn die Bytes direkt aus der Datenbank kommen.
pub fn decrypt_direct_bytes(data: &[u8], recipient_private_key: &[u8]) -> CryptoResult<Vec<u8>> {
    let payload = EncryptedPayload::from_bytes(data)?;
    decrypt_direct(&payload, recipient_private_key)
}

/// Entschluesselt eine Raum-Nachricht mit dem gemeinsamen Raum-Schluessel
pub fn decrypt_for_room(ciphertext: &[u8], nonce: &[u8], room_key: &[u8]) -> CryptoResult<Vec<u8>> {
    let key = SecretKey::from_slice(room_key)?;
    aead::decrypt(&key, ciphertext, nonce)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
