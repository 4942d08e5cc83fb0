//! Nachrichten-Verschluesselung
//!
//! - Direkt (paarweise): Schluessel per X25519 + HKDF, Payload traegt den
//!   oeffentlichen Schluessel des Absenders
//! - Raum: direkt mit dem vorab verteilten Raum-Schluessel

use crate::e2e::aead;
use crate::e2e::key_exchange::shared_secret;
use crate::error::CryptoResult;
use crate::types::{EncryptedPayload, PrivateKey, PublicKey, SecretKey, NONCE_LEN};

/// Verschluesselt eine Direktnachricht an einen Empfaenger
///
/// # Parameter
/// - `plaintext`: Klartext-Bytes
/// - `sender_private_key`: 32-Byte privater Schluessel des Absenders
/// - `recipient_public_key`: 32-Byte oeffentlicher Schluessel des Empfaengers
pub fn encrypt_direct(
    plaintext: &[u8],
    sender_private_key: &[u8],
    recipient_public_key: &[u8],
) -> CryptoResult<EncryptedPayload> {
    let sender = PrivateKey::from_slice(sender_private_key)?;
    let recipient = PublicKey::from_slice(recipient_public_key)?;

    let key = shared_secret(&sender, &recipient)?;
    let (ciphertext, nonce) = aead::encrypt(&key, plaintext)?;

    Ok(EncryptedPayload {
        ciphertext,
        nonce,
        sender_public_key: sender.public_key(),
    })
}

/// Verschluesselt eine Raum-Nachricht mit dem gemeinsamen Raum-Schluessel
///
/// Gibt `(ciphertext, nonce)` zurueck.
pub fn encrypt_for_room(
    plaintext: &[u8],
    room_key: &[u8],
) -> CryptoResult<(Vec<u8>, [u8; NONCE_LEN])> {
    let key = SecretKey::from_slice(room_key)?;
    aead::encrypt(&key, plaintext)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2e::key_exchange::generate_key_pair;
    use crate::error::CryptoError;
    use crate::types::TAG_LEN;

    #[test]
    fn payload_traegt_absender_key() {
        let alice = generate_key_pair();
        let bob = generate_key_pair();

        let payload =
            encrypt_direct(b"hallo", alice.private_key.as_bytes(), bob.public_key.as_bytes())
                .unwrap();

        assert_eq!(payload.sender_public_key, alice.public_key);
        assert_eq!(payload.ciphertext.len(), 5 + TAG_LEN);
    }

    #[test]
    fn gleicher_text_ergibt_verschiedene_payloads() {
        let alice = generate_key_pair();
        let bob = generate_key_pair();

        let p1 = encrypt_direct(b"hi", alice.private_key.as_bytes(), bob.public_key.as_bytes())
            .unwrap();
        let p2 = encrypt_direct(b"hi", alice.private_key.as_bytes(), bob.public_key.as_bytes())
            .unwrap();

        assert_ne!(p1.nonce, p2.nonce);
        assert_ne!(p1.ciphertext, p2.ciphertext);
    }

    #[test]
    fn ungueltiger_empfaenger_key() {
        let alice = generate_key_pair();
        let result = encrypt_direct(b"x", alice.private_key.as_bytes(), &[0u8; 10]);
        assert!(result.unwrap_err().ist_ungueltiger_schluessel());
    }

    #[test]
    fn raum_schluessel_falsche_laenge() {
        let result = encrypt_for_room(b"x", &[0u8; 16]);
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigeSchluesselLaenge { .. })
        ));
    }
}
