//! Text-Nachrichten fuer einen angemeldeten Benutzer
//!
//! Bindet den privaten Schluessel eines Benutzers und arbeitet auf
//! UTF-8-Text statt auf rohen Bytes.

use crate::e2e::decrypt::{decrypt_direct, decrypt_for_room};
use crate::e2e::encrypt::{encrypt_direct, encrypt_for_room};
use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedPayload, PrivateKey, PublicKey, SecretKey};

/// Verschluesselt und entschluesselt Nachrichten im Namen eines Benutzers
#[derive(Debug, Clone)]
pub struct SecureMessageHandler {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl SecureMessageHandler {
    pub fn new(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Verschluesselt eine Direktnachricht an einen Benutzer
    pub fn encrypt_direct_message(
        &self,
        plaintext: &str,
        recipient_public_key: &PublicKey,
    ) -> CryptoResult<EncryptedPayload> {
        encrypt_direct(
            plaintext.as_bytes(),
            self.private_key.as_bytes(),
            recipient_public_key.as_bytes(),
        )
    }

    pub fn decrypt_direct_message(&self, payload: &EncryptedPayload) -> CryptoResult<String> {
        let bytes = decrypt_direct(payload, self.private_key.as_bytes())?;
        into_text(bytes)
    }

    /// Verschluesselt eine Raum-Nachricht
    ///
    /// Der Payload traegt den eigenen oeffentlichen Schluessel als Absender.
    pub fn encrypt_room_message(
        &self,
        plaintext: &str,
        room_key: &SecretKey,
    ) -> CryptoResult<EncryptedPayload> {
        let (ciphertext, nonce) = encrypt_for_room(plaintext.as_bytes(), room_key.as_bytes())?;
        Ok(EncryptedPayload {
            ciphertext,
            nonce,
            sender_public_key: self.public_key,
        })
    }

    pub fn decrypt_room_message(
        &self,
        payload: &EncryptedPayload,
        room_key: &SecretKey,
    ) -> CryptoResult<String> {
        let bytes = decrypt_for_room(&payload.ciphertext, &payload.nonce, room_key.as_bytes())?;
        into_text(bytes)
    }
}

fn into_text(bytes: Vec<u8>) -> CryptoResult<String> {
    String::from_utf8(bytes)
        .map_err(|_| CryptoError::UngueltigeDaten("Klartext ist kein gueltiges UTF-8".to_string()))
}
