//! Symmetrische AEAD-Verschluesselung (XChaCha20-Poly1305)
//!
//! Jeder Aufruf erzeugt eine frische, zufaellige 24-Byte-Nonce. Bei dieser
//! Nonce-Laenge sind Kollisionen unter demselben Schluessel vernachlaessigbar.
//!
//! ## Format
//! ```text
//! ciphertext = [verschluesselter Inhalt] [auth_tag(16)]
//! ```

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{SecretKey, NONCE_LEN};

fn cipher(key: &SecretKey) -> XChaCha20Poly1305 {
    XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
}

/// Verschluesselt und authentifiziert `plaintext`
///
/// Gibt `(ciphertext, nonce)` zurueck.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> CryptoResult<(Vec<u8>, [u8; NONCE_LEN])> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher(key)
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Prueft den Auth-Tag und entschluesselt
///
/// Liefert bei jedem Fehler `CryptoError::Authentifizierung`, nie Teil-Klartext.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &[u8]) -> CryptoResult<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::UngueltigeNonce {
            erwartet: NONCE_LEN,
            erhalten: nonce.len(),
        });
    }

    cipher(key)
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            tracing::debug!(laenge = ciphertext.len(), "AEAD Auth-Tag ungueltig");
            CryptoError::Authentifizierung
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TAG_LEN;

    #[test]
    fn roundtrip() {
        let key = SecretKey::random();
        let (ciphertext, nonce) = encrypt(&key, b"Hallo Welt").unwrap();

        assert_eq!(ciphertext.len(), b"Hallo Welt".len() + TAG_LEN);
        assert_eq!(decrypt(&key, &ciphertext, &nonce).unwrap(), b"Hallo Welt");
    }

    #[test]
    fn leerer_klartext() {
        let key = SecretKey::random();
        let (ciphertext, nonce) = encrypt(&key, b"").unwrap();
        assert_eq!(ciphertext.len(), TAG_LEN);
        assert!(decrypt(&key, &ciphertext, &nonce).unwrap().is_empty());
    }

    #[test]
    fn falscher_schluessel_schlaegt_fehl() {
        let (ciphertext, nonce) = encrypt(&SecretKey::random(), b"geheim").unwrap();
        let result = decrypt(&SecretKey::random(), &ciphertext, &nonce);
        assert!(matches!(result, Err(CryptoError::Authentifizierung)));
    }

    #[test]
    fn jedes_gekippte_bit_wird_erkannt() {
        let key = SecretKey::random();
        let (ciphertext, nonce) = encrypt(&key, b"Original").unwrap();

        for byte in 0..ciphertext.len() {
            for bit in 0..8 {
                let mut manipuliert = ciphertext.clone();
                manipuliert[byte] ^= 1 << bit;
                assert!(matches!(
                    decrypt(&key, &manipuliert, &nonce),
                    Err(CryptoError::Authentifizierung)
                ));
            }
        }

        for byte in 0..NONCE_LEN {
            for bit in 0..8 {
                let mut manipuliert = nonce;
                manipuliert[byte] ^= 1 << bit;
                assert!(matches!(
                    decrypt(&key, &ciphertext, &manipuliert),
                    Err(CryptoError::Authentifizierung)
                ));
            }
        }
    }

    #[test]
    fn nonces_sind_eindeutig() {
        let key = SecretKey::random();
        let mut gesehen = std::collections::HashSet::new();

        for _ in 0..1000 {
            let (_, nonce) = encrypt(&key, b"gleicher Text").unwrap();
            assert!(gesehen.insert(nonce), "Nonce doppelt vergeben");
        }
    }

    #[test]
    fn gleicher_klartext_ergibt_verschiedene_ciphertexte() {
        let key = SecretKey::random();
        let (c1, n1) = encrypt(&key, b"gleicher Text").unwrap();
        let (c2, n2) = encrypt(&key, b"gleicher Text").unwrap();
        assert_ne!(n1, n2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn falsche_nonce_laenge() {
        let key = SecretKey::random();
        let (ciphertext, _) = encrypt(&key, b"x").unwrap();
        let result = decrypt(&key, &ciphertext, &[0u8; 12]);
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigeNonce {
                erwartet: 24,
                erhalten: 12
            })
        ));
    }
}
