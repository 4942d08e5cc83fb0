//! X25519 Diffie-Hellman Key Exchange
//!
//! Langzeit-Schluessel-Paare pro Benutzer. Das rohe DH-Ergebnis wird nie
//! direkt verwendet, sondern immer per HKDF-SHA256 zu einem gleichverteilten
//! 32-Byte-Schluessel gestreckt.

use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{KeyPair, PrivateKey, PublicKey, SecretKey, KEY_LEN};

/// HKDF-Info fuer das gemeinsame E2E-Geheimnis
const E2E_INFO: &[u8] = b"securechat-e2e-v1";

/// Generiert ein neues X25519-Schluessel-Paar aus dem OS-Zufallsgenerator
pub fn generate_key_pair() -> KeyPair {
    let secret = StaticSecret::random_from_rng(OsRng);
    let mut private_bytes = secret.to_bytes();
    let key_pair = KeyPair::from_private_key(PrivateKey::from_bytes(private_bytes));
    private_bytes.zeroize();

    tracing::debug!(
        fingerprint = %key_pair.public_key.fingerprint(),
        "Neues Schluessel-Paar generiert"
    );
    key_pair
}

/// Berechnet den oeffentlichen Schluessel zu einem privaten Schluessel
pub fn public_key_from_private(private_key: &[u8]) -> CryptoResult<PublicKey> {
    Ok(PrivateKey::from_slice(private_key)?.public_key())
}

/// Leitet das gemeinsame Geheimnis aus eigenem privaten und fremdem
/// oeffentlichen Schluessel ab
///
/// Symmetrisch: `derive_shared_secret(a_priv, b_pub) == derive_shared_secret(b_priv, a_pub)`.
pub fn derive_shared_secret(private_key: &[u8], peer_public_key: &[u8]) -> CryptoResult<SecretKey> {
    let private_key = PrivateKey::from_slice(private_key)?;
    let peer_public_key = PublicKey::from_slice(peer_public_key)?;
    shared_secret(&private_key, &peer_public_key)
}

/// Wie [`derive_shared_secret`], fuer bereits validierte Schluessel
pub(crate) fn shared_secret(
    private_key: &PrivateKey,
    peer_public_key: &PublicKey,
) -> CryptoResult<SecretKey> {
    let secret = StaticSecret::from(*private_key.as_bytes());
    let dh_output = secret.diffie_hellman(&X25519PublicKey::from(*peer_public_key.as_bytes()));

    // Punkte niedriger Ordnung erzwingen ein bekanntes Ergebnis
    if !dh_output.was_contributory() {
        return Err(CryptoError::UngueltigerSchluessel(
            "Oeffentlicher Schluessel hat niedrige Ordnung".to_string(),
        ));
    }

    hkdf_derive(dh_output.as_bytes(), None, E2E_INFO)
}

/// HKDF-SHA256 auf einen 32-Byte-Schluessel
///
/// Ohne Salt wird (wie in RFC 5869) ein Null-Salt verwendet.
pub fn hkdf_derive(ikm: &[u8], salt: Option<&[u8]>, info: &[u8]) -> CryptoResult<SecretKey> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    let key = SecretKey::from_bytes(okm);
    okm.zeroize();
    Ok(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
