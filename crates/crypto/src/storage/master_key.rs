//! Server-seitiger Master-Schluessel
//!
//! Wird einmal aus dem Master-Passwort abgeleitet (PBKDF2-HMAC-SHA256,
//! mindestens 480 000 Iterationen, 16-Byte-Salt pro Manager-Instanz) und
//! verschluesselt Schluessel-Material fuer die Ablage.
//!
//! ## Token-Format
//! ```text
//! base64url( [version(1)=0x80] [erstellt_unix_sek(8, BE)] [nonce(12)] [ciphertext + tag(16)] )
//! ```
//! Version und Zeitstempel (die ersten 9 Bytes) sind als AAD mit-authentifiziert.

use std::num::NonZeroU32;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce as AesNonce};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::pbkdf2;
use zeroize::{Zeroize, Zeroizing};

use crate::config::{CryptoConfig, MIN_PBKDF2_ITERATIONEN};
use crate::error::{CryptoError, CryptoResult};
use crate::password::{passwort_pruefen, SALT_LEN};
use crate::types::{SecretBytes, SecretKey, KEY_LEN, TAG_LEN};

/// Versions-Byte am Anfang jedes Tokens
const TOKEN_VERSION: u8 = 0x80;

/// Version + Zeitstempel
const HEADER_LEN: usize = 1 + 8;

/// AES-GCM Nonce-Laenge
const GCM_NONCE_LEN: usize = 12;

/// Der Master-Schluessel einer Key-Storage-Instanz
///
/// Wird explizit erzeugt und weitergereicht, nie als globaler Zustand gehalten.
/// Tests koennen mit [`MasterKey::from_bytes`] deterministische Schluessel
/// einsetzen.
#[derive(Clone)]
pub struct MasterKey {
    key: SecretKey,
    salt: Vec<u8>,
}

impl MasterKey {
    /// Leitet den Master-Schluessel aus dem Master-Passwort ab
    ///
    /// Ohne `salt` wird ein frischer 16-Byte-Salt erzeugt, der ueber
    /// [`MasterKey::salt`] abgefragt und persistiert werden muss. Nur dann
    /// wird das Master-Passwort gegen die Passwort-Regeln geprueft.
    pub fn derive(
        master_password: &str,
        salt: Option<&[u8]>,
        config: &CryptoConfig,
    ) -> CryptoResult<Self> {
        let iterationen = config.schluessel_speicher.pbkdf2_iterationen;
        if iterationen < MIN_PBKDF2_ITERATIONEN {
            return Err(CryptoError::Konfiguration(format!(
                "PBKDF2 mit {iterationen} Iterationen unterhalb der Untergrenze {MIN_PBKDF2_ITERATIONEN}"
            )));
        }
        let iterationen = NonZeroU32::new(iterationen).ok_or_else(|| {
            CryptoError::Konfiguration("PBKDF2-Iterationen duerfen nicht 0 sein".to_string())
        })?;

        let salt = match salt {
            Some(salt) if salt.len() < SALT_LEN => {
                return Err(CryptoError::UngueltigeDaten(format!(
                    "Master-Salt zu kurz: mindestens {SALT_LEN} Bytes erwartet, {} erhalten",
                    salt.len()
                )));
            }
            Some(salt) => salt.to_vec(),
            None => {
                passwort_pruefen(master_password, config.passwort.min_laenge)?;
                let mut salt = vec![0u8; SALT_LEN];
                OsRng.fill_bytes(&mut salt);
                salt
            }
        };

        let mut okm = [0u8; KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterationen,
            &salt,
            master_password.as_bytes(),
            &mut okm,
        );
        let key = SecretKey::from_bytes(okm);
        okm.zeroize();

        tracing::debug!(iterationen = iterationen.get(), "Master-Schluessel abgeleitet");
        Ok(Self { key, salt })
    }

    /// Wie [`MasterKey::derive`], aber auf dem Blocking-Pool von tokio
    pub async fn derive_async(
        master_password: String,
        salt: Option<Vec<u8>>,
        config: CryptoConfig,
    ) -> CryptoResult<Self> {
        let master_password = Zeroizing::new(master_password);

        tokio::task::spawn_blocking(move || {
            Self::derive(&master_password, salt.as_deref(), &config)
        })
        .await
        .map_err(|e| CryptoError::KeyDerivation(format!("Blocking-Task abgebrochen: {e}")))?
    }

    /// Setzt einen fertigen Schluessel ein (Tests, Schluessel aus einem HSM, ...)
    pub fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: SecretKey::from_bytes(key),
            salt: Vec::new(),
        }
    }

    /// Salt, mit dem dieser Schluessel abgeleitet wurde (leer bei `from_bytes`)
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.key.as_bytes()))
    }

    /// Verschluesselt beliebiges Schluessel-Material zu einem Token
    pub fn seal(&self, plaintext: &[u8]) -> CryptoResult<String> {
        let erstellt = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);

        let mut header = [0u8; HEADER_LEN];
        header[0] = TOKEN_VERSION;
        header[1..].copy_from_slice(&erstellt.to_be_bytes());

        let mut nonce = [0u8; GCM_NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher()
            .encrypt(
                AesNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

        let mut token = Vec::with_capacity(HEADER_LEN + GCM_NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&header);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);
        Ok(URL_SAFE.encode(token))
    }

    /// Oeffnet ein Token
    ///
    /// Jeder Fehler (kein Base64, zu kurz, falsche Version, falscher
    /// Master-Schluessel, manipuliert) ergibt `CryptoError::UngueltigesToken`.
    pub fn open(&self, token: &str) -> CryptoResult<SecretBytes> {
        let data = URL_SAFE
            .decode(token.trim())
            .map_err(|_| CryptoError::UngueltigesToken)?;

        if data.len() < HEADER_LEN + GCM_NONCE_LEN + TAG_LEN || data[0] != TOKEN_VERSION {
            return Err(CryptoError::UngueltigesToken);
        }

        let (header, rest) = data.split_at(HEADER_LEN);
        let (nonce, ciphertext) = rest.split_at(GCM_NONCE_LEN);

        self.cipher()
            .decrypt(
                AesNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: header,
                },
            )
            .map(SecretBytes::new)
            .map_err(|_| CryptoError::UngueltigesToken)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
