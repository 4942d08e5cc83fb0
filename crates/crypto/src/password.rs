//! Passwort-basierte Schluessel-Ableitung mit Argon2id
//!
//! Leitet aus einem Passwort und einem Salt einen 32-Byte-Schluessel ab.
//! Gleiches Passwort + gleicher Salt ergibt immer denselben Schluessel, damit
//! ein Benutzer seinen Schluessel aus dem gemerkten Passwort und dem
//! gespeicherten Salt wiederherstellen kann.
//!
//! Die Ableitung ist absichtlich teuer (Standard: 256 MiB, 3 Durchlaeufe) und
//! sollte ausserhalb latenzkritischer Pfade laufen, siehe
//! [`PasswordKeyDerivation::derive_key_from_password_async`].

use argon2::{Algorithm, Argon2, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::config::PasswortEinstellungen;
use crate::e2e::aead;
use crate::error::{CryptoError, CryptoResult};
use crate::types::{PrivateKey, SecretKey, KEY_LEN, NONCE_LEN, TAG_LEN};

/// Laenge eines generierten Salts (und Mindestlaenge fremder Salts)
pub const SALT_LEN: usize = 16;

/// Laenge eines versiegelten privaten Schluessels: salt + nonce + ciphertext + tag
const VERSIEGELT_LEN: usize = SALT_LEN + NONCE_LEN + KEY_LEN + TAG_LEN;

/// Prueft ein Passwort gegen die Mindestanforderungen
///
/// - mindestens `min_laenge` Zeichen
/// - nicht nur Ziffern
/// - nicht nur ein einziges wiederholtes Zeichen
pub fn passwort_pruefen(passwort: &str, min_laenge: usize) -> CryptoResult<()> {
    let laenge = passwort.chars().count();
    if laenge < min_laenge {
        return Err(CryptoError::SchwachesPasswort(format!(
            "mindestens {min_laenge} Zeichen erforderlich, {laenge} erhalten"
        )));
    }

    if passwort.chars().all(|c| c.is_ascii_digit()) {
        return Err(CryptoError::SchwachesPasswort(
            "Passwort besteht nur aus Ziffern".to_string(),
        ));
    }

    let mut zeichen = passwort.chars();
    if let Some(erstes) = zeichen.next() {
        if zeichen.all(|c| c == erstes) {
            return Err(CryptoError::SchwachesPasswort(
                "Passwort besteht aus einem einzigen wiederholten Zeichen".to_string(),
            ));
        }
    }

    Ok(())
}

/// Argon2id-Ableitung mit festen Kosten-Parametern
#[derive(Debug, Clone, Default)]
pub struct PasswordKeyDerivation {
    einstellungen: PasswortEinstellungen,
}

impl PasswordKeyDerivation {
    pub fn new(einstellungen: PasswortEinstellungen) -> Self {
        Self { einstellungen }
    }

    pub fn einstellungen(&self) -> &PasswortEinstellungen {
        &self.einstellungen
    }

    fn argon2(&self) -> CryptoResult<Argon2<'static>> {
        let params = self.einstellungen.argon2_params()?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Leitet einen Schluessel aus einem Passwort ab
    ///
    /// Ohne `salt` wird ein frischer 16-Byte-Salt erzeugt. Gibt den Schluessel
    /// und den verwendeten Salt zurueck; der Salt muss gespeichert werden.
    ///
    /// Die Passwort-Regeln gelten nur ohne `salt`, also beim Anlegen eines
    /// neuen Schluessels. Mit gespeichertem Salt wird immer abgeleitet.
    pub fn derive_key_from_password(
        &self,
        password: &str,
        salt: Option<&[u8]>,
    ) -> CryptoResult<(SecretKey, Vec<u8>)> {
        let salt = match salt {
            Some(salt) if salt.len() < SALT_LEN => {
                return Err(CryptoError::UngueltigeDaten(format!(
                    "Salt zu kurz: mindestens {SALT_LEN} Bytes erwartet, {} erhalten",
                    salt.len()
                )));
            }
            Some(salt) => salt.to_vec(),
            None => {
                passwort_pruefen(password, self.einstellungen.min_laenge)?;
                let mut salt = vec![0u8; SALT_LEN];
                OsRng.fill_bytes(&mut salt);
                salt
            }
        };

        let mut okm = [0u8; KEY_LEN];
        self.argon2()?
            .hash_password_into(password.as_bytes(), &salt, &mut okm)
            .map_err(|e| CryptoError::KeyDerivation(format!("Argon2id: {e}")))?;

        let key = SecretKey::from_bytes(okm);
        okm.zeroize();
        Ok((key, salt))
    }

    /// Wie [`Self::derive_key_from_password`], aber auf dem Blocking-Pool von tokio
    pub async fn derive_key_from_password_async(
        &self,
        password: String,
        salt: Option<Vec<u8>>,
    ) -> CryptoResult<(SecretKey, Vec<u8>)> {
        let kdf = self.clone();
        let password = Zeroizing::new(password);

        tokio::task::spawn_blocking(move || kdf.derive_key_from_password(&password, salt.as_deref()))
            .await
            .map_err(|e| CryptoError::KeyDerivation(format!("Blocking-Task abgebrochen: {e}")))?
    }

    /// Versiegelt einen privaten Schluessel mit einem Passwort
    ///
    /// Format (Base64): `[salt(16)] [nonce(24)] [ciphertext(32) + tag(16)]`
    pub fn seal_private_key(&self, private_key: &PrivateKey, password: &str) -> CryptoResult<String> {
        let (key, salt) = self.derive_key_from_password(password, None)?;
        let (ciphertext, nonce) = aead::encrypt(&key, private_key.as_bytes())?;

        let mut out = Vec::with_capacity(VERSIEGELT_LEN);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out))
    }

    /// Oeffnet einen mit [`Self::seal_private_key`] versiegelten Schluessel
    ///
    /// Falsches Passwort ergibt `CryptoError::Authentifizierung`.
    pub fn open_private_key(&self, sealed: &str, password: &str) -> CryptoResult<PrivateKey> {
        let data = STANDARD.decode(sealed.trim())?;
        if data.len() != VERSIEGELT_LEN {
            return Err(CryptoError::UngueltigeDaten(format!(
                "Versiegelter Schluessel: {VERSIEGELT_LEN} Bytes erwartet, {} erhalten",
                data.len()
            )));
        }

        let (salt, rest) = data.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let (key, _) = self.derive_key_from_password(password, Some(salt))?;
        let raw = Zeroizing::new(aead::decrypt(&key, ciphertext, nonce).map_err(|e| {
            tracing::warn!("Privater Schluessel konnte nicht entsiegelt werden");
            e
        })?);
        PrivateKey::from_slice(&raw)
    }
}

/// Ableitung mit den Standard-Parametern
pub fn derive_key_from_password(
    password: &str,
    salt: Option<&[u8]>,
) -> CryptoResult<(SecretKey, Vec<u8>)> {
    PasswordKeyDerivation::default().derive_key_from_password(password, salt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
