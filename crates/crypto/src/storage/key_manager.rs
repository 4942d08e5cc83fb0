//! Key Storage Manager
//!
//! Verschluesselt Schluessel-Material fuer die Ablage beim Server, getrennt
//! von den E2E-Schluesseln:
//! - Benutzer-Schluessel erzeugen und wiederherstellen
//! - Raum-Schluessel erzeugen, wiederherstellen und rotieren
//! - Rotations-Policy (Alter des Schluessels)
//! - Public-Key-Bundles exportieren und importieren
//!
//! Alle Methoden sind rein bezogen auf den injizierten [`MasterKey`] und
//! koennen parallel aufgerufen werden.

use chrono::{DateTime, Duration, Utc};

use crate::config::{CryptoConfig, SchluesselSpeicherEinstellungen};
use crate::e2e::key_exchange::generate_key_pair;
use crate::e2e::room_key;
use crate::error::{CryptoError, CryptoResult};
use crate::storage::bundle;
use crate::storage::master_key::MasterKey;
use crate::storage::records::{RotatedRoomKey, StoredRoomKey, StoredUserKeys, KEY_VERSION};
use crate::token::generate_secure_token;
use crate::types::{KeyPair, PrivateKey, PublicKey, SecretBytes, SecretKey};

/// Laenge der zufaelligen Raum-Schluessel-ID in Bytes
const KEY_ID_LEN: usize = 16;

/// Verwaltet die Ablage von Schluesseln unter einem Master-Schluessel
#[derive(Debug, Clone)]
pub struct KeyStorageManager {
    master_key: MasterKey,
    rotation_intervall: Duration,
}

impl KeyStorageManager {
    /// Setzt einen fertigen Master-Schluessel ein
    ///
    /// Die Einstellungen werden geprueft, ungueltige Werte ergeben
    /// `CryptoError::Konfiguration`.
    pub fn new(
        master_key: MasterKey,
        einstellungen: &SchluesselSpeicherEinstellungen,
    ) -> CryptoResult<Self> {
        einstellungen.validieren()?;
        Ok(Self {
            master_key,
            rotation_intervall: einstellungen.rotation_intervall()?,
        })
    }

    /// Prueft die Konfiguration und leitet den Master-Schluessel ab
    pub fn from_master_password(
        master_password: &str,
        salt: Option<&[u8]>,
        config: &CryptoConfig,
    ) -> CryptoResult<Self> {
        config.validieren()?;
        let master_key = MasterKey::derive(master_password, salt, config)?;
        Self::new(master_key, &config.schluessel_speicher)
    }

    /// Salt des Master-Schluessels (muss persistiert werden)
    pub fn master_salt(&self) -> &[u8] {
        self.master_key.salt()
    }

    /// Verschluesselt Schluessel-Material fuer die Ablage
    pub fn encrypt_key(&self, raw_key: &[u8]) -> CryptoResult<String> {
        self.master_key.seal(raw_key)
    }

    /// Entschluesselt abgelegtes Schluessel-Material
    pub fn decrypt_key(&self, encrypted: &str) -> CryptoResult<SecretBytes> {
        self.master_key.open(encrypted).map_err(|e| {
            tracing::warn!("Abgelegter Schluessel konnte nicht geoeffnet werden");
            e
        })
    }

    /// Erzeugt ein neues Schluessel-Paar fuer einen Benutzer
    pub fn generate_user_keys(&self) -> CryptoResult<StoredUserKeys> {
        let pair = generate_key_pair();
        let encrypted_private_key = self.encrypt_key(pair.private_key.as_bytes())?;

        Ok(StoredUserKeys {
            encrypted_private_key,
            public_key: pair.public_key,
            key_version: KEY_VERSION,
            created_at: Utc::now(),
        })
    }

    /// Stellt das Schluessel-Paar eines Benutzers wieder her
    ///
    /// Der abgelegte oeffentliche Schluessel muss zum privaten passen.
    pub fn get_user_keys(
        &self,
        encrypted_private_key: &str,
        public_key_b64: &str,
    ) -> CryptoResult<KeyPair> {
        let raw = self.decrypt_key(encrypted_private_key)?;
        let pair = KeyPair::from_private_key(PrivateKey::from_slice(raw.as_bytes())?);

        let gespeichert = PublicKey::from_base64(public_key_b64)?;
        if gespeichert != pair.public_key {
            return Err(CryptoError::UngueltigerSchluessel(
                "Oeffentlicher Schluessel passt nicht zum privaten Schluessel".to_string(),
            ));
        }
        Ok(pair)
    }

    /// Erzeugt einen neuen Raum-Schluessel
    pub fn generate_room_key(&self) -> CryptoResult<StoredRoomKey> {
        let key = room_key::generate_room_key();
        let stored = StoredRoomKey {
            encrypted_room_key: self.encrypt_key(key.as_bytes())?,
            key_id: generate_secure_token(KEY_ID_LEN),
            key_version: KEY_VERSION,
            created_at: Utc::now(),
        };

        tracing::debug!(key_id = %stored.key_id, "Raum-Schluessel erzeugt");
        Ok(stored)
    }

    /// Entschluesselt einen abgelegten Raum-Schluessel
    pub fn get_room_key(&self, encrypted_room_key: &str) -> CryptoResult<SecretKey> {
        let raw = self.decrypt_key(encrypted_room_key)?;
        SecretKey::from_slice(raw.as_bytes())
    }

    /// `true`, wenn der Schluessel aelter als das Rotationsintervall ist
    pub fn should_rotate_key(&self, created_at: DateTime<Utc>) -> bool {
        self.should_rotate_key_at(created_at, Utc::now())
    }

    /// Wie [`Self::should_rotate_key`], mit explizitem Zeitpunkt
    pub fn should_rotate_key_at(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at > self.rotation_intervall
    }

    /// Rotiert einen Raum-Schluessel
    ///
    /// Der alte Blob bleibt eine Generation lang als `previous_key_encrypted`
    /// erhalten. Bestehende Nachrichten werden nicht neu verschluesselt.
    /// Ein Blob, den dieser Manager nicht oeffnen kann, wird nicht rotiert.
    pub fn rotate_room_key(&self, previous: &StoredRoomKey) -> CryptoResult<RotatedRoomKey> {
        self.get_room_key(&previous.encrypted_room_key)?;

        let mut room_key = self.generate_room_key()?;
        room_key.key_version = previous.key_version.saturating_add(1);

        tracing::info!(
            alte_key_id = %previous.key_id,
            neue_key_id = %room_key.key_id,
            key_version = room_key.key_version,
            "Raum-Schluessel rotiert"
        );

        Ok(RotatedRoomKey {
            room_key,
            previous_key_encrypted: previous.encrypted_room_key.clone(),
        })
    }

    pub fn export_public_key_bundle(&self, public_key: &PublicKey) -> CryptoResult<String> {
        bundle::export_public_key_bundle(public_key)
    }

    pub fn import_public_key_bundle(&self, bundle: &str) -> CryptoResult<PublicKey> {
        bundle::import_public_key_bundle(bundle)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
