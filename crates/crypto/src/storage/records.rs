//! Datensaetze des Key Storage Managers
//!
//! Der Klartext-Schluessel wird nie gespeichert, nur das Token des
//! Master-Schluessels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::PublicKey;

/// Aktuelle Version neu erzeugter Schluessel
pub const KEY_VERSION: u32 = 1;

/// Algorithmus-Kennung in Public-Key-Bundles
pub const BUNDLE_ALGORITHMUS: &str = "X25519";

/// Format-Version der Public-Key-Bundles
pub const BUNDLE_VERSION: u32 = 1;

/// Schluessel eines Benutzers, wie sie abgelegt werden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUserKeys {
    pub encrypted_private_key: String,
    /// Base64 im serialisierten Zustand
    pub public_key: PublicKey,
    pub key_version: u32,
    pub created_at: DateTime<Utc>,
}

/// Schluessel eines Raums
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRoomKey {
    pub encrypted_room_key: String,
    pub key_id: String,
    pub key_version: u32,
    pub created_at: DateTime<Utc>,
}

/// Ergebnis einer Rotation: neuer Raum-Schluessel plus der vorherige Blob
///
/// Die alte Generation bleibt fuer den Uebergang erhalten, damit bestehende
/// Nachrichten noch lesbar sind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatedRoomKey {
    #[serde(flatten)]
    pub room_key: StoredRoomKey,
    pub previous_key_encrypted: String,
}

/// Selbstbeschreibender Container fuer den Austausch eines oeffentlichen Schluessels
///
/// Nicht signiert: die Echtheit wird ueber den Fingerprint-Vergleich geprueft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyBundle {
    pub public_key: PublicKey,
    pub algorithm: String,
    pub version: u32,
    pub exported_at: DateTime<Utc>,
}
