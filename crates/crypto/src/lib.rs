//! # securechat-crypto
//!
//! E2E-Verschluesselung und Schluessel-Verwaltung fuer SecureChat.
//!
//! ## Module
//! - `e2e` - Schluessel-Austausch, AEAD, Direkt- und Raum-Nachrichten
//! - `password` - Passwort-basierte Schluessel-Ableitung (Argon2id)
//! - `storage` - Server-seitige Schluessel-Ablage unter einem Master-Schluessel
//! - `session` - Ephemere Session-Schluessel mit Cache
//! - `fingerprint` - Fingerprints oeffentlicher Schluessel
//! - `token` - Zufaellige URL-sichere Tokens
//! - `config` - Kosten-Parameter und Policy
//! - `types` - Gemeinsame Typen (KeyPair, SecretKey, EncryptedPayload, ...)
//! - `error` - Fehlertypen

pub mod config;
pub mod e2e;
pub mod error;
pub mod fingerprint;
pub mod password;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

// Bequeme Re-Exports
pub use config::{CryptoConfig, PasswortEinstellungen, SchluesselSpeicherEinstellungen};
pub use error::{CryptoError, CryptoResult};
pub use fingerprint::{fingerprint, verify_fingerprint};
pub use password::{derive_key_from_password, PasswordKeyDerivation};
pub use session::{SessionKeyManager, SharedSessionKeyManager};
pub use token::generate_secure_token;
pub use types::{EncryptedPayload, KeyPair, PrivateKey, PublicKey, SecretBytes, SecretKey};

pub use e2e::{
    decrypt_direct, decrypt_direct_bytes, decrypt_for_room, derive_shared_secret,
    distribute_room_key, encrypt_direct, encrypt_for_room, generate_key_pair, generate_room_key,
    public_key_from_private, unwrap_room_key, wrap_room_key_for_user, SecureMessageHandler,
};

pub use storage::{
    export_public_key_bundle, import_public_key_bundle, KeyStorageManager, MasterKey,
    PublicKeyBundle, RotatedRoomKey, StoredRoomKey, StoredUserKeys,
};
