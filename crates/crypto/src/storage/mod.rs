//! Server-seitige Schluessel-Ablage
//!
//! Alles hier arbeitet nur mit Schluessel-Material, nie mit Nachrichten.

pub mod bundle;
pub mod key_manager;
pub mod master_key;
pub mod records;

pub use bundle::{export_public_key_bundle, import_public_key_bundle};
pub use key_manager::KeyStorageManager;
pub use master_key::MasterKey;
pub use records::{
    PublicKeyBundle, RotatedRoomKey, StoredRoomKey, StoredUserKeys, BUNDLE_ALGORITHMUS,
    BUNDLE_VERSION, KEY_VERSION,
};
