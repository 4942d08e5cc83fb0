//! E2E Verschluesselung (End-to-End)
//!
//! Client <-> Client Verschluesselung. Der Server speichert und verteilt nur
//! undurchsichtige Ciphertexte und kann den Inhalt nicht lesen.
//!
//! ## Ablauf
//! 1. Jeder Benutzer hat ein langlebiges X25519-Schluessel-Paar
//! 2. Direktnachricht: ECDH + HKDF ergibt den Schluessel pro Paar,
//!    XChaCha20-Poly1305 verschluesselt
//! 3. Raum: ein symmetrischer Raum-Schluessel, pro Mitglied als
//!    Direktnachricht vom Admin eingewickelt
//! 4. Raum-Nachrichten werden direkt mit dem Raum-Schluessel verschluesselt

pub mod aead;
pub mod decrypt;
pub mod encrypt;
pub mod handler;
pub mod key_exchange;
pub mod room_key;

pub use decrypt::{decrypt_direct, decrypt_direct_bytes, decrypt_for_room};
pub use encrypt::{encrypt_direct, encrypt_for_room};
pub use handler::SecureMessageHandler;
pub use key_exchange::{derive_shared_secret, generate_key_pair, hkdf_derive, public_key_from_private};
pub use room_key::{distribute_room_key, generate_room_key, unwrap_room_key, wrap_room_key_for_user};
