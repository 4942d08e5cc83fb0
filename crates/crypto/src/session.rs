//! Ephemere Session-Schluessel (Forward Secrecy)
//!
//! Pro Session, Gegenstelle und Kontext wird aus dem langlebigen gemeinsamen
//! Geheimnis ein eigener Schluessel abgeleitet:
//!
//! ```text
//! base_key    = derive_shared_secret(private_key, peer_public_key)
//! salt        = "{session_id}:{context}"
//! session_key = HKDF-SHA256(ikm = base_key, salt, info = "securechat-session-key-v1")
//! ```
//!
//! Der Cache lebt nur im Speicher. `clear_session_keys` beim Session-Ende
//! aufrufen; beim Drop werden alle Schluessel ebenfalls genullt.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::e2e::key_exchange::{hkdf_derive, shared_secret};
use crate::error::CryptoResult;
use crate::types::{PrivateKey, PublicKey, SecretKey};

/// HKDF-Info fuer Session-Schluessel (verschieden von der E2E-Info)
const SESSION_INFO: &[u8] = b"securechat-session-key-v1";

/// Ein Manager hinter einem Single-Writer-Lock, fuer gemeinsame Nutzung
pub type SharedSessionKeyManager = Arc<Mutex<SessionKeyManager>>;

/// Cache-Schluessel: Gegenstelle und Kontext
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheEintrag {
    peer: PublicKey,
    context: String,
}

/// Verwaltet die Session-Schluessel einer logischen Session
pub struct SessionKeyManager {
    session_id: String,
    private_key: PrivateKey,
    /// (peer, context) -> abgeleiteter Schluessel
    session_keys: HashMap<CacheEintrag, SecretKey>,
}

impl SessionKeyManager {
    pub fn new(private_key: PrivateKey, session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            private_key,
            session_keys: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Leitet den Session-Schluessel fuer eine Gegenstelle ab und legt ihn im Cache ab
    ///
    /// `context` trennt verschiedene Verwendungen innerhalb derselben Session
    /// (leerer String fuer den Standardfall).
    pub fn derive_session_key(
        &mut self,
        peer_public_key: &[u8],
        context: &str,
    ) -> CryptoResult<SecretKey> {
        let peer = PublicKey::from_slice(peer_public_key)?;
        let base_key = shared_secret(&self.private_key, &peer)?;

        let salt = format!("{}:{}", self.session_id, context);
        let session_key = hkdf_derive(base_key.as_bytes(), Some(salt.as_bytes()), SESSION_INFO)?;

        self.session_keys.insert(
            CacheEintrag {
                peer,
                context: context.to_string(),
            },
            session_key.clone(),
        );

        tracing::debug!(
            session_id = %self.session_id,
            peer = %peer.fingerprint(),
            context,
            "Session-Schluessel abgeleitet"
        );
        Ok(session_key)
    }

    /// Gibt einen bereits abgeleiteten Schluessel zurueck
    pub fn get_cached_session_key(&self, peer_public_key: &[u8], context: &str) -> Option<&SecretKey> {
        let peer = PublicKey::from_slice(peer_public_key).ok()?;
        self.session_keys.get(&CacheEintrag {
            peer,
            context: context.to_string(),
        })
    }

    /// Verwirft alle Session-Schluessel (die Puffer werden dabei genullt)
    pub fn clear_session_keys(&mut self) {
        let anzahl = self.session_keys.len();
        self.session_keys.clear();
        tracing::debug!(session_id = %self.session_id, anzahl, "Session-Schluessel verworfen");
    }

    /// Anzahl gecachter Schluessel
    pub fn cached_keys(&self) -> usize {
        self.session_keys.len()
    }

    /// Verpackt den Manager fuer die Nutzung aus mehreren Threads
    pub fn into_shared(self) -> SharedSessionKeyManager {
        Arc::new(Mutex::new(self))
    }
}

impl std::fmt::Debug for SessionKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeyManager")
            .field("session_id", &self.session_id)
            .field("cached_keys", &self.session_keys.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
