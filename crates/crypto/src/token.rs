//! Zufaellige, URL-sichere Tokens (z.B. Raum-Schluessel-IDs)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Erzeugt `len` Zufallsbytes und kodiert sie URL-sicher ohne Padding
pub fn generate_secure_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
