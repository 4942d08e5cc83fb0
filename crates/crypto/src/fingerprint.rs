//! Fingerprints oeffentlicher Schluessel
//!
//! SHA-256 ueber die 32 rohen Bytes, Hex in Grossbuchstaben, die ersten
//! 32 Zeichen in Vierergruppen:
//!
//! ```text
//! 3F2A 9C01 B7D4 0E66 12AA 5B9F C3D2 7E80
//! ```

use sha2::{Digest, Sha256};

/// Anzahl Hex-Zeichen im Fingerprint
const FINGERPRINT_ZEICHEN: usize = 32;

/// Groesse einer Gruppe
const GRUPPE: usize = 4;

/// Berechnet den Fingerprint eines oeffentlichen Schluessels
pub fn fingerprint(public_key: &[u8]) -> String {
    let hash = hex::encode_upper(Sha256::digest(public_key));

    hash.as_bytes()[..FINGERPRINT_ZEICHEN]
        .chunks(GRUPPE)
        .map(|gruppe| String::from_utf8_lossy(gruppe).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Vergleicht einen vorgelegten Fingerprint mit dem berechneten
///
/// Gross-/Kleinschreibung und Leerzeichen werden ignoriert.
pub fn verify_fingerprint(public_key: &[u8], claimed: &str) -> bool {
    let normalisiert: String = claimed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let erwartet: String = fingerprint(public_key).replace(' ', "");
    normalisiert == erwartet
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_acht_gruppen_zu_vier() {
        let fp = fingerprint(&[1u8; 32]);
        let gruppen: Vec<&str> = fp.split(' ').collect();

        assert_eq!(gruppen.len(), 8);
        assert!(gruppen.iter().all(|g| g.len() == 4));
        assert!(fp
            .chars()
            .all(|c| c == ' ' || c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn entspricht_sha256_praefix() {
        let key = [7u8; 32];
        let hash = hex::encode_upper(Sha256::digest(key));
        assert_eq!(fingerprint(&key).replace(' ', ""), hash[..32]);
    }

    #[test]
    fn bekannter_wert() {
        // SHA-256 ueber 32 Null-Bytes
        assert_eq!(
            fingerprint(&[0u8; 32]),
            "6668 7AAD F862 BD77 6C8F C18B 8E9F 8E20"
        );
    }

    #[test]
    fn stabil_und_eindeutig() {
        assert_eq!(fingerprint(&[3u8; 32]), fingerprint(&[3u8; 32]));
        assert_ne!(fingerprint(&[3u8; 32]), fingerprint(&[4u8; 32]));
    }

    #[test]
    fn verifikation_ignoriert_format() {
        let key = [9u8; 32];
        let fp = fingerprint(&key);

        assert!(verify_fingerprint(&key, &fp));
        assert!(verify_fingerprint(&key, &fp.to_lowercase()));
        assert!(verify_fingerprint(&key, &fp.replace(' ', "")));
        assert!(!verify_fingerprint(&[8u8; 32], &fp));
        assert!(!verify_fingerprint(&key, ""));
    }
}
