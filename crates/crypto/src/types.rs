//! Gemeinsame Typen fuer das Kryptografie-Subsystem

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Laenge aller Schluessel in Bytes (X25519 und symmetrisch, 256 Bit)
pub const KEY_LEN: usize = 32;

/// Laenge der XChaCha20-Poly1305 Nonce in Bytes
pub const NONCE_LEN: usize = 24;

/// Laenge des Poly1305 Auth-Tags in Bytes
pub const TAG_LEN: usize = 16;

/// Symmetrischer 256-Bit-Schluessel (wird beim Drop genullt)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Erstellt einen Schluessel aus einem Slice, prueft die Laenge
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::UngueltigeSchluesselLaenge {
                    erwartet: KEY_LEN,
                    erhalten: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Erzeugt einen Schluessel aus dem Betriebssystem-Zufallsgenerator
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        let key = Self(bytes);
        bytes.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Base64-Darstellung (z.B. fuer den Transport eines Raum-Schluessels)
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED] {KEY_LEN} bytes)")
    }
}

/// Sicherer Container fuer Schluessel-Material variabler Laenge (wird beim Drop genullt)
///
/// Der Inhalt ist nur geliehen erreichbar, herausbewegen geht nicht:
///
/// ```compile_fail
/// let geheim = securechat_crypto::SecretBytes::new(vec![1, 2, 3]);
/// let roh: Vec<u8> = geheim.0;
/// ```
#[derive(Clone)]
pub struct SecretBytes(Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Privater X25519-Schluessel. Verlaesst nie den Besitzer.
#[derive(Clone)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(SecretKey::from_bytes(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        SecretKey::from_slice(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        self.0.as_bytes()
    }

    /// Berechnet den zugehoerigen oeffentlichen Schluessel
    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(*self.0.as_bytes());
        PublicKey::new(X25519PublicKey::from(&secret).to_bytes())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// Oeffentlicher X25519-Schluessel (frei teilbar, serialisiert als Base64)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey {
    #[serde(with = "base64_array_32")]
    bytes: [u8; KEY_LEN],
}

impl PublicKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::UngueltigeSchluesselLaenge {
                    erwartet: KEY_LEN,
                    erhalten: bytes.len(),
                })?;
        Ok(Self::new(array))
    }

    /// Liest einen Base64-kodierten oeffentlichen Schluessel (Speicherformat)
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            CryptoError::UngueltigerSchluessel(format!("Public Key ist kein Base64: {e}"))
        })?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }

    /// Menschenlesbarer Fingerprint fuer den Out-of-Band-Vergleich
    pub fn fingerprint(&self) -> String {
        crate::fingerprint::fingerprint(&self.bytes)
    }
}

/// Ein X25519-Schluessel-Paar. Der oeffentliche Schluessel ist immer aus dem
/// privaten berechnet.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

/// Verschluesselter Payload einer Nachricht (oder eines eingewickelten Raum-Schluessels)
///
/// Als Dictionary serialisiert mit Base64-Feldern
/// `{ciphertext, nonce, sender_public_key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Verschluesselter Inhalt inkl. 16 Bytes Auth-Tag (angehaengt)
    #[serde(with = "base64_vec")]
    pub ciphertext: Vec<u8>,
    /// 24 Bytes Nonce
    #[serde(with = "base64_array_24")]
    pub nonce: [u8; NONCE_LEN],
    /// Oeffentlicher Schluessel des Absenders
    pub sender_public_key: PublicKey,
}

impl EncryptedPayload {
    /// Mindestlaenge des Speicherformats (Nonce + Absender-Key)
    pub const HEADER_LEN: usize = NONCE_LEN + KEY_LEN;

    /// Serialisiert zu Bytes: [nonce(24)] + [sender_public_key(32)] + [ciphertext]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(self.sender_public_key.as_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Deserialisiert aus Bytes
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(CryptoError::UngueltigeDaten(format!(
                "Payload zu kurz: mindestens {} Bytes erwartet, {} erhalten",
                Self::HEADER_LEN,
                bytes.len()
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        let sender_public_key = PublicKey::from_slice(&bytes[NONCE_LEN..Self::HEADER_LEN])?;

        Ok(Self {
            ciphertext: bytes[Self::HEADER_LEN..].to_vec(),
            nonce,
            sender_public_key,
        })
    }

    /// Ein einzelner Base64-String fuer die Ablage in einem Datenbankfeld
    pub fn to_storage_string(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_storage_string(data: &str) -> CryptoResult<Self> {
        let bytes = STANDARD.decode(data.trim())?;
        Self::from_bytes(&bytes)
    }
}

/// Serde-Hilfe fuer Byte-Vektoren als Base64
mod base64_vec {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// Serde-Hilfe fuer 32-Byte-Arrays (Schluessel)
mod base64_array_32 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("ungueltige Laenge fuer 32-Byte-Schluessel"))
    }
}

/// Serde-Hilfe fuer 24-Byte-Arrays (XChaCha20-Nonce)
mod base64_array_24 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 24], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 24], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("ungueltige Laenge fuer 24-Byte-Nonce"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn beispiel_payload() -> EncryptedPayload {
        let private = PrivateKey::from_bytes([7u8; KEY_LEN]);
        EncryptedPayload {
            ciphertext: vec![1, 2, 3, 4, 5],
            nonce: [9u8; NONCE_LEN],
            sender_public_key: private.public_key(),
        }
    }

    #[test]
    fn speicherformat_hat_feste_praefixe() {
        let payload = beispiel_payload();
        let bytes = payload.to_bytes();

        assert_eq!(bytes.len(), NONCE_LEN + KEY_LEN + 5);
        assert_eq!(&bytes[..NONCE_LEN], &payload.nonce);
        assert_eq!(
            &bytes[NONCE_LEN..NONCE_LEN + KEY_LEN],
            payload.sender_public_key.as_bytes()
        );
        assert_eq!(&bytes[NONCE_LEN + KEY_LEN..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn storage_string_wiederherstellen() {
        let payload = beispiel_payload();
        let restored = EncryptedPayload::from_storage_string(&payload.to_storage_string()).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn zu_kurzer_payload_schlaegt_fehl() {
        let result = EncryptedPayload::from_bytes(&[0u8; 55]);
        assert!(matches!(result, Err(CryptoError::UngueltigeDaten(_))));
    }

    #[test]
    fn payload_als_dictionary_mit_base64_feldern() {
        let payload = beispiel_payload();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["ciphertext"], STANDARD.encode([1u8, 2, 3, 4, 5]));
        assert_eq!(json["nonce"], STANDARD.encode([9u8; NONCE_LEN]));
        assert_eq!(
            json["sender_public_key"],
            payload.sender_public_key.to_base64()
        );

        let decoded: EncryptedPayload = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn secret_bytes_nur_geliehen_und_redigiert() {
        let geheim = SecretBytes::new(vec![0x42; 5]);
        assert_eq!(geheim.as_bytes(), &[0x42; 5]);
        assert_eq!(geheim.len(), 5);
        assert!(!geheim.is_empty());

        let ausgabe = format!("{geheim:?}");
        assert!(ausgabe.contains("REDACTED"));
        assert!(!ausgabe.contains("66"));
    }

    #[test]
    fn public_key_aus_private_key_deterministisch() {
        let a = PrivateKey::from_bytes([42u8; KEY_LEN]);
        let b = PrivateKey::from_bytes([42u8; KEY_LEN]);
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn public_key_base64_falsche_laenge() {
        let kurz = STANDARD.encode([1u8; 16]);
        let result = PublicKey::from_base64(&kurz);
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigeSchluesselLaenge {
                erwartet: 32,
                erhalten: 16
            })
        ));
        assert!(PublicKey::from_base64("kein base64!").is_err());
    }

    #[test]
    fn secret_key_falsche_laenge() {
        let err = SecretKey::from_slice(&[0u8; 31]).unwrap_err();
        assert!(err.ist_ungueltiger_schluessel());
    }

    #[test]
    fn debug_verraet_keine_schluessel() {
        let key = SecretKey::from_bytes([0xAB; KEY_LEN]);
        let ausgabe = format!("{key:?} {:?}", PrivateKey::from_bytes([0xAB; KEY_LEN]));
        assert!(ausgabe.contains("REDACTED"));
        assert!(!ausgabe.contains("171"));
        assert!(!ausgabe.to_lowercase().contains("ab, ab"));
    }
}
