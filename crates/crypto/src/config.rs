//! Kryptografie-Richtlinien (KDF-Kosten, Rotationsintervall, Passwort-Regeln)
//!
//! Die Werte sind feste Policy-Konstanten. Ueberschreiben ist nur beim Laden
//! der Konfiguration moeglich, nie pro Aufruf.

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::types::KEY_LEN;

/// Untergrenze fuer PBKDF2-HMAC-SHA256 beim Master-Schluessel
pub const MIN_PBKDF2_ITERATIONEN: u32 = 480_000;

/// Standard-Rotationsintervall fuer Raum-Schluessel
pub const STANDARD_ROTATION_TAGE: i64 = 30;

/// Zulaessiger Bereich fuer das Rotationsintervall in Tagen
pub const ROTATION_TAGE_BEREICH: std::ops::RangeInclusive<i64> = 1..=3650;

/// Standard-Mindestlaenge fuer Passwoerter
pub const STANDARD_MIN_PASSWORT_LAENGE: usize = 12;

/// Unter diese Mindestlaenge darf die Konfiguration nicht gehen
const MIN_PASSWORT_LAENGE_UNTERGRENZE: usize = 8;

/// Vollstaendige Kryptografie-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Passwort-Ableitung (Argon2id) und Passwort-Regeln
    pub passwort: PasswortEinstellungen,
    /// Server-seitige Schluessel-Ablage
    pub schluessel_speicher: SchluesselSpeicherEinstellungen,
}

/// Argon2id-Parameter und Passwort-Regeln
///
/// Standard entspricht "moderate": 256 MiB Speicher, 3 Durchlaeufe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswortEinstellungen {
    /// Speicherkosten in KiB
    pub argon2_speicher_kib: u32,
    /// Anzahl Durchlaeufe
    pub argon2_iterationen: u32,
    /// Parallelitaet (Lanes)
    pub argon2_parallelitaet: u32,
    /// Mindestlaenge in Zeichen
    pub min_laenge: usize,
}

impl Default for PasswortEinstellungen {
    fn default() -> Self {
        Self {
            argon2_speicher_kib: 256 * 1024,
            argon2_iterationen: 3,
            argon2_parallelitaet: 1,
            min_laenge: STANDARD_MIN_PASSWORT_LAENGE,
        }
    }
}

impl PasswortEinstellungen {
    /// Baut die Argon2-Parameter (Ausgabe immer 32 Bytes)
    pub fn argon2_params(&self) -> CryptoResult<argon2::Params> {
        argon2::Params::new(
            self.argon2_speicher_kib,
            self.argon2_iterationen,
            self.argon2_parallelitaet,
            Some(KEY_LEN),
        )
        .map_err(|e| CryptoError::Konfiguration(format!("Argon2-Parameter ungueltig: {e}")))
    }
}

/// Einstellungen fuer den Key Storage Manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchluesselSpeicherEinstellungen {
    /// PBKDF2-Iterationen fuer die Ableitung des Master-Schluessels
    pub pbkdf2_iterationen: u32,
    /// Alter in Tagen, ab dem ein Schluessel rotiert werden soll
    pub rotation_tage: i64,
}

impl Default for SchluesselSpeicherEinstellungen {
    fn default() -> Self {
        Self {
            pbkdf2_iterationen: MIN_PBKDF2_ITERATIONEN,
            rotation_tage: STANDARD_ROTATION_TAGE,
        }
    }
}

impl SchluesselSpeicherEinstellungen {
    /// Prueft PBKDF2-Untergrenze und Rotationsbereich
    pub fn validieren(&self) -> CryptoResult<()> {
        if self.pbkdf2_iterationen < MIN_PBKDF2_ITERATIONEN {
            return Err(CryptoError::Konfiguration(format!(
                "pbkdf2_iterationen muss mindestens {MIN_PBKDF2_ITERATIONEN} sein, ist {}",
                self.pbkdf2_iterationen
            )));
        }
        self.rotation_intervall()?;
        Ok(())
    }

    /// Rotationsintervall als Zeitspanne
    ///
    /// Ausserhalb von [`ROTATION_TAGE_BEREICH`] gibt es einen
    /// Konfigurationsfehler statt eines Ueberlaufs in `chrono`.
    pub fn rotation_intervall(&self) -> CryptoResult<chrono::Duration> {
        if !ROTATION_TAGE_BEREICH.contains(&self.rotation_tage) {
            return Err(CryptoError::Konfiguration(format!(
                "rotation_tage muss zwischen {} und {} liegen, ist {}",
                ROTATION_TAGE_BEREICH.start(),
                ROTATION_TAGE_BEREICH.end(),
                self.rotation_tage
            )));
        }
        Ok(chrono::Duration::days(self.rotation_tage))
    }
}

impl CryptoConfig {
    /// Prueft alle Werte gegen die festen Untergrenzen
    pub fn validieren(&self) -> CryptoResult<()> {
        self.schluessel_speicher.validieren()?;

        if self.passwort.min_laenge < MIN_PASSWORT_LAENGE_UNTERGRENZE {
            return Err(CryptoError::Konfiguration(format!(
                "min_laenge muss mindestens {MIN_PASSWORT_LAENGE_UNTERGRENZE} sein, ist {}",
                self.passwort.min_laenge
            )));
        }

        self.passwort.argon2_params()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardwerte_sind_gueltig() {
        let config = CryptoConfig::default();
        config.validieren().unwrap();
        assert_eq!(config.schluessel_speicher.pbkdf2_iterationen, 480_000);
        assert_eq!(config.schluessel_speicher.rotation_tage, 30);
        assert_eq!(config.passwort.min_laenge, 12);
        assert_eq!(config.passwort.argon2_speicher_kib, 262_144);
    }

    #[test]
    fn zu_wenige_pbkdf2_iterationen_abgelehnt() {
        let mut config = CryptoConfig::default();
        config.schluessel_speicher.pbkdf2_iterationen = 100_000;
        assert!(matches!(
            config.validieren(),
            Err(CryptoError::Konfiguration(_))
        ));
    }

    #[test]
    fn rotation_ausserhalb_des_bereichs_abgelehnt() {
        let mut config = CryptoConfig::default();
        config.schluessel_speicher.rotation_tage = 0;
        assert!(config.validieren().is_err());
        config.schluessel_speicher.rotation_tage = 10_000;
        assert!(config.validieren().is_err());
    }

    #[test]
    fn rotationsintervall_ohne_ueberlauf() {
        for tage in [i64::MAX, i64::MIN, -1, 0, 3651] {
            let einstellungen = SchluesselSpeicherEinstellungen {
                rotation_tage: tage,
                ..Default::default()
            };
            assert!(
                matches!(
                    einstellungen.rotation_intervall(),
                    Err(CryptoError::Konfiguration(_))
                ),
                "rotation_tage = {tage} haette abgelehnt werden muessen"
            );
        }

        let grenze = SchluesselSpeicherEinstellungen {
            rotation_tage: 3650,
            ..Default::default()
        };
        assert_eq!(
            grenze.rotation_intervall().unwrap(),
            chrono::Duration::days(3650)
        );
    }

    #[test]
    fn zu_kurze_mindestlaenge_abgelehnt() {
        let mut config = CryptoConfig::default();
        config.passwort.min_laenge = 4;
        assert!(config.validieren().is_err());
    }

    #[test]
    fn ungueltige_argon2_parameter_abgelehnt() {
        let mut config = CryptoConfig::default();
        config.passwort.argon2_parallelitaet = 0;
        assert!(config.validieren().is_err());
    }

    #[test]
    fn teilweise_toml_fuellt_standardwerte() {
        let config: CryptoConfig = toml::from_str(
            r#"
            [schluessel_speicher]
            rotation_tage = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.schluessel_speicher.rotation_tage, 7);
        assert_eq!(config.schluessel_speicher.pbkdf2_iterationen, 480_000);
        assert_eq!(config.passwort.argon2_iterationen, 3);
        assert_eq!(
            config.schluessel_speicher.rotation_intervall().unwrap(),
            chrono::Duration::days(7)
        );
    }
}
