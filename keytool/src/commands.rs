//! Kommandozeile und Befehls-Ausfuehrung
//!
//! Jeder Befehl liefert seine Ausgabe als String (JSON oder Text), `main`
//! schreibt sie nach stdout.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use zeroize::Zeroizing;

use securechat_crypto::{
    export_public_key_bundle, fingerprint, import_public_key_bundle, KeyStorageManager, PublicKey,
    StoredRoomKey,
};

use crate::config::KeytoolConfig;

/// Umgebungsvariable fuer das Master-Passwort
pub const ENV_MASTER_PASSWORT: &str = "SECURECHAT_MASTER_PASSWORD";

/// Umgebungsvariable fuer den Master-Salt (Base64)
pub const ENV_MASTER_SALT: &str = "SECURECHAT_MASTER_SALT";

#[derive(Debug, Parser)]
#[command(name = "securechat-keytool")]
#[command(version, about = "Schluessel-Ablage und Fingerprints fuer SecureChat")]
pub struct Cli {
    #[command(subcommand)]
    pub befehl: Befehl,

    /// Pfad zur Konfigurationsdatei
    #[arg(
        long,
        global = true,
        env = "SECURECHAT_CONFIG",
        default_value = "securechat.toml"
    )]
    pub config: String,
}

#[derive(Debug, Subcommand)]
pub enum Befehl {
    /// Erzeugt einen neuen Master-Salt (prueft dabei das Master-Passwort)
    MasterSalt,

    /// Erzeugt ein Schluessel-Paar fuer einen Benutzer
    UserKeys,

    /// Erzeugt einen neuen Raum-Schluessel
    RoomKey,

    /// Rotiert einen Raum-Schluessel
    RotateRoom {
        /// Bisheriger Datensatz als JSON
        #[arg(long)]
        record: String,
    },

    /// Prueft, ob ein Schluessel rotiert werden muss
    NeedsRotation {
        /// Erstellungszeitpunkt (RFC 3339)
        #[arg(long)]
        created_at: String,
    },

    /// Fingerprint eines oeffentlichen Schluessels
    Fingerprint {
        /// Oeffentlicher Schluessel (Base64)
        public_key: String,
    },

    /// Exportiert einen oeffentlichen Schluessel als Bundle
    ExportBundle {
        /// Oeffentlicher Schluessel (Base64)
        public_key: String,
    },

    /// Liest ein Bundle und zeigt Schluessel und Fingerprint
    ImportBundle {
        bundle: String,
    },
}

/// Geheimnisse aus der Prozess-Umgebung
#[derive(Default)]
pub struct Umgebung {
    pub master_passwort: Option<Zeroizing<String>>,
    pub master_salt: Option<String>,
}

impl Umgebung {
    pub fn lesen() -> Self {
        Self {
            master_passwort: std::env::var(ENV_MASTER_PASSWORT).ok().map(Zeroizing::new),
            master_salt: std::env::var(ENV_MASTER_SALT).ok(),
        }
    }

    fn passwort(&self) -> Result<&str> {
        self.master_passwort
            .as_deref()
            .map(String::as_str)
            .ok_or_else(|| anyhow!("{ENV_MASTER_PASSWORT} ist nicht gesetzt"))
    }

    fn salt(&self) -> Result<Vec<u8>> {
        let encoded = self.master_salt.as_deref().ok_or_else(|| {
            anyhow!("{ENV_MASTER_SALT} ist nicht gesetzt (mit `master-salt` erzeugen)")
        })?;
        STANDARD
            .decode(encoded.trim())
            .with_context(|| format!("{ENV_MASTER_SALT} ist kein gueltiges Base64"))
    }
}

impl std::fmt::Debug for Umgebung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Umgebung")
            .field("master_passwort", &self.master_passwort.as_ref().map(|_| "[REDACTED]"))
            .field("master_salt", &self.master_salt)
            .finish()
    }
}

/// Baut den Key Storage Manager aus Master-Passwort und gespeichertem Salt
fn manager(config: &KeytoolConfig, umgebung: &Umgebung) -> Result<KeyStorageManager> {
    let salt = umgebung.salt()?;
    KeyStorageManager::from_master_password(umgebung.passwort()?, Some(&salt), &config.krypto)
        .context("Master-Schluessel konnte nicht abgeleitet werden")
}

fn public_key_lesen(encoded: &str) -> Result<PublicKey> {
    PublicKey::from_base64(encoded).context("Ungueltiger oeffentlicher Schluessel")
}

/// Fuehrt einen Befehl aus und gibt die Ausgabe zurueck
pub fn ausfuehren(befehl: &Befehl, config: &KeytoolConfig, umgebung: &Umgebung) -> Result<String> {
    tracing::debug!(?befehl, "Befehl wird ausgefuehrt");

    let ausgabe = match befehl {
        Befehl::MasterSalt => {
            let manager = KeyStorageManager::from_master_password(
                umgebung.passwort()?,
                None,
                &config.krypto,
            )
            .context("Master-Schluessel konnte nicht abgeleitet werden")?;
            STANDARD.encode(manager.master_salt())
        }
        Befehl::UserKeys => {
            let stored = manager(config, umgebung)?.generate_user_keys()?;
            serde_json::to_string_pretty(&stored)?
        }
        Befehl::RoomKey => {
            let stored = manager(config, umgebung)?.generate_room_key()?;
            serde_json::to_string_pretty(&stored)?
        }
        Befehl::RotateRoom { record } => {
            let bisher: StoredRoomKey =
                serde_json::from_str(record).context("Datensatz ist kein gueltiges JSON")?;
            let rotiert = manager(config, umgebung)?.rotate_room_key(&bisher)?;
            serde_json::to_string_pretty(&rotiert)?
        }
        Befehl::NeedsRotation { created_at } => {
            let erstellt: DateTime<Utc> = DateTime::parse_from_rfc3339(created_at)
                .context("created_at ist kein RFC-3339-Zeitpunkt")?
                .with_timezone(&Utc);
            let rotieren = manager(config, umgebung)?.should_rotate_key(erstellt);
            json!({ "created_at": erstellt, "rotieren": rotieren }).to_string()
        }
        Befehl::Fingerprint { public_key } => {
            fingerprint(public_key_lesen(public_key)?.as_bytes())
        }
        Befehl::ExportBundle { public_key } => {
            export_public_key_bundle(&public_key_lesen(public_key)?)?
        }
        Befehl::ImportBundle { bundle } => {
            let public_key = import_public_key_bundle(bundle).context("Bundle ungueltig")?;
            json!({
                "public_key": public_key.to_base64(),
                "fingerprint": public_key.fingerprint(),
            })
            .to_string()
        }
    };

    Ok(ausgabe)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
