//! SecureChat Keytool – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt den
//! gewaehlten Befehl aus. Ausgabe auf stdout, Logs auf stderr.

use anyhow::{anyhow, Result};
use clap::Parser;
use securechat_keytool::{ausfuehren, Cli, KeytoolConfig, Umgebung};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = KeytoolConfig::laden(&cli.config)?;

    securechat_observability::logging_initialisieren(
        &config.logging.level,
        &config.logging.format,
    )
    .map_err(|e| anyhow!("Logging konnte nicht initialisiert werden: {e}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "SecureChat Keytool gestartet"
    );

    let ausgabe = ausfuehren(&cli.befehl, &config, &Umgebung::lesen())?;
    println!("{ausgabe}");

    Ok(())
}
