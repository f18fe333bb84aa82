use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fsb_reskin::{run, PipelineConfig};

/// Reconstruit un fichier .resources Unity avec une nouvelle piste FSB5.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Nouveau fichier audio .ogg
    audio_file: PathBuf,
    /// BPM de la chanson
    #[arg(allow_negative_numbers = true)]
    bpm: f64,
    /// Fichier .resources à produire
    output_resource: PathBuf,
    /// Patch JSON compatible UABEA
    output_json: PathBuf,
    /// BPMInfo JSON compatible UABEA
    output_bpm: PathBuf,
    /// Dossier contenant les beatmaps
    beatmap_folder: PathBuf,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Chemin invalide : {:?}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    // 1. Créer la configuration à partir des arguments
    let config = PipelineConfig::new(
        absolute(&args.audio_file)?,
        args.bpm,
        absolute(&args.output_resource)?,
        absolute(&args.output_json)?,
        args.output_bpm,
        absolute(&args.beatmap_folder)?,
    );

    // 2. Appeler la bibliothèque
    let report = run(&config).context("La conversion a échoué")?;

    for warning in &report.warnings {
        eprintln!("⚠ {} : {}", warning.stage, warning.message);
    }
    println!(
        "Tous les fichiers ont été créés ! ({} beatmap(s) compressée(s), {} échec(s))",
        report.archive.succeeded(),
        report.archive.failed()
    );

    Ok(())
}
