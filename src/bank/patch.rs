use std::path::Path;
use tracing::info;

use crate::config::PatchSettings;
use crate::error::PipelineError;
use crate::model::{write_pretty_json, PatchFields, ResourcePatch};

/// Mesure le fichier de ressource compilé et écrit le patch UABEA correspondant.
///
/// La taille est relue sur le disque au moment de l'émission.
pub fn emit(
    resource_path: &Path,
    duration_seconds: f64,
    output_path: &Path,
    settings: &PatchSettings,
) -> Result<ResourcePatch, PipelineError> {
    let size_bytes = std::fs::metadata(resource_path)
        .map_err(|e| PipelineError::io(resource_path, e))?
        .len();

    let patch = ResourcePatch {
        path: settings.target.clone(),
        fields: PatchFields {
            size_bytes,
            length_seconds: duration_seconds,
        },
    };
    write_pretty_json(output_path, &patch)?;

    info!(output = %output_path.display(), size_bytes, "📦 Patch UABEA exporté");
    Ok(patch)
}
