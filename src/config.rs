use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub audio_path: PathBuf,
    pub bpm: f64,
    pub resource_path: PathBuf,
    pub patch_path: PathBuf,
    pub beat_info_path: PathBuf,
    pub beatmap_folder: PathBuf,
    pub compiler: CompilerSettings,
    pub audio: AudioSettings,
    pub patch: PatchSettings,
    pub beatmaps: BeatmapSettings,
}

impl PipelineConfig {
    pub fn new(
        audio_path: PathBuf,
        bpm: f64,
        resource_path: PathBuf,
        patch_path: PathBuf,
        beat_info_path: PathBuf,
        beatmap_folder: PathBuf,
    ) -> Self {
        Self {
            audio_path,
            bpm,
            resource_path,
            patch_path,
            beat_info_path,
            beatmap_folder,
            compiler: CompilerSettings::default(),
            audio: AudioSettings::default(),
            patch: PatchSettings::default(),
            beatmaps: BeatmapSettings::default(),
        }
    }
}

/// Paramètres du compilateur de banque FSB (fsbankcl)
#[derive(Clone, Debug)]
pub struct CompilerSettings {
    pub program: String,
    pub format: String,
    pub platform: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            program: "fsbankcl".to_string(),
            format: "ogg".to_string(),
            platform: "windows".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AudioSettings {
    /// Fréquence attendue par le jeu ; une autre valeur déclenche seulement un avertissement
    pub expected_sample_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            expected_sample_rate: 44100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PatchSettings {
    pub target: String,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self {
            target: "AudioClip Base".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BeatmapSettings {
    pub extension: String,
    pub output_prefix: String,
    pub output_suffix: String,
    pub compression_level: u32,
}

impl Default for BeatmapSettings {
    fn default() -> Self {
        Self {
            extension: "dat".to_string(),
            output_prefix: "gz".to_string(),
            output_suffix: ".txt".to_string(),
            compression_level: 9,
        }
    }
}
