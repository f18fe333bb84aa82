//! Enchaînement des étapes de conversion.
//!
//! Chaque étape porte sa propre gravité : une étape `Fatal` qui échoue arrête le
//! traitement, une étape `Recoverable` est consignée dans le rapport et la suite continue.

use std::fmt;
use tracing::{error, info, warn};

use crate::analysis::{decoder, region};
use crate::bank::{patch, BankCompiler, CompileOutput, CompileRequest};
use crate::beatmap::{self, ArchiveReport};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::model::{write_pretty_json, AudioSampleData, BeatMapInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DecodeAudio,
    CompileBank,
    EmitPatch,
    ExportBeatInfo,
    ArchiveBeatmaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

impl Stage {
    /// Ordre d'exécution
    pub const ORDER: [Stage; 5] = [
        Stage::DecodeAudio,
        Stage::CompileBank,
        Stage::EmitPatch,
        Stage::ExportBeatInfo,
        Stage::ArchiveBeatmaps,
    ];

    pub fn severity(self) -> Severity {
        match self {
            Stage::ExportBeatInfo => Severity::Recoverable,
            Stage::DecodeAudio | Stage::CompileBank | Stage::EmitPatch | Stage::ArchiveBeatmaps => {
                Severity::Fatal
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::DecodeAudio => "décodage audio",
            Stage::CompileBank => "compilation FSB",
            Stage::EmitPatch => "patch UABEA",
            Stage::ExportBeatInfo => "export BPMInfo",
            Stage::ArchiveBeatmaps => "compression des beatmaps",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Échec d'une étape récupérable
#[derive(Debug, Clone)]
pub struct StageWarning {
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug)]
pub struct RunReport {
    pub audio: AudioSampleData,
    /// Sorties du compilateur, également écrites dans les logs
    pub compiler_output: CompileOutput,
    pub archive: ArchiveReport,
    pub warnings: Vec<StageWarning>,
}

#[derive(Default)]
struct RunState {
    audio: Option<AudioSampleData>,
    compiler_output: Option<CompileOutput>,
    archive: Option<ArchiveReport>,
    warnings: Vec<StageWarning>,
}

impl RunState {
    fn audio(&self, stage: Stage) -> Result<&AudioSampleData, PipelineError> {
        self.audio
            .as_ref()
            .ok_or(PipelineError::MissingStageInput(stage))
    }
}

pub struct Pipeline<C> {
    config: PipelineConfig,
    compiler: C,
}

impl<C: BankCompiler> Pipeline<C> {
    pub fn new(config: PipelineConfig, compiler: C) -> Self {
        Self { config, compiler }
    }

    /// Exécute toutes les étapes dans l'ordre de `Stage::ORDER`
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let mut state = RunState::default();

        for stage in Stage::ORDER {
            let Err(err) = self.execute(stage, &mut state) else {
                continue;
            };
            match stage.severity() {
                Severity::Fatal => {
                    error!(%stage, error = %err, "Étape fatale en échec, arrêt");
                    return Err(PipelineError::Stage {
                        stage,
                        source: Box::new(err),
                    });
                }
                Severity::Recoverable => {
                    warn!(%stage, error = %err, "Une erreur inattendue est survenue, on continue");
                    state.warnings.push(StageWarning {
                        stage,
                        message: err.to_string(),
                    });
                }
            }
        }

        let audio = state
            .audio
            .ok_or(PipelineError::MissingStageInput(Stage::DecodeAudio))?;
        let compiler_output = state
            .compiler_output
            .ok_or(PipelineError::MissingStageInput(Stage::CompileBank))?;
        let archive = state
            .archive
            .ok_or(PipelineError::MissingStageInput(Stage::ArchiveBeatmaps))?;
        Ok(RunReport {
            audio,
            compiler_output,
            archive,
            warnings: state.warnings,
        })
    }

    fn execute(&self, stage: Stage, state: &mut RunState) -> Result<(), PipelineError> {
        let config = &self.config;
        match stage {
            Stage::DecodeAudio => {
                state.audio = Some(decoder::decode(&config.audio_path, &config.audio)?);
            }
            Stage::CompileBank => {
                let output = self.compiler.compile(&CompileRequest {
                    source: &config.audio_path,
                    destination: &config.resource_path,
                    format: &config.compiler.format,
                    platform: &config.compiler.platform,
                })?;
                state.compiler_output = Some(output);
            }
            Stage::EmitPatch => {
                let audio = state.audio(stage)?;
                patch::emit(
                    &config.resource_path,
                    audio.duration_seconds(),
                    &config.patch_path,
                    &config.patch,
                )?;
            }
            Stage::ExportBeatInfo => {
                let audio = state.audio(stage)?;
                let region = region::compute_region(audio.sample_count, audio.sample_rate, config.bpm);
                write_pretty_json(&config.beat_info_path, &BeatMapInfo::new(audio, vec![region]))?;
                info!(output = %config.beat_info_path.display(), "📦 BPMInfo exporté");
            }
            Stage::ArchiveBeatmaps => {
                state.archive = Some(beatmap::archive(&config.beatmap_folder, &config.beatmaps)?);
            }
        }
        Ok(())
    }
}
