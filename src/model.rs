use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

use crate::error::PipelineError;

/// Version du format BPMInfo attendue par le jeu
pub const BEAT_MAP_VERSION: &str = "2.0.0";

/// Données dérivées du décodage d'un fichier audio
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AudioSampleData {
    /// Nombre d'échantillons par canal
    pub sample_count: u64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioSampleData {
    pub fn duration_seconds(&self) -> f64 {
        self.sample_count as f64 / self.sample_rate as f64
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeatRegion {
    #[serde(rename = "_startSampleIndex")]
    pub start_sample_index: i64,
    #[serde(rename = "_endSampleIndex")]
    pub end_sample_index: i64,
    #[serde(rename = "_startBeat", serialize_with = "serialize_beat")]
    pub start_beat: f64,
    #[serde(rename = "_endBeat")]
    pub end_beat: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeatMapInfo {
    #[serde(rename = "_version")]
    pub version: String,
    #[serde(rename = "_songSampleCount")]
    pub song_sample_count: u64,
    #[serde(rename = "_songFrequency")]
    pub song_frequency: u32,
    #[serde(rename = "_regions")]
    pub regions: Vec<BeatRegion>,
}

impl BeatMapInfo {
    pub fn new(audio: &AudioSampleData, regions: Vec<BeatRegion>) -> Self {
        Self {
            version: BEAT_MAP_VERSION.to_string(),
            song_sample_count: audio.sample_count,
            song_frequency: audio.sample_rate,
            regions,
        }
    }
}

/// Patch UABEA : champs à réécrire sur l'AudioClip existant
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourcePatch {
    pub path: String,
    pub fields: PatchFields,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PatchFields {
    #[serde(rename = "m_Size")]
    pub size_bytes: u64,
    #[serde(rename = "m_Length")]
    pub length_seconds: f64,
}

// Un temps entier s'écrit `0` et non `0.0`, comme dans les fichiers du jeu
fn serialize_beat<S: Serializer>(beat: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if beat.fract() == 0.0 && beat.abs() < MAX_EXACT {
        serializer.serialize_i64(*beat as i64)
    } else {
        serializer.serialize_f64(*beat)
    }
}

/// Écrit `value` en JSON indenté sur quatre espaces
pub(crate) fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    std::fs::write(path, buffer).map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_info_matches_game_layout() {
        let audio = AudioSampleData {
            sample_count: 441_000,
            sample_rate: 44100,
            channels: 2,
        };
        let region = BeatRegion {
            start_sample_index: 0,
            end_sample_index: 440_999,
            start_beat: 0.0,
            end_beat: 20.0,
        };
        let json = serde_json::to_string(&BeatMapInfo::new(&audio, vec![region])).unwrap();
        assert_eq!(
            json,
            r#"{"_version":"2.0.0","_songSampleCount":441000,"_songFrequency":44100,"_regions":[{"_startSampleIndex":0,"_endSampleIndex":440999,"_startBeat":0,"_endBeat":20.0}]}"#
        );
    }

    #[test]
    fn resource_patch_uses_unity_field_names() {
        let patch = ResourcePatch {
            path: "AudioClip Base".to_string(),
            fields: PatchFields {
                size_bytes: 1234,
                length_seconds: 10.5,
            },
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(
            json,
            r#"{"path":"AudioClip Base","fields":{"m_Size":1234,"m_Length":10.5}}"#
        );
    }

    #[test]
    fn duration_reconstructs_sample_count() {
        for (count, rate) in [(441_000u64, 44100u32), (12_345, 48000), (1, 22050), (0, 44100)] {
            let audio = AudioSampleData {
                sample_count: count,
                sample_rate: rate,
                channels: 1,
            };
            let rebuilt = audio.duration_seconds() * rate as f64;
            assert!((rebuilt - count as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn pretty_json_is_four_space_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patch.json");
        let patch = ResourcePatch {
            path: "AudioClip Base".to_string(),
            fields: PatchFields {
                size_bytes: 1,
                length_seconds: 2.0,
            },
        };
        write_pretty_json(&path, &patch).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"path\": \"AudioClip Base\""));
        assert!(text.contains("\n        \"m_Size\": 1"));
    }
}
