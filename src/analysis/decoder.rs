use std::fmt::Display;
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::config::AudioSettings;
use crate::error::PipelineError;
use crate::model::AudioSampleData;

/// Décode un fichier Ogg Vorbis et retourne le nombre d'échantillons par canal et la fréquence d'origine.
///
/// La fréquence n'est jamais convertie : si elle diffère de la valeur attendue par le jeu,
/// un avertissement est émis et le traitement continue.
pub fn decode(path: &Path, settings: &AudioSettings) -> Result<AudioSampleData, PipelineError> {
    let file = File::open(path).map_err(|e| decode_error(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    // Le découpage selon la position granule donne le même compte que libvorbisfile
    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };
    let mut format = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &MetadataOptions::default())
        .map_err(|e| decode_error(path, e))?
        .format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error(path, "aucune piste audio"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| decode_error(path, "fréquence d'échantillonnage absente"))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| decode_error(path, "nombre de canaux absent"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(path, e))?;

    // Tous les paquets sont décodés : un paquet corrompu échoue ici
    let mut sample_count = 0u64;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decode_error(path, e)),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder.decode(&packet).map_err(|e| decode_error(path, e))?;
        sample_count += decoded.frames() as u64;
    }

    let audio = AudioSampleData {
        sample_count,
        sample_rate,
        channels,
    };

    if audio.sample_rate != settings.expected_sample_rate {
        warn!(
            sample_rate = audio.sample_rate,
            expected = settings.expected_sample_rate,
            "!!! La fréquence d'échantillonnage de la piste n'est pas {} Hz !!!",
            settings.expected_sample_rate
        );
    }

    debug!(
        path = %path.display(),
        sample_count = audio.sample_count,
        sample_rate = audio.sample_rate,
        channels = audio.channels,
        duration = audio.duration_seconds(),
        "Audio décodé"
    );

    Ok(audio)
}

fn decode_error(path: &Path, reason: impl Display) -> PipelineError {
    PipelineError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
