use crate::model::BeatRegion;

/// Calcule l'unique région couvrant toute la piste.
///
/// Le BPM est pris tel quel : zéro ou une valeur négative donne un `end_beat` nul ou négatif.
pub fn compute_region(sample_count: u64, sample_rate: u32, bpm: f64) -> BeatRegion {
    let duration = sample_count as f64 / sample_rate as f64;

    BeatRegion {
        start_sample_index: 0,
        // Une piste vide donne -1, comme le format d'origine
        end_sample_index: sample_count as i64 - 1,
        start_beat: 0.0,
        end_beat: duration * (bpm / 60.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_seconds_at_120_bpm() {
        let region = compute_region(441_000, 44100, 120.0);
        assert_eq!(region.start_sample_index, 0);
        assert_eq!(region.end_sample_index, 440_999);
        assert_eq!(region.start_beat, 0.0);
        assert_eq!(region.end_beat, 20.0);
    }

    #[test]
    fn end_beat_is_not_rounded() {
        let region = compute_region(100_000, 44100, 97.5);
        let duration = 100_000f64 / 44100f64;
        assert_eq!(region.end_beat, duration * (97.5 / 60.0));
        assert!(region.end_beat.fract() != 0.0);
    }

    #[test]
    fn degenerate_bpm_passes_through() {
        let duration = 441_000f64 / 44100f64;
        for bpm in [0.0, -60.0, -0.5] {
            let region = compute_region(441_000, 44100, bpm);
            assert_eq!(region.end_beat, duration * (bpm / 60.0));
            assert_eq!(region.start_sample_index, 0);
            assert_eq!(region.end_sample_index, 440_999);
        }
        assert_eq!(compute_region(441_000, 44100, -60.0).end_beat, -10.0);
    }

    #[test]
    fn empty_track() {
        let region = compute_region(0, 44100, 120.0);
        assert_eq!(region.end_sample_index, -1);
        assert_eq!(region.end_beat, 0.0);
    }
}
