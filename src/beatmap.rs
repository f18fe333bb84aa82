use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::BeatmapSettings;
use crate::error::PipelineError;

/// Résultat de la compression d'un fichier de beatmap
#[derive(Debug)]
pub enum FileOutcome {
    Compressed { source: PathBuf, destination: PathBuf },
    Failed { source: PathBuf, error: std::io::Error },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }
}

#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ArchiveReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Compresse chaque fichier `.dat` du dossier (non récursif) vers `gz<nom>.txt`.
///
/// Seul un dossier invalide est une erreur ; l'échec d'un fichier est consigné
/// dans le rapport et n'interrompt jamais les suivants.
pub fn archive(folder: &Path, settings: &BeatmapSettings) -> Result<ArchiveReport, PipelineError> {
    if !folder.is_dir() {
        return Err(PipelineError::NotADirectory(folder.to_path_buf()));
    }

    let mut candidates: Vec<std::io::Result<PathBuf>> = std::fs::read_dir(folder)
        .map_err(|e| PipelineError::io(folder, e))?
        .filter_map(|entry| match entry {
            Ok(entry) => is_beatmap(&entry.file_name(), settings).then(|| Ok(entry.path())),
            Err(e) => Some(Err(e)),
        })
        .collect();
    candidates.sort_by_key(|candidate| candidate.as_ref().ok().cloned());

    let outcomes = candidates
        .into_iter()
        .map(|candidate| match candidate {
            Ok(source) => compress_file(&source, settings),
            Err(error) => {
                warn!(folder = %folder.display(), %error, "Entrée de dossier illisible");
                FileOutcome::Failed {
                    source: folder.to_path_buf(),
                    error,
                }
            }
        })
        .collect();

    let report = ArchiveReport { outcomes };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Compression des beatmaps terminée"
    );
    Ok(report)
}

/// Chemin de sortie : même dossier, `<préfixe><nom d'origine><suffixe>`
pub fn destination_for(source: &Path, settings: &BeatmapSettings) -> PathBuf {
    let mut name = OsString::from(&settings.output_prefix);
    name.push(source.file_name().unwrap_or_default());
    name.push(&settings.output_suffix);
    source.with_file_name(name)
}

fn is_beatmap(name: &OsStr, settings: &BeatmapSettings) -> bool {
    name.to_string_lossy()
        .ends_with(&format!(".{}", settings.extension))
}

fn compress_file(source: &Path, settings: &BeatmapSettings) -> FileOutcome {
    let destination = destination_for(source, settings);
    match write_compressed(source, &destination, settings.compression_level) {
        Ok(()) => {
            info!(
                source = %source.display(),
                destination = %destination.display(),
                "Compression réussie"
            );
            FileOutcome::Compressed {
                source: source.to_path_buf(),
                destination,
            }
        }
        Err(error) => {
            warn!(source = %source.display(), %error, "Erreur lors du traitement du fichier");
            FileOutcome::Failed {
                source: source.to_path_buf(),
                error,
            }
        }
    }
}

fn write_compressed(source: &Path, destination: &Path, level: u32) -> std::io::Result<()> {
    let content = std::fs::read(source)?;
    let mut encoder = GzEncoder::new(File::create(destination)?, Compression::new(level));
    let written = encoder
        .write_all(&content)
        .and_then(|()| encoder.finish().map(drop));
    if written.is_err() {
        // Pas d'archive tronquée laissée à côté de la source
        let _ = std::fs::remove_file(destination);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(path: &Path) -> Vec<u8> {
        let mut decoder = GzDecoder::new(File::open(path).unwrap());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn destination_name_is_derived() {
        let settings = BeatmapSettings::default();
        assert_eq!(
            destination_for(Path::new("/maps/ExpertPlus.dat"), &settings),
            PathBuf::from("/maps/gzExpertPlus.dat.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_kept_byte_for_byte() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join(OsStr::from_bytes(b"caf\xe9.dat"));
        let destination = destination_for(&source, &BeatmapSettings::default());
        assert_eq!(
            destination.file_name().unwrap().to_os_string().into_vec(),
            b"gzcaf\xe9.dat.txt".to_vec()
        );

        std::fs::write(&source, b"accent").unwrap();
        let report = archive(dir.path(), &BeatmapSettings::default()).unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(gunzip(&destination), b"accent");
    }

    #[test]
    fn only_matching_files_are_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BeatmapSettings::default();
        std::fs::write(dir.path().join("Easy.dat"), b"{\"_notes\":[]}").unwrap();
        std::fs::write(dir.path().join("Hard.dat"), vec![42u8; 2048]).unwrap();
        std::fs::write(dir.path().join("Expert.dat"), b"").unwrap();
        std::fs::write(dir.path().join("cover.png"), b"png").unwrap();
        std::fs::write(dir.path().join("notes.dat.bak"), b"bak").unwrap();

        let report = archive(dir.path(), &settings).unwrap();
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 0);

        assert_eq!(gunzip(&dir.path().join("gzEasy.dat.txt")), b"{\"_notes\":[]}");
        assert_eq!(gunzip(&dir.path().join("gzHard.dat.txt")), vec![42u8; 2048]);
        assert!(gunzip(&dir.path().join("gzExpert.dat.txt")).is_empty());
        assert!(!dir.path().join("gzcover.png.txt").exists());
        assert!(!dir.path().join("gznotes.dat.bak.txt").exists());
    }

    #[test]
    fn one_failure_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BeatmapSettings::default();
        for name in ["A.dat", "B.dat", "C.dat"] {
            std::fs::write(dir.path().join(name), name.as_bytes()).unwrap();
        }
        // La destination de B est un dossier : la création du fichier échoue
        std::fs::create_dir(dir.path().join("gzB.dat.txt")).unwrap();

        let report = archive(dir.path(), &settings).unwrap();
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(gunzip(&dir.path().join("gzA.dat.txt")), b"A.dat");
        assert_eq!(gunzip(&dir.path().join("gzC.dat.txt")), b"C.dat");

        let failed: Vec<_> = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { source, .. } => Some(source.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec![dir.path().join("B.dat")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Full.dat"), vec![3u8; 4096]).unwrap();
        std::fs::write(dir.path().join("Fine.dat"), b"ok").unwrap();
        // Toute écriture vers /dev/full échoue avec ENOSPC après l'ouverture
        let destination = dir.path().join("gzFull.dat.txt");
        std::os::unix::fs::symlink("/dev/full", &destination).unwrap();

        let report = archive(dir.path(), &BeatmapSettings::default()).unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(std::fs::symlink_metadata(&destination).is_err());
        assert_eq!(gunzip(&dir.path().join("gzFine.dat.txt")), b"ok");
    }

    #[test]
    fn unreadable_entry_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.dat")).unwrap();
        std::fs::write(dir.path().join("Normal.dat"), b"ok").unwrap();

        let report = archive(dir.path(), &BeatmapSettings::default()).unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("Deep.dat"), b"deep").unwrap();

        let report = archive(dir.path(), &BeatmapSettings::default()).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(!nested.join("gzDeep.dat.txt").exists());
    }

    #[test]
    fn outputs_are_not_picked_up_again() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Normal.dat"), b"ok").unwrap();

        archive(dir.path(), &BeatmapSettings::default()).unwrap();
        let second = archive(dir.path(), &BeatmapSettings::default()).unwrap();
        assert_eq!(second.outcomes.len(), 1);
    }

    #[test]
    fn invalid_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Normal.dat");
        std::fs::write(&file, b"ok").unwrap();

        for path in [dir.path().join("absent"), file] {
            let err = archive(&path, &BeatmapSettings::default()).unwrap_err();
            assert!(matches!(err, PipelineError::NotADirectory(_)));
        }
    }
}
