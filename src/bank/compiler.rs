use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::PipelineError;

/// Paramètres d'une compilation de banque
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub source: &'a Path,
    pub destination: &'a Path,
    pub format: &'a str,
    pub platform: &'a str,
}

/// Sorties capturées du compilateur
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Compilateur de banque audio.
///
/// Après un `Ok`, `request.destination` existe et peut être mesuré par l'étape de patch.
pub trait BankCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, PipelineError>;
}

impl<T: BankCompiler + ?Sized> BankCompiler for &T {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, PipelineError> {
        (**self).compile(request)
    }
}

/// Invocation synchrone de `fsbankcl`, résolu via le PATH
#[derive(Debug, Clone)]
pub struct FsbankCompiler {
    program: String,
}

impl FsbankCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Cherche l'exécutable dans le PATH (ou tel quel s'il s'agit d'un chemin)
    pub fn locate(&self) -> Result<PathBuf, PipelineError> {
        which::which(&self.program).map_err(|_| PipelineError::ToolNotFound {
            program: self.program.clone(),
        })
    }

    fn arguments(request: &CompileRequest<'_>) -> Vec<OsString> {
        vec![
            "-i".into(),
            request.source.into(),
            "-o".into(),
            request.destination.into(),
            "-f".into(),
            request.format.into(),
            "-platform".into(),
            request.platform.into(),
        ]
    }
}

impl BankCompiler for FsbankCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, PipelineError> {
        let executable = self.locate()?;
        debug!(executable = %executable.display(), "Lancement du compilateur de banque");

        // Bloquant, sans délai maximal
        let output = Command::new(&executable)
            .args(Self::arguments(request))
            .output()
            .map_err(|e| PipelineError::io(&executable, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        info!("=== FSBank STDOUT ===\n{}", stdout);
        info!("=== FSBank STDERR ===\n{}", stderr);

        if !output.status.success() {
            return Err(PipelineError::Compile {
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        std::fs::metadata(request.destination)
            .map_err(|e| PipelineError::io(request.destination, e))?;
        info!(destination = %request.destination.display(), "Nouveau fichier .resources créé");

        Ok(CompileOutput { stdout, stderr })
    }
}
