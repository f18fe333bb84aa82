use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Erreur de décodage du fichier {path:?} : {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Exécutable '{program}' introuvable ! Ajoutez-le au PATH")]
    ToolNotFound { program: String },
    #[error("Le compilateur de banque a échoué (code {status:?})\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    Compile {
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("Erreur d'entrée/sortie sur {path:?} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Erreur de sérialisation JSON : {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("'{0}' n'est pas un dossier valide")]
    NotADirectory(PathBuf),
    #[error("L'étape '{0}' requiert un résultat qui n'a pas été produit")]
    MissingStageInput(Stage),
    #[error("Échec de l'étape '{stage}' : {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Erreur d'origine, sans l'enveloppe d'étape
    pub fn root(&self) -> &PipelineError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}
