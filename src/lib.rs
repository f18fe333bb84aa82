pub mod analysis;
pub mod bank;
pub mod beatmap;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{Pipeline, RunReport, Severity, Stage};

use bank::FsbankCompiler;

/// Lance la conversion complète avec le compilateur `fsbankcl` du PATH
pub fn run(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    let compiler = FsbankCompiler::new(config.compiler.program.clone());
    Pipeline::new(config.clone(), compiler).run()
}
