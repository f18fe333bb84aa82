pub mod compiler;
pub mod patch;

pub use compiler::{BankCompiler, CompileOutput, CompileRequest, FsbankCompiler};
