pub mod decoder;
pub mod region;
