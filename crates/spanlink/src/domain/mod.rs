//! Core domain types shared by the engine, the validator, and the shell.

pub mod errors;
pub mod model;
