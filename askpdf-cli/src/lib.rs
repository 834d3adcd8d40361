//! # askpdf-cli
//!
//! The `askpdf` terminal assistant: upload PDF files, then ask questions
//! about one of them at a time. Answers are typed out as they are shown.

pub mod args;
pub mod commands;
pub mod repl;
pub mod reveal;

pub use args::Cli;
pub use commands::Command;
pub use repl::{Console, Flow};
