//! Flag parsing, settings resolution and terminal output for the `minify` binary

pub mod cli;
pub mod commands;
pub mod console;
pub mod report;
pub mod settings;
