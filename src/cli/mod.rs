pub mod commands;

pub use commands::{CheckArgs, Cli, Commands};
