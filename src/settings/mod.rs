//! Command line flags and the layered TOML/environment settings.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
