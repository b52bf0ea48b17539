//! CLI commands.

pub mod batch;
pub mod config;
pub mod render;
pub mod repair;
pub mod scan;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use carta_core::{CartaConfig, CartaError, Scanner, StaticBackend};

/// Attach the short user-facing message to a library error.
pub fn describe(err: CartaError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", err.user_message(), err)
}

/// Gemini scanner from config, or an offline scanner replaying a saved response.
pub fn build_scanner(config: &CartaConfig, response_file: Option<&Path>) -> anyhow::Result<Scanner> {
    match response_file {
        Some(path) => {
            let response = std::fs::read_to_string(path)?;
            info!("Using saved response from {}", path.display());
            Ok(Scanner::new(Arc::new(StaticBackend::new(response)))
                .with_generation(config.inference.generation()))
        }
        None => Scanner::from_config(config).map_err(describe),
    }
}
