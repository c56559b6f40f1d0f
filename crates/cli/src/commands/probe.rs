//! Gemini model probe.
//!
//! Sends a one-word prompt to each model with the configured key and reports
//! which models answer. Useful when a model is retired or the key lacks
//! access.

use return_desk_web::config::{ConfigError, GeminiConfig};
use return_desk_web::gemini::{GeminiClient, GeminiError};

/// Models probed when none are given on the command line.
pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-1.5-flash", "gemini-pro"];

const PROBE_PROMPT: &str = "Test";

/// Errors that stop the probe before any model is tried.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("GEMINI_API_KEY is not set")]
    MissingKey,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] GeminiError),
}

/// Summary of a probe run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub working: usize,
    pub failing: usize,
}

/// Models to probe: the ones requested, or the defaults.
fn models_to_probe(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect()
    } else {
        requested.to_vec()
    }
}

/// Probe each model in turn. Model failures are reported, not returned.
///
/// # Errors
///
/// Returns an error if the key is missing or invalid, or a client cannot be built.
pub async fn run(requested: &[String]) -> Result<ProbeReport, ProbeError> {
    dotenvy::dotenv().ok();

    let base = GeminiConfig::from_env()?.ok_or(ProbeError::MissingKey)?;
    let mut report = ProbeReport::default();

    for model in models_to_probe(requested) {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: base.api_key.clone(),
            model,
        })?;
        let model = client.model();

        tracing::info!(model, "Testing model...");
        match client.generate_content(None, PROBE_PROMPT).await {
            Ok(_) => {
                tracing::info!(model, "Model works");
                report.working += 1;
            }
            Err(e) => {
                tracing::error!(model, error = %e, "Model failed");
                report.failing += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_to_probe_defaults() {
        assert_eq!(models_to_probe(&[]), DEFAULT_MODELS);
    }

    #[test]
    fn test_models_to_probe_uses_request() {
        let requested = vec!["gemini-2.0-flash".to_string()];
        assert_eq!(models_to_probe(&requested), requested);
    }
}
