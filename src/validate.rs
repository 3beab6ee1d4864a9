//! The key check itself: list models, pick one, ask it for a line of text.

use crate::{
    credential::Credential,
    gemini::{GenerationResult, ModelDescriptor},
    timed::TimedExt,
    Error, Result,
};
use std::{
    io::{self, Write},
    process::ExitCode,
};
use tracing::{debug, info, warn};

pub const PROMPT: &str = "Say a one-line friendly hello and include today's year.";

/// Models whose name contains this are tried first.
const PREFERRED: &str = "flash";

#[allow(async_fn_in_trait)]
pub trait ModelService {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerationResult>;
}

impl<S: ModelService> ModelService for &S {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        (**self).list_models().await
    }

    async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerationResult> {
        (**self).generate_content(model, prompt).await
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// Key absent or still the placeholder. Nothing was sent.
    MissingCredential(Error),
    /// Listing worked but returned nothing.
    NoModels,
    Failed(Error),
    Passed { model: String, text: String },
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }

    /// 0 for a passing run, 1 for anything else.
    pub fn exit_status(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

impl From<&Outcome> for ExitCode {
    fn from(outcome: &Outcome) -> Self {
        ExitCode::from(outcome.exit_status())
    }
}

/// First model with "flash" in its name, else the first one listed.
pub fn select_model(models: &[ModelDescriptor]) -> Option<&ModelDescriptor> {
    models
        .iter()
        .find(|m| m.name.contains(PREFERRED))
        .or_else(|| models.first())
}

/// Runs the check and writes a human readable report to `out`.
///
/// `connect` is only called once the key has passed the local checks, so a
/// missing key never reaches the network. Every service error ends the run
/// and is reported under the same heading; the returned [`Outcome`] keeps the
/// typed error for the caller.
pub async fn validate<S, F, W>(key: &str, connect: F, prompt: &str, out: &mut W) -> io::Result<Outcome>
where
    S: ModelService,
    F: FnOnce(Credential) -> Result<S>,
    W: Write,
{
    let credential = match Credential::new(key) {
        Ok(c) => c,
        Err(err) => {
            warn!("{err}");
            writeln!(
                out,
                "❌ Please set your Gemini API key (--api-key or GEMINI_API_KEY)."
            )?;
            return Ok(Outcome::MissingCredential(err));
        }
    };
    let service = match connect(credential) {
        Ok(s) => s,
        Err(err) => return failed(out, err),
    };

    writeln!(out, "🔍 Fetching available models for your key...")?;
    writeln!(out)?;
    let (models, elapsed) = service.list_models().timed().await;
    debug!(?elapsed, "list models");
    let models = match models {
        Ok(models) => models,
        Err(err) => return failed(out, err),
    };
    let Some(selected) = select_model(&models) else {
        writeln!(out, "⚠️ No models returned. Your key might be invalid or restricted.")?;
        return Ok(Outcome::NoModels);
    };
    for model in &models {
        writeln!(out, "✅ {model}")?;
    }

    info!(model = %selected, count = models.len(), "selected model");
    if !selected.supported_generation_methods.is_empty() && !selected.supports("generateContent") {
        warn!(model = %selected, "model does not advertise generateContent");
    }
    writeln!(out)?;
    writeln!(out, "🚀 Testing model: {selected}")?;
    writeln!(out)?;

    let (result, elapsed) = service.generate_content(&selected.name, prompt).timed().await;
    debug!(?elapsed, "generate content");
    let result = match result {
        Ok(result) => result,
        Err(err) => return failed(out, err),
    };
    let text = result.text.trim();
    if text.is_empty() {
        debug!(finish = ?result.finish_reason, blocked = ?result.block_reason, "no text in response");
        return failed(
            out,
            Error::EmptyResponse {
                model: selected.name.clone(),
            },
        );
    }
    writeln!(out, "🤖 Model response:")?;
    writeln!(out, "{text}")?;
    Ok(Outcome::Passed {
        model: selected.name.clone(),
        text: text.to_string(),
    })
}

fn failed<W: Write>(out: &mut W, err: Error) -> io::Result<Outcome> {
    debug!(kind = err.kind(), error = %err, "validation failed");
    writeln!(out, "❌ Error while testing API key:")?;
    writeln!(out, "{err}")?;
    Ok(Outcome::Failed(err))
}
