use std::{env, io, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::Parser;
use keycheck::{gemini, validate};

/// Checks that a Gemini API key can list models and generate content.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Falls back to GOOGLE_API_KEY when unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = gemini::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per request timeout.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = gemini::DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    #[arg(long, default_value = validate::PROMPT)]
    prompt: String,
}

/// `--api-key` / GEMINI_API_KEY, then the GOOGLE_API_KEY fallback.
fn resolve_key(arg: Option<String>, fallback: Option<String>) -> String {
    arg.or(fallback).unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    keycheck::tracing::init();
    let args = Args::parse();
    let key = resolve_key(args.api_key, env::var("GOOGLE_API_KEY").ok());
    let config = gemini::Config {
        endpoint: args.endpoint,
        timeout: Duration::from_secs(args.timeout),
    };
    let mut stdout = io::stdout();
    let outcome = validate::validate(
        &key,
        |key| gemini::Client::new(key, config),
        &args.prompt,
        &mut stdout,
    )
    .await
    .context("write report")?;
    tracing::debug!(passed = outcome.passed(), "done");
    Ok(ExitCode::from(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_precedence() {
        let key = |arg: Option<&str>, fallback: Option<&str>| {
            resolve_key(arg.map(String::from), fallback.map(String::from))
        };
        assert_eq!(key(Some("flag"), Some("google")), "flag");
        assert_eq!(key(None, Some("google")), "google");
        assert_eq!(key(None, None), "");
    }

    // the only test that touches GEMINI_API_KEY
    #[test]
    fn api_key_from_flag_or_env() {
        env::remove_var("GEMINI_API_KEY");
        let args = Args::try_parse_from(["keycheck"]).unwrap();
        assert_eq!(args.api_key, None);

        env::set_var("GEMINI_API_KEY", "from-env");
        let args = Args::try_parse_from(["keycheck"]).unwrap();
        assert_eq!(args.api_key.as_deref(), Some("from-env"));

        let args = Args::try_parse_from(["keycheck", "--api-key", "from-flag"]).unwrap();
        assert_eq!(args.api_key.as_deref(), Some("from-flag"));
        env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["keycheck", "--api-key", "k"]).unwrap();
        assert_eq!(args.endpoint, gemini::DEFAULT_ENDPOINT);
        assert_eq!(args.timeout, 30);
        assert_eq!(args.prompt, validate::PROMPT);
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(Args::try_parse_from(["keycheck", "--timeout", "0"]).is_err());
        let args = Args::try_parse_from(["keycheck", "--timeout", "5"]).unwrap();
        assert_eq!(args.timeout, 5);
    }
}
