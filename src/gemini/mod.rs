//! Client for the Generative Language REST api.

mod content;
mod models;

pub use content::GenerationResult;
pub use models::ModelDescriptor;

use crate::{credential::Credential, validate::ModelService, Error, Result};
use content::{GenerateContentRequest, GenerateContentResponse};
use models::ListModelsResponse;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::{collections::HashSet, time::Duration};
use tracing::{debug, error, warn};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_VERSION: &str = "v1beta/";
const PAGE_SIZE: &str = "1000";
const MAX_PAGES: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct Client {
    key: Credential,
    base: url::Url,
    client: reqwest::Client,
}

impl Client {
    pub fn new(key: Credential, config: Config) -> Result<Self> {
        let mut endpoint = config.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = url::Url::parse(&endpoint)?.join(API_VERSION)?;
        let client = reqwest::ClientBuilder::default()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { key, base, client })
    }

    /// Lists every model visible to the key, following pagination.
    ///
    /// Stops early, keeping what it has, if a page token repeats or after
    /// `MAX_PAGES` pages.
    pub async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let url = self.base.join("models")?;
        let mut models = Vec::new();
        let mut seen = HashSet::new();
        let mut page_token: Option<String> = None;
        for page_num in 1..=MAX_PAGES {
            let mut req = self
                .new_http_req(Method::GET, url.clone())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }
            let page: ListModelsResponse = self.execute(req, "model list").await?;
            debug!(page = page_num, count = page.models.len(), "fetched model page");
            models.extend(page.models);
            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen.insert(token.clone()) {
                        warn!(%token, "model list repeated a page token, stopping");
                        return Ok(models);
                    }
                    page_token = Some(token);
                }
                _ => return Ok(models),
            }
        }
        warn!(pages = MAX_PAGES, "model list still paging, stopping");
        Ok(models)
    }

    pub async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerationResult> {
        let name = models::resource_name(model);
        let url = self.base.join(&format!("{name}:generateContent"))?;
        let req = self
            .new_http_req(Method::POST, url)
            .json(&GenerateContentRequest::prompt(prompt));
        let resp: GenerateContentResponse = self.execute(req, "generation").await?;
        Ok(resp.into())
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder, what: &'static str) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(server_error(status, &text));
        }
        match serde_json::from_str(&text) {
            Ok(v) => Ok(v),
            Err(source) => {
                match serde_json::from_str::<serde_json::Value>(&text)
                    .and_then(|val| serde_json::to_string_pretty(&val))
                {
                    Ok(pretty) => error!("Failed to parse {what}:\n{pretty}"),
                    Err(_) => error!("Failed to parse {what}:\n{text}"),
                }
                Err(Error::Decode { what, source })
            }
        }
    }

    fn new_http_req(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("x-goog-api-key", self.key.expose())
    }
}

impl ModelService for Client {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        Client::list_models(self).await
    }

    async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerationResult> {
        Client::generate_content(self, model, prompt).await
    }
}

// Google error envelope shared by every endpoint
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ServerError,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ServerError {
    code: Option<u16>,
    message: String,
    status: Option<String>,
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ErrorDetail {
    reason: Option<String>,
}

impl ServerError {
    // invalid keys come back as 400 INVALID_ARGUMENT with this reason
    fn key_rejected(&self) -> bool {
        self.details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
            || matches!(
                self.status.as_deref(),
                Some("UNAUTHENTICATED" | "PERMISSION_DENIED")
            )
    }
}

fn server_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => {
            debug!(code = ?error.code, status = ?error.status, "server error");
            if error.key_rejected() {
                Error::Unauthorized {
                    status,
                    message: error.message,
                }
            } else {
                Error::from_status(status, error.message)
            }
        }
        Err(_) => {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("no body").to_string(),
                body => body.to_string(),
            };
            Error::from_status(status, message)
        }
    }
}
