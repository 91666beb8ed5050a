use super::Llm;
use crate::config::GenerationConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Debug, Serialize)]
struct GenerateReq<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResp {
    #[serde(default)]
    response: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    cfg: GenerationConfig,
}

impl OllamaClient {
    pub fn new(cfg: GenerationConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("building HTTP client")?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.cfg.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl Llm for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let req = GenerateReq {
            model: &self.cfg.model,
            prompt,
            format: self.cfg.json_format.then_some("json"),
            stream: false,
            options: GenerateOptions { temperature: self.cfg.temperature, num_ctx: self.cfg.num_ctx },
        };
        let resp = self
            .http
            .post(self.endpoint())
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResp>()
            .await?;
        Ok(resp.response)
    }
}
