//! Remote providers over blocking HTTP: OpenAI-compatible chat completions
//! (OpenAI, Groq, local Ollama) and Gemini `generateContent`.

use super::{build_prompt, DiagnosisContext, DiagnosisError, Diagnostician, SYSTEM_PROMPT};
use crate::config::DiagnosisConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

fn client(config: &DiagnosisConfig) -> Result<reqwest::blocking::Client, DiagnosisError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .build()?)
}

fn check_status(
    res: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, DiagnosisError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status().as_u16();
    let body = res.text().unwrap_or_default();
    Err(DiagnosisError::Status { status, body })
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsProvider {
    name: &'static str,
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl ChatCompletionsProvider {
    fn build(
        name: &'static str,
        config: &DiagnosisConfig,
        default_url: &str,
        default_model: &str,
        api_key: Option<String>,
    ) -> Result<Self, DiagnosisError> {
        Ok(Self {
            name,
            client: client(config)?,
            base_url: config
                .endpoint
                .as_deref()
                .unwrap_or(default_url)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: config.model.clone().unwrap_or_else(|| default_model.to_string()),
            max_tokens: config.max_tokens,
        })
    }

    pub fn openai(config: &DiagnosisConfig, api_key: String) -> Result<Self, DiagnosisError> {
        Self::build(
            "openai",
            config,
            "https://api.openai.com/v1",
            "gpt-3.5-turbo",
            Some(api_key),
        )
    }

    pub fn groq(config: &DiagnosisConfig, api_key: String) -> Result<Self, DiagnosisError> {
        Self::build(
            "groq",
            config,
            "https://api.groq.com/openai/v1",
            "llama-3.1-8b-instant",
            Some(api_key),
        )
    }

    pub fn ollama(config: &DiagnosisConfig) -> Result<Self, DiagnosisError> {
        Self::build("ollama", config, "http://localhost:11434/v1", "llama3.2:latest", None)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Diagnostician for ChatCompletionsProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn diagnose(&self, ctx: &DiagnosisContext<'_>) -> Result<String, DiagnosisError> {
        let prompt = build_prompt(ctx);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
        };
        let url = format!("{}/chat/completions", self.base_url);
        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let res = check_status(req.send()?)?;
        let parsed: ChatResponse = res.json()?;
        debug!(provider = self.name, model = %self.model, "diagnosis received");
        parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DiagnosisError::EmptyResponse {
                provider: self.name.to_string(),
            })
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiReplyContent>,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &DiagnosisConfig, api_key: String) -> Result<Self, DiagnosisError> {
        Ok(Self {
            client: client(config)?,
            base_url: config
                .endpoint
                .as_deref()
                .unwrap_or("https://generativelanguage.googleapis.com/v1beta")
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| "gemini-1.5-flash".to_string()),
        })
    }
}

impl Diagnostician for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn diagnose(&self, ctx: &DiagnosisContext<'_>) -> Result<String, DiagnosisError> {
        let prompt = build_prompt(ctx);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &prompt }],
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?;
        let parsed: GeminiResponse = check_status(res)?.json()?;
        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DiagnosisError::EmptyResponse {
                provider: "gemini".to_string(),
            })
    }
}
