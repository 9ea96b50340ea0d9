//! Reasoning-engine client.
//!
//! The [`ReasoningEngine`] trait decouples the loop from the transport; tests
//! script replies without a network. [`HttpEngine`] talks to an
//! OpenAI-compatible chat-completions endpoint and is total: transport,
//! HTTP-status and decode failures all collapse into the same terminal fault
//! decision, so the loop ends with an explained transcript instead of an
//! error.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::core::decision::{Decision, decode_decision};
use crate::core::prompt::{ChatMessage, PromptLimits, build_messages};
use crate::core::types::Step;
use crate::io::config::EngineConfig;

/// Abstraction over the reasoning engine.
pub trait ReasoningEngine {
    /// Produce one decision for the next step. Must not fail: engines report
    /// their own faults as terminal decisions.
    fn think(&self, instruction: &str, history: &[Step]) -> Decision;
}

/// Engine backed by an OpenAI-compatible chat-completions API.
///
/// Holds one pooled blocking client; a single `HttpEngine` can serve many
/// investigations since requests are independent and stateless.
pub struct HttpEngine {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    limits: PromptLimits,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig, api_key: String, limits: PromptLimits) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            limits,
        })
    }

    fn request_reply(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("send chat request")?
            .error_for_status()
            .context("chat request status")?;
        let parsed: ChatResponse = response.json().context("parse chat response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("engine returned no choices"))
    }
}

impl ReasoningEngine for HttpEngine {
    #[instrument(skip_all, fields(model = %self.model, steps = history.len()))]
    fn think(&self, instruction: &str, history: &[Step]) -> Decision {
        let messages = build_messages(instruction, history, &self.limits);
        match self.request_reply(&messages) {
            Ok(reply) => {
                debug!(chars = reply.len(), "engine replied");
                decode_decision(&reply)
            }
            Err(err) => {
                warn!(err = %format!("{err:#}"), "engine call failed");
                Decision::fault(format!("Engine fault: {err:#}"))
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}
