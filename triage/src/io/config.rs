//! Agent configuration loaded from `triage.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Agent configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to the reference values; a missing
/// file yields the full default configuration.
///
/// The API credential is never stored here: `engine.api_key_env` names the
/// environment variable it is read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriageConfig {
    pub engine: EngineConfig,
    pub limits: LimitConfig,
}

/// Reasoning-engine endpoint and request parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of an OpenAI-compatible chat-completions API.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer credential.
    pub api_key_env: String,
    /// Per-call transport timeout in seconds.
    pub request_timeout_secs: u64,
    /// Sampling temperature; kept low to favor determinism.
    pub temperature: f32,
}

/// Step, timeout and truncation budgets. Policy, not mechanism: the loop
/// itself is parameter-free.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum command-execution cycles per investigation.
    pub max_steps: usize,
    /// Wall-clock timeout per executed command, in seconds.
    pub command_timeout_secs: u64,
    /// Character cap on per-step stdout in the engine request.
    pub prompt_stdout_chars: usize,
    /// Character cap on per-step stderr in the engine request.
    pub prompt_stderr_chars: usize,
    /// Character cap on the output view in the rendered transcript.
    pub transcript_output_chars: usize,
    /// Byte bound on captured output per stream, per command.
    pub capture_limit_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            api_key_env: "LLM_API_KEY".to_string(),
            request_timeout_secs: 120,
            temperature: 0.1,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_steps: 3,
            command_timeout_secs: 120,
            prompt_stdout_chars: 1500,
            prompt_stderr_chars: 1000,
            transcript_output_chars: 800,
            capture_limit_bytes: 100_000,
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read the credential from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .with_context(|| format!("read credential from ${}", self.api_key_env))
    }
}

impl TriageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.engine.base_url.trim().is_empty() {
            return Err(anyhow!("engine.base_url must not be empty"));
        }
        if self.engine.model.trim().is_empty() {
            return Err(anyhow!("engine.model must not be empty"));
        }
        if self.engine.api_key_env.trim().is_empty() {
            return Err(anyhow!("engine.api_key_env must not be empty"));
        }
        if self.engine.request_timeout_secs == 0 {
            return Err(anyhow!("engine.request_timeout_secs must be > 0"));
        }
        if !(0.0..=2.0).contains(&self.engine.temperature) {
            return Err(anyhow!("engine.temperature must be within 0.0..=2.0"));
        }
        if self.limits.max_steps == 0 {
            return Err(anyhow!("limits.max_steps must be > 0"));
        }
        if self.limits.command_timeout_secs == 0 {
            return Err(anyhow!("limits.command_timeout_secs must be > 0"));
        }
        if self.limits.prompt_stdout_chars == 0 || self.limits.prompt_stderr_chars == 0 {
            return Err(anyhow!("prompt character budgets must be > 0"));
        }
        if self.limits.transcript_output_chars == 0 {
            return Err(anyhow!("limits.transcript_output_chars must be > 0"));
        }
        if self.limits.capture_limit_bytes == 0 {
            return Err(anyhow!("limits.capture_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TriageConfig::default()`.
pub fn load_config(path: &Path) -> Result<TriageConfig> {
    if !path.exists() {
        let cfg = TriageConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TriageConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
