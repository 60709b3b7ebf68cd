//! LLM-backed planner against an OpenAI-compatible chat endpoint.
//!
//! One chat-completion call per plan. The model is asked to reply with a
//! single JSON object: `{"instruction": "...", "insufficient_info": bool}`.
//! Anything else is a planning fault, never a silent fallback.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Goal, INSTRUCTION_TARGET_LEN, Instruction, Round, ScreenSnapshot};
use crate::error::{PilotError, Result};
use crate::planner::Planner;
use crate::planner::sensitive::SensitivePolicy;

/// Default inference endpoint (local model server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081/v1";

/// Default model alias served at the inference endpoint.
pub const DEFAULT_MODEL: &str = "autoglm-phone-9b";

/// Configuration for the LLM planner.
#[derive(Debug, Clone)]
pub struct LlmPlannerConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmPlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Planner calling an OpenAI-compatible `/chat/completions` endpoint.
pub struct LlmPlanner {
    client: Client,
    config: LlmPlannerConfig,
    policy: SensitivePolicy,
}

/// Shape the model must reply with.
#[derive(Debug, Deserialize)]
struct PlannerReply {
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default)]
    insufficient_info: bool,
}

impl LlmPlanner {
    pub fn new(config: LlmPlannerConfig, policy: SensitivePolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PilotError::Planning(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            policy,
        })
    }

    fn system_prompt() -> String {
        format!(
            "You control a phone one step at a time. Given a goal, the rounds \
             so far, and the current screen snapshot, reply with exactly one \
             JSON object and nothing else: \
             {{\"instruction\": \"<one short directive, at most {} characters>\", \
             \"insufficient_info\": false}}. \
             If the snapshot lacks enough signal to pick a next step, reply \
             {{\"insufficient_info\": true}} instead. Never propose more than \
             one step.",
            INSTRUCTION_TARGET_LEN
        )
    }

    fn user_prompt(goal: &Goal, history: &[Round], snapshot: &ScreenSnapshot) -> String {
        let mut prompt = format!("Goal: {}\n", goal.text);
        if history.is_empty() {
            prompt.push_str("Rounds so far: none\n");
        } else {
            prompt.push_str("Rounds so far:\n");
            for round in history {
                prompt.push_str(&format!(
                    "  {}. \"{}\" -> {}\n",
                    round.index,
                    round.instruction.text,
                    if round.result.success { "ok" } else { "failed" }
                ));
            }
        }
        let snapshot_json =
            serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());
        prompt.push_str(&format!("Current screen: {}\n", snapshot_json));
        prompt
    }

    /// Parse the model's message content into a reply, tolerating a
    /// markdown code fence around the JSON object.
    fn parse_reply(content: &str) -> Result<PlannerReply> {
        let stripped = strip_code_fence(content);
        serde_json::from_str(stripped)
            .map_err(|e| PilotError::Planning(format!("malformed planner reply: {}", e)))
    }
}

/// Strip a ``` / ```json fence if the model wrapped its reply in one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(
        &self,
        goal: &Goal,
        history: &[Round],
        snapshot: &ScreenSnapshot,
    ) -> Result<Instruction> {
        let body = json!({
            "model": self.config.model,
            "temperature": 0.1,
            "messages": [
                {"role": "system", "content": Self::system_prompt()},
                {"role": "user", "content": Self::user_prompt(goal, history, snapshot)},
            ],
        });

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(PilotError::Planning(format!(
                "inference endpoint returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| PilotError::Planning("reply missing message content".to_string()))?;

        let reply = Self::parse_reply(content)?;

        if reply.insufficient_info {
            log::info!("planner requested re-observation");
            return Ok(Instruction::insufficient_info());
        }

        let text = reply.instruction.ok_or_else(|| {
            PilotError::Planning("reply had neither instruction nor insufficient_info".to_string())
        })?;
        let instruction = Instruction::actionable(text)?;

        if let Some(category) = self.policy.classify(&instruction.text) {
            log::info!(
                "instruction \"{}\" classified sensitive ({})",
                instruction.text,
                category
            );
            return Ok(instruction.mark_sensitive());
        }
        Ok(instruction)
    }
}
