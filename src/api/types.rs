use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::message::ChatMessage;

#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default = "default_model")]
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Accepted for protocol compatibility; the CLI backend has no
    /// temperature knob.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Accepted for protocol compatibility; output is never streamed.
    #[serde(default)]
    pub stream: bool,
}

fn default_model() -> String {
    "cli-agent".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl ChatCompletionResponse {
    /// Wrap final content in the completion envelope. Token counts are
    /// character counts — nothing in this system tokenizes, and clients
    /// only need the fields to exist and add up.
    pub fn build(model: &str, user_prompt: &str, content: String) -> Self {
        let prompt_tokens = user_prompt.chars().count();
        let completion_tokens = content.chars().count();

        Self {
            id: format!("chatcmpl-{}", Uuid::new_v4()),
            object: "chat.completion".to_string(),
            created: Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: "stop".to_string(),
            }],
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        }
    }
}
