use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    api::{
        types::{ChatCompletionRequest, ChatCompletionResponse},
        AppState,
    },
    command,
    conversation::reduce_history,
};

/// OpenAI-compatible chat completions. Always answers with a completion
/// envelope: command failures are folded into the message content so
/// protocol clients never see a broken response shape.
pub async fn chat_completions(
    State(state): State<AppState>,
    Json(req): Json<ChatCompletionRequest>,
) -> Json<ChatCompletionResponse> {
    debug!(
        model = %req.model,
        temperature = req.temperature,
        stream = req.stream,
        messages = req.messages.len(),
        "chat completion request"
    );

    let reduced = reduce_history(&req.messages);
    let outcome = command::execute(&state.config, &reduced).await;
    let content = outcome.into_content();

    Json(ChatCompletionResponse::build(
        &req.model,
        &reduced.user_prompt,
        content,
    ))
}

/// Mock models catalog so clients that enumerate models before chatting
/// don't fall over.
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [
            {
                "id": state.config.model_id,
                "object": "model",
                "created": Utc::now().timestamp(),
                "owned_by": "user"
            }
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::template::CommandTemplate;
    use crate::config::ProxyConfig;
    use crate::model::message::ChatMessage;
    use std::sync::Arc;

    fn state(template: &str) -> AppState {
        AppState {
            config: Arc::new(ProxyConfig {
                template: CommandTemplate::parse(template).unwrap(),
                host: "127.0.0.1".into(),
                port: 0,
                debug: false,
                model_id: "cli-agent".into(),
            }),
        }
    }

    fn request(messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "cli-agent".into(),
            messages,
            temperature: 0.7,
            stream: false,
        }
    }

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            role: "user".into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn echo_template_round_trips_the_user_prompt() {
        let Json(resp) =
            chat_completions(State(state("echo {prompt}")), Json(request(vec![user("hi")]))).await;
        assert_eq!(resp.choices[0].message.content, "hi");
        assert_eq!(resp.model, "cli-agent");
        assert_eq!(resp.usage.prompt_tokens, 2);
    }

    #[tokio::test]
    async fn failing_command_still_yields_a_completion() {
        let Json(resp) =
            chat_completions(State(state("exit 1")), Json(request(vec![user("hi")]))).await;
        assert_eq!(resp.choices.len(), 1);
        assert!(resp.choices[0]
            .message
            .content
            .starts_with("Error executing CLI agent:"));
    }

    #[tokio::test]
    async fn empty_history_uses_the_fallback_prompt() {
        let Json(resp) =
            chat_completions(State(state("echo {prompt}")), Json(request(Vec::new()))).await;
        assert_eq!(resp.choices[0].message.content, "Hello");
    }

    #[tokio::test]
    async fn models_listing_exposes_the_configured_agent() {
        let Json(body) = list_models(State(state("echo {prompt}"))).await;
        assert_eq!(body["object"], "list");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], "cli-agent");
        assert_eq!(body["data"][0]["owned_by"], "user");
    }
}
