use crate::model::message::ChatMessage;

/// Fallback when a request carries no user message at all.
pub const DEFAULT_USER_PROMPT: &str = "Hello";

/// The single prompt pair handed to the CLI. Derived per request, never
/// stored.
#[derive(Debug, Clone)]
pub struct ReducedPrompt {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
}

/// Collapse a chat history into the one prompt the CLI understands.
///
/// Later `system` messages override earlier ones; only the last `user`
/// message survives. Assistant turns and unknown roles carry no weight —
/// the backing tool takes a single task, not a transcript.
pub fn reduce_history(messages: &[ChatMessage]) -> ReducedPrompt {
    let mut system_prompt = None;
    let mut user_prompt = None;

    for msg in messages {
        match msg.role.as_str() {
            "system" => system_prompt = Some(msg.content.clone()),
            "user" => user_prompt = Some(msg.content.clone()),
            _ => {}
        }
    }

    ReducedPrompt {
        system_prompt,
        user_prompt: user_prompt.unwrap_or_else(|| DEFAULT_USER_PROMPT.to_string()),
    }
}
