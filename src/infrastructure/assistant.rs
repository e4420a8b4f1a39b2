//! Client for the hosted assistant runtime.
//!
//! The runtime receives the chat history, readable context and the action
//! schemas the app supports, and answers with an optional message plus any
//! action invocations it wants the app to perform.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("request to assistant runtime failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("assistant runtime answered with status {0}")]
    Status(u16),
    #[error("could not decode assistant reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("assistant worker stopped without replying")]
    WorkerGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// A piece of app state the assistant may read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantRequest {
    pub instructions: String,
    pub messages: Vec<ChatMessage>,
    pub context: Vec<ContextEntry>,
    pub actions: Vec<Value>,
}

/// An action the assistant asked the app to run, with untyped arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssistantReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionInvocation>,
}

pub trait Assistant: Send + Sync {
    fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply, AssistantError>;
}

/// Talks to the runtime over HTTP with a JSON body.
pub struct HttpAssistant {
    client: Client,
    url: String,
}

impl HttpAssistant {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Assistant for HttpAssistant {
    fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply, AssistantError> {
        let body = serde_json::to_vec(request)?;
        log::debug!("Posting {} chat messages to {}", request.messages.len(), self.url);
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status(status.as_u16()));
        }
        parse_reply(&response.text()?)
    }
}

pub fn parse_reply(body: &str) -> Result<AssistantReply, AssistantError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reply_with_actions() {
        let reply = parse_reply(
            r#"{"message": "Here you go", "actions": [{"name": "createSpreadsheet", "arguments": {"title": "T"}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.message.as_deref(), Some("Here you go"));
        assert_eq!(reply.actions.len(), 1);
        assert_eq!(reply.actions[0].name, "createSpreadsheet");
        assert_eq!(reply.actions[0].arguments, json!({"title": "T"}));
    }

    #[test]
    fn test_parse_reply_defaults() {
        assert_eq!(parse_reply("{}").unwrap(), AssistantReply::default());
        let reply = parse_reply(r#"{"actions": [{"name": "x"}]}"#).unwrap();
        assert_eq!(reply.actions[0].arguments, Value::Null);
    }

    #[test]
    fn test_parse_reply_rejects_garbage() {
        assert!(matches!(parse_reply("not json"), Err(AssistantError::Decode(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = AssistantRequest {
            instructions: "be nice".into(),
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
            context: vec![ContextEntry { description: "Today's date".into(), value: "1/2/2026".into() }],
            actions: vec![json!({"name": "createSpreadsheet"})],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0], json!({"role": "user", "content": "hi"}));
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert_eq!(value["context"][0]["description"], "Today's date");
        assert_eq!(value["actions"][0]["name"], "createSpreadsheet");
    }
}
