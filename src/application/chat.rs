//! Assistant sidebar state and the background exchange with the runtime.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::actions::{INSTRUCTIONS, action_schemas};
use super::text_input::TextInput;
use crate::infrastructure::{
    Assistant, AssistantError, AssistantReply, AssistantRequest, ChatMessage, ContextEntry,
};

pub const WELCOME_MESSAGE: &str = "Welcome to the spreadsheet app! How can I help you?";

type Exchange = Receiver<Result<AssistantReply, AssistantError>>;

#[derive(Default)]
pub struct ChatPanel {
    pub visible: bool,
    pub messages: Vec<ChatMessage>,
    pub input: TextInput,
    exchange: Option<Exchange>,
}

impl ChatPanel {
    /// True while a request is in flight; new messages are refused until it
    /// completes.
    pub fn in_progress(&self) -> bool {
        self.exchange.is_some()
    }

    /// Builds the runtime request from the current history.
    pub fn request(&self) -> AssistantRequest {
        AssistantRequest {
            instructions: INSTRUCTIONS.to_string(),
            messages: self.messages.clone(),
            context: vec![ContextEntry {
                description: "Today's date".to_string(),
                value: chrono::Local::now().format("%-m/%-d/%Y").to_string(),
            }],
            actions: action_schemas(),
        }
    }

    /// Runs one exchange on a worker thread. The reply is picked up by
    /// [`ChatPanel::poll`].
    pub fn start_exchange(&mut self, assistant: Arc<dyn Assistant>) {
        let request = self.request();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(assistant.complete(&request));
        });
        self.exchange = Some(rx);
    }

    /// Returns the finished exchange's result, if there is one.
    pub fn poll(&mut self) -> Option<Result<AssistantReply, AssistantError>> {
        let result = match self.exchange.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssistantError::WorkerGone),
        };
        self.exchange = None;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Echo;

    impl Assistant for Echo {
        fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply, AssistantError> {
            Ok(AssistantReply {
                message: request.messages.last().map(|m| m.content.clone()),
                actions: vec![],
            })
        }
    }

    #[test]
    fn test_request_carries_context_and_actions() {
        let mut chat = ChatPanel::default();
        chat.messages.push(ChatMessage::user("make a table"));
        let request = chat.request();
        assert_eq!(request.instructions, INSTRUCTIONS);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.context[0].description, "Today's date");
        assert_eq!(request.actions[0]["name"], "createSpreadsheet");
    }

    #[test]
    fn test_exchange_completes_once() {
        let mut chat = ChatPanel::default();
        chat.messages.push(ChatMessage::user("ping"));
        assert!(chat.poll().is_none());

        chat.start_exchange(Arc::new(Echo));
        assert!(chat.in_progress());

        let mut reply = None;
        for _ in 0..200 {
            if let Some(result) = chat.poll() {
                reply = Some(result);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        let reply = reply.expect("exchange did not finish").unwrap();
        assert_eq!(reply.message.as_deref(), Some("ping"));
        assert!(!chat.in_progress());
        assert!(chat.poll().is_none());
    }
}
