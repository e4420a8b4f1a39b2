//! One-way notifications to an embedding native shell.
//!
//! The shell capability is passed in explicitly as a [`HostMessenger`]. When
//! no messenger is present every notification is logged and skipped, and
//! messenger failures are logged and swallowed: nothing here can fail the
//! caller.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::domain::Spreadsheet;

/// Fixed message sent when an assistant exchange has finished.
pub const MESSAGE_PROCESSED: &str = "processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostChannel {
    #[serde(rename = "copilotMessageProcessed")]
    MessageProcessed,
    #[serde(rename = "copilotSidebarHidden")]
    SidebarHidden,
    #[serde(rename = "spreadsheetUpdated")]
    SpreadsheetUpdated,
}

impl HostChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostChannel::MessageProcessed => "copilotMessageProcessed",
            HostChannel::SidebarHidden => "copilotSidebarHidden",
            HostChannel::SpreadsheetUpdated => "spreadsheetUpdated",
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("host channel I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode host message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A way of delivering messages to the host shell.
pub trait HostMessenger {
    fn post_message(&mut self, channel: HostChannel, message: &str) -> Result<(), BridgeError>;
}

#[derive(Serialize)]
struct Envelope<'a> {
    channel: HostChannel,
    message: &'a str,
}

/// Writes one JSON object per line to a file or named pipe the host reads.
pub struct FileMessenger {
    file: File,
}

impl FileMessenger {
    pub fn open(path: &Path) -> Result<Self, BridgeError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl HostMessenger for FileMessenger {
    fn post_message(&mut self, channel: HostChannel, message: &str) -> Result<(), BridgeError> {
        let mut line = serde_json::to_vec(&Envelope { channel, message })?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Outbound notifications for spreadsheet and assistant-visibility changes.
#[derive(Default)]
pub struct HostBridge {
    messenger: Option<Box<dyn HostMessenger>>,
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl HostBridge {
    pub fn new(messenger: Option<Box<dyn HostMessenger>>) -> Self {
        Self { messenger }
    }

    pub fn is_connected(&self) -> bool {
        self.messenger.is_some()
    }

    /// Sends the full replacement spreadsheet as JSON.
    pub fn notify_spreadsheet_updated(&mut self, spreadsheet: &Spreadsheet) {
        match serde_json::to_string(spreadsheet) {
            Ok(json) => self.send(HostChannel::SpreadsheetUpdated, &json),
            Err(e) => log::warn!("Could not serialize spreadsheet for host: {}", e),
        }
    }

    /// Reports the assistant sidebar state: `"true"` when hidden.
    pub fn notify_sidebar_visibility(&mut self, visible: bool) {
        let hidden = if visible { "false" } else { "true" };
        self.send(HostChannel::SidebarHidden, hidden);
    }

    pub fn notify_message_processed(&mut self) {
        self.send(HostChannel::MessageProcessed, MESSAGE_PROCESSED);
    }

    fn send(&mut self, channel: HostChannel, message: &str) {
        let Some(messenger) = self.messenger.as_mut() else {
            log::debug!("No host messenger; skipping {} notification", channel.as_str());
            return;
        };
        if let Err(e) = messenger.post_message(channel, message) {
            log::warn!("Host notification on {} failed: {}", channel.as_str(), e);
        }
    }
}
