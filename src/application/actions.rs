//! Actions the assistant may invoke, and how their arguments become a
//! reviewable proposal.

use serde_json::{Value, json};

use crate::domain::{
    CreateSpreadsheetArgs, DomainResult, PreviewChanges, SpreadsheetStore,
    UNTITLED_SPREADSHEET_TITLE, canonicalize,
};
use crate::infrastructure::ActionInvocation;

pub const CREATE_SPREADSHEET: &str = "createSpreadsheet";

pub const INSTRUCTIONS: &str = "You are assisting the user as best as you can. \
Answer in the best way possible given the data you have. \
When the user asks for new tabular data, call the createSpreadsheet action with a short \
title and every row of the table, including a header row. Every cell value must be a string. \
The user reviews each proposed spreadsheet before it is created.";

/// Schema of the `createSpreadsheet` action as published to the runtime.
pub fn create_spreadsheet_schema() -> Value {
    json!({
        "name": CREATE_SPREADSHEET,
        "description": "Create a new spreadsheet",
        "parameters": [
            {
                "name": "rows",
                "type": "object[]",
                "description": "The rows of the spreadsheet",
                "attributes": [
                    {
                        "name": "cells",
                        "type": "object[]",
                        "description": "The cells of the row",
                        "attributes": [
                            {
                                "name": "value",
                                "type": "string",
                                "description": "The value of the cell"
                            }
                        ]
                    }
                ]
            },
            {
                "name": "title",
                "type": "string",
                "description": "The title of the spreadsheet"
            }
        ]
    })
}

pub fn action_schemas() -> Vec<Value> {
    vec![create_spreadsheet_schema()]
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantAction {
    CreateSpreadsheet(CreateSpreadsheetArgs),
    Unknown(String),
}

impl AssistantAction {
    pub fn from_invocation(invocation: &ActionInvocation) -> Self {
        match invocation.name.as_str() {
            CREATE_SPREADSHEET => {
                Self::CreateSpreadsheet(CreateSpreadsheetArgs::from_value(&invocation.arguments))
            }
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A new spreadsheet waiting for the user's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedSpreadsheet {
    pub title: String,
    pub preview: PreviewChanges,
}

impl ProposedSpreadsheet {
    pub fn from_args(args: &CreateSpreadsheetArgs) -> Self {
        let title = args
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_SPREADSHEET_TITLE)
            .to_string();
        Self {
            title,
            preview: PreviewChanges::new(
                "Create spreadsheet",
                "Spreadsheet created",
                canonicalize(&args.rows),
            ),
        }
    }

    /// Commits the (possibly edited) grid as a new, selected spreadsheet and
    /// returns its index.
    pub fn commit_into(&mut self, store: &mut SpreadsheetStore) -> DomainResult<usize> {
        let title = self.title.clone();
        let mut index = store.selected_index();
        self.preview
            .commit(|rows| index = store.create_spreadsheet(title, rows))?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, PreviewStatus};

    fn invocation(name: &str, arguments: Value) -> ActionInvocation {
        ActionInvocation { name: name.to_string(), arguments }
    }

    #[test]
    fn test_schema_names_parameters() {
        let schema = create_spreadsheet_schema();
        assert_eq!(schema["name"], CREATE_SPREADSHEET);
        assert_eq!(schema["parameters"][0]["name"], "rows");
        assert_eq!(schema["parameters"][0]["attributes"][0]["attributes"][0]["name"], "value");
        assert_eq!(schema["parameters"][1]["name"], "title");
    }

    #[test]
    fn test_dispatch() {
        let action = AssistantAction::from_invocation(&invocation(
            CREATE_SPREADSHEET,
            json!({"title": "T", "rows": []}),
        ));
        assert!(matches!(action, AssistantAction::CreateSpreadsheet(ref a) if a.title.as_deref() == Some("T")));
        assert_eq!(
            AssistantAction::from_invocation(&invocation("deleteEverything", Value::Null)),
            AssistantAction::Unknown("deleteEverything".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_title_falls_back() {
        let proposal = ProposedSpreadsheet::from_args(&CreateSpreadsheetArgs::default());
        assert_eq!(proposal.title, "Untitled Spreadsheet");
        let proposal = ProposedSpreadsheet::from_args(&CreateSpreadsheetArgs {
            rows: vec![],
            title: Some(String::new()),
        });
        assert_eq!(proposal.title, "Untitled Spreadsheet");
    }

    #[test]
    fn test_commit_appends_and_selects_once() {
        let args = CreateSpreadsheetArgs::from_value(&json!({
            "title": "Pets",
            "rows": [{"cells": [{"value": "A"}]}, {"cells": [{"value": "B"}, {"value": "C"}]}]
        }));
        let mut proposal = ProposedSpreadsheet::from_args(&args);
        let mut store = SpreadsheetStore::default();

        assert_eq!(proposal.commit_into(&mut store), Ok(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.selected_index(), 1);
        assert_eq!(store.selected().title, "Pets");
        assert_eq!(store.selected().rows.value(0, 1), "");
        assert_eq!(proposal.preview.status(), PreviewStatus::Committed);

        assert_eq!(proposal.commit_into(&mut store), Err(DomainError::PreviewClosed));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_rejected_proposal_leaves_store_alone() {
        let mut proposal = ProposedSpreadsheet::from_args(&CreateSpreadsheetArgs::default());
        let mut store = SpreadsheetStore::default();
        proposal.preview.reject().unwrap();
        assert!(proposal.commit_into(&mut store).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_index(), 0);
    }
}
