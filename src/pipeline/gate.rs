use serde_json::Value;

use crate::config::HandlerConfig;
use crate::data_model::{ChangeType, DocumentSnapshot};

/// What the handler should do with a change event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No NLP work, no document write.
    Skip(SkipReason),
    /// Remove the output field from the document and purge mirrored rows.
    DeleteOutput,
    /// Dispatch the enabled tasks against this input text.
    Run(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Field-path configuration is invalid; carries the validation message.
    InvalidConfig(String),
    /// The document itself was deleted.
    DocumentDeleted,
    /// The input field is absent in the relevant snapshot.
    NoInputField,
    /// The input field holds a non-string value the provider cannot analyze.
    InputNotText,
    /// The input field value did not change across the update.
    InputUnchanged,
}

/// Decides whether annotation work must run for a classified change event.
///
/// Configuration validity is checked first and short-circuits every other
/// branch, including document deletes.
pub fn decide(
    change: ChangeType,
    before: &DocumentSnapshot,
    after: &DocumentSnapshot,
    config: &HandlerConfig,
) -> Action {
    if let Err(e) = config.validate() {
        return Action::Skip(SkipReason::InvalidConfig(e.to_string()));
    }

    match change {
        ChangeType::Delete => Action::Skip(SkipReason::DocumentDeleted),
        ChangeType::Create => match after.get(&config.input_field) {
            Some(Value::String(text)) => Action::Run(text.clone()),
            Some(_) => Action::Skip(SkipReason::InputNotText),
            None => Action::Skip(SkipReason::NoInputField),
        },
        ChangeType::Update => {
            let previous = before.get(&config.input_field);
            let current = after.get(&config.input_field);
            if previous == current {
                // Covers both-absent as well as an unchanged value.
                return Action::Skip(SkipReason::InputUnchanged);
            }
            match current {
                // Not equal to `previous`, so the field existed before.
                None => Action::DeleteOutput,
                Some(Value::String(text)) => Action::Run(text.clone()),
                Some(_) => Action::Skip(SkipReason::InputNotText),
            }
        }
    }
}
