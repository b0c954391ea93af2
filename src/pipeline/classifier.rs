use crate::data_model::{ChangeEvent, ChangeType};

/// Classifies a change event from the snapshot existence pair. Pure and
/// total: Delete wins over everything, Create over Update.
pub fn classify(event: &ChangeEvent) -> ChangeType {
    if !event.after.exists {
        ChangeType::Delete
    } else if !event.before.exists {
        ChangeType::Create
    } else {
        ChangeType::Update
    }
}
