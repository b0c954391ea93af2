use crate::data_model::{AnnotationResult, TaskFailure, TaskOutcome};

/// Reduces the settled task outcomes into the merged result mapping plus the
/// failures to report. Performs no shape validation: empty classification
/// lists and empty entity maps pass through untouched, and an all-failure
/// batch yields an empty mapping, which is still written to the document.
pub fn aggregate(outcomes: Vec<TaskOutcome>) -> (AnnotationResult, Vec<TaskFailure>) {
    let mut result = AnnotationResult::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            TaskOutcome::Success { task, output } => {
                result.insert(task.key().to_string(), output);
            }
            TaskOutcome::Failure { task, error } => {
                failures.push(TaskFailure { task, error });
            }
        }
    }

    (result, failures)
}
