//! Application event handling.
//!
//! Processes completion events from background tasks.

use crate::app::{App, AppEvent};

/// Apply one background event to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::QuestionsLoaded(result) => {
            if let Ok(questions) = &result {
                tracing::debug!(count = questions.len(), "Question load settled");
            }
            app.apply_loaded(result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == "load_questions" && app.loading {
                app.abandon_load(&error);
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
