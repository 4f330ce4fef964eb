//! Helper functions for UI operations.
//!
//! Background task spawning with panic capture, and the look-it-up links.

use crate::app::{App, AppEvent};
use crate::loader::load_questions;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use url::Url;

/// Where a question can be looked up in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LookupSite {
    Google,
    ChatGpt,
}

impl LookupSite {
    fn base(self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search",
            Self::ChatGpt => "https://chatgpt.com/",
        }
    }

    pub(super) fn name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::ChatGpt => "ChatGPT",
        }
    }
}

/// Wraps a future to catch panics and convert them to errors.
///
/// Returns `Ok(result)` if the future completes normally and
/// `Err(panic_message)` if it panics.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

/// Spawn the one-shot question load.
///
/// The result arrives as `AppEvent::QuestionsLoaded`; a panic inside the
/// loader arrives as `AppEvent::TaskPanicked` so the loading state still
/// settles.
pub(super) fn spawn_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let source = app.source.clone();
    let client = app.http_client.clone();
    let tx = event_tx.clone();

    tracing::debug!(source = %source, "Spawning question load");

    app.load_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(load_questions(&source, &client)).await {
            Ok(result) => {
                let event = AppEvent::QuestionsLoaded(result.map_err(|e| e.to_string()));
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(error = %e, event = "QuestionsLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "load_questions", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "load_questions",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Lookup URL for a question's text, with the query form-encoded.
pub(super) fn web_search_url(site: LookupSite, query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(site.base(), &[("q", query.trim())])
}
