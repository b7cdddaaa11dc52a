use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, RawQuery},
    response::Html,
};
use tokio::sync::{Mutex, oneshot};

/// Hands the captured query string to whoever is waiting on the listener.
///
/// Holds `None` once the first callback has been delivered.
pub type CallbackState = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// Receives the redirect from Spotify's authorization page.
///
/// The raw query string is forwarded untouched; the terminal side decides
/// whether it carries a usable code. Only the first request is forwarded.
pub async fn callback(
    RawQuery(query): RawQuery,
    Query(params): Query<Vec<(String, String)>>,
    Extension(shared_state): Extension<CallbackState>,
) -> Html<&'static str> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let Some(sender) = shared_state.lock().await.take() else {
        return Html("<h4>Authorization already received.</h4><p>Close browser window.</p>");
    };

    let denied = params.iter().any(|(key, _)| key == "error");
    if sender.send(query).is_err() {
        return Html("<h4>Authorization no longer expected.</h4>");
    }

    if denied {
        Html("<h2>Authorization denied.</h2><p>Return to the terminal.</p>")
    } else {
        Html("<h2>Authorization received.</h2><p>Close browser window and return to the terminal.</p>")
    }
}
