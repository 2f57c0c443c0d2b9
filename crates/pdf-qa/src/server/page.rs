//! The chat page
//!
//! Layout: upload control and status box on the left; chat log, question
//! input and clear button on the right. Each control posts to its route in
//! [`crate::server::routes`].

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET / - the chat page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
