#![allow(dead_code)]

use std::collections::HashMap;

use axum::{Form, Router, http::StatusCode, routing::post};
use tokio::net::TcpListener;

/// Start a stand-in for the upstream chat service on an ephemeral port and
/// return its base URL. `reply` receives the decoded form fields.
pub async fn spawn_upstream<F>(reply: F) -> String
where
    F: Fn(HashMap<String, String>) -> (StatusCode, String) + Clone + Send + Sync + 'static,
{
    let app = Router::new().route(
        "/chat_text",
        post(move |Form(fields): Form<HashMap<String, String>>| {
            let reply = reply.clone();
            async move { reply(fields) }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub async fn spawn_fixed_upstream(status: StatusCode, body: &'static str) -> String {
    spawn_upstream(move |_| (status, body.to_string())).await
}

/// Nothing listens here, so every request fails at the transport level.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";
