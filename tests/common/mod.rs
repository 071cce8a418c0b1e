//! Shared test fixtures: a mock sensor backend and a scripted reading source.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use climinha::error::{AppError, AppResult};
use climinha::sensor::{Reading, ReadingSource};

#[derive(Debug, Clone)]
pub enum MockReply {
    Readings(Vec<Reading>),
    Status(StatusCode),
    Raw(String),
}

type MockState = (Arc<Mutex<MockReply>>, Arc<AtomicUsize>);

/// Sensor backend served by axum on an ephemeral local port.
pub struct MockSensor {
    pub base_url: String,
    reply: Arc<Mutex<MockReply>>,
    hits: Arc<AtomicUsize>,
}

impl MockSensor {
    pub async fn start(path: &str, reply: MockReply) -> Self {
        let reply = Arc::new(Mutex::new(reply));
        let hits = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route(path, get(serve_reply))
            .with_state((Arc::clone(&reply), Arc::clone(&hits)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            reply,
            hits,
        }
    }

    pub fn set_reply(&self, reply: MockReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve_reply(State((reply, hits)): State<MockState>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let reply = reply.lock().unwrap().clone();

    match reply {
        MockReply::Readings(readings) => Json(readings).into_response(),
        MockReply::Status(status) => (status, "sensor offline").into_response(),
        MockReply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    }
}

/// Reading source that replays a fixed script of `(delay, result)` steps.
/// Once the script runs out every call returns an empty list immediately.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<(Duration, AppResult<Vec<Reading>>)>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(steps: Vec<(Duration, AppResult<Vec<Reading>>)>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReadingSource for ScriptedSource {
    async fn fetch_readings(&self) -> AppResult<Vec<Reading>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(Vec::new()),
        }
    }
}

pub fn upstream_error(msg: &str) -> AppError {
    AppError::Upstream(msg.to_string())
}
