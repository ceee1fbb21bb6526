use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use teloxide::ApiError;

use crate::{
    errors::{EndpointError, SendMessageError},
    notifier::Messenger,
    review::HomeworkApi,
};

// Mock review service answering from a queue of prepared results
#[derive(Clone, Default)]
pub struct MockHomeworkApi {
    responses: Arc<Mutex<VecDeque<Result<Value, EndpointError>>>>,
    cursors: Arc<Mutex<Vec<i64>>>,
}

impl MockHomeworkApi {
    pub fn with_responses(responses: Vec<Result<Value, EndpointError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            cursors: Arc::default(),
        }
    }

    /// `from_date` values of every fetch, in call order
    pub fn cursors(&self) -> Vec<i64> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl HomeworkApi for MockHomeworkApi {
    async fn fetch(&self, from_date: i64) -> Result<Value, EndpointError> {
        self.cursors.lock().unwrap().push(from_date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "homeworks": [], "current_date": from_date })))
    }
}

// Mock chat recording every delivery attempt
#[derive(Clone, Default)]
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
}

impl MockMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Successfully delivered `(chat_id, text)` pairs
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), SendMessageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SendMessageError::Rejected(ApiError::BotBlocked));
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

pub fn status_error(status: StatusCode) -> EndpointError {
    EndpointError::Status {
        endpoint: "https://practicum.test/api/user_api/homework_statuses/".to_string(),
        status,
    }
}
