use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use teloxide::{
    prelude::*,
    types::{ChatId, Recipient},
};
use tracing::{error, info};
use url::Url;

use crate::errors::{SendMessageError, StartupError};

/// Interface for delivering text messages to a chat
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), SendMessageError>;
}

/// Telegram bot talking to the Bot API at `api_url`
pub fn telegram_bot(token: &SecretString, api_url: &str) -> Result<Bot, StartupError> {
    let url = Url::parse(api_url).map_err(|source| StartupError::InvalidApiUrl {
        url: api_url.to_string(),
        source,
    })?;
    Ok(Bot::new(token.expose_secret()).set_api_url(url))
}

// Numeric ids address users and groups, anything else a public channel
fn recipient(chat_id: &str) -> Recipient {
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Messenger for Bot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), SendMessageError> {
        Requester::send_message(self, recipient(chat_id), text).await?;
        Ok(())
    }
}

/// Sends messages to the configured chat, logging the outcome.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
    chat_id: String,
}

impl Notifier {
    pub fn new(messenger: impl Messenger + 'static, chat_id: impl Into<String>) -> Self {
        Self {
            messenger: Arc::new(messenger),
            chat_id: chat_id.into(),
        }
    }

    /// Delivers `message` and hands it back.
    ///
    /// Delivery failures are logged and swallowed, the returned value is the
    /// same whether or not the chat received the message.
    pub async fn notify(&self, message: &str) -> String {
        match self.messenger.send_message(&self.chat_id, message).await {
            Ok(()) => info!("Message sent successfully: {message}"),
            Err(e) => error!("Failed to send message to Telegram: {e}"),
        }
        message.to_string()
    }
}
