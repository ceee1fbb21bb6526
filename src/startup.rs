use reqwest::Client;

use crate::{
    bot::{CycleOutcome, StatusBot},
    config::{Config, Credentials},
    errors::StartupError,
    notifier::{telegram_bot, Messenger, Notifier},
    review::{HomeworkApi, PracticumClient},
};

pub struct Application {
    bot: StatusBot,
}

impl Application {
    /// Checks the credentials and wires the production HTTP clients.
    ///
    /// # Errors
    /// Returns an error if a required secret is missing, the HTTP client
    /// cannot be built or the Bot API url does not parse. Nothing is fetched
    /// in any of these cases.
    pub fn build(config: &Config) -> Result<Self, StartupError> {
        let credentials = config.credentials()?;

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StartupError::HttpClient)?;
        let api = PracticumClient::new(
            client,
            &config.practicum.endpoint,
            credentials.practicum_token.clone(),
        );
        let messenger = telegram_bot(&credentials.telegram_token, &config.telegram.api_url)?;

        Ok(Self::assemble(config, credentials, api, messenger))
    }

    /// Same as [`Application::build`] with caller supplied clients
    pub fn build_with(
        config: &Config,
        api: impl HomeworkApi + 'static,
        messenger: impl Messenger + 'static,
    ) -> Result<Self, StartupError> {
        let credentials = config.credentials()?;
        Ok(Self::assemble(config, credentials, api, messenger))
    }

    fn assemble(
        config: &Config,
        credentials: Credentials,
        api: impl HomeworkApi + 'static,
        messenger: impl Messenger + 'static,
    ) -> Self {
        let notifier = Notifier::new(messenger, credentials.chat_id);
        let bot = StatusBot::new(api, notifier, config.polling.retry_interval())
            .with_timestamp(config.polling.from_date)
            .with_advance_cursor(config.polling.advance_cursor);

        Self { bot }
    }

    pub async fn cycle(&mut self) -> CycleOutcome {
        self.bot.cycle().await
    }

    pub async fn run(self) {
        self.bot.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, PollingConfig, PracticumConfig, TelegramConfig};
    use crate::test_utils::{MockHomeworkApi, MockMessenger};
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sent_message(text: &str) -> serde_json::Value {
        json!({
            "ok": true,
            "result": {
                "message_id": 7,
                "chat": { "id": 42, "first_name": "Student", "type": "private" },
                "date": 1700000000,
                "text": text
            }
        })
    }

    fn test_config(endpoint: &str, api_url: &str) -> Config {
        Config {
            practicum: PracticumConfig {
                token: Some(SecretString::from("practicum-token".to_string())),
                endpoint: endpoint.to_string(),
            },
            telegram: TelegramConfig {
                token: Some(SecretString::from("123:abc".to_string())),
                chat_id: Some("42".to_string()),
                api_url: api_url.to_string(),
            },
            polling: PollingConfig {
                retry_time: 600,
                from_date: 0,
                advance_cursor: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }

    #[test]
    fn test_missing_secret_never_fetches() {
        let api = MockHomeworkApi::default();
        let messenger = MockMessenger::default();
        let mut config = test_config("http://localhost/", "http://localhost");
        config.telegram.chat_id = None;

        for _ in 0..3 {
            let result = Application::build_with(&config, api.clone(), messenger.clone());
            assert!(matches!(
                result,
                Err(StartupError::MissingCredentials(ref missing)) if missing == &["TELEGRAM_CHAT_ID"]
            ));
        }

        assert_eq!(api.calls(), 0);
        assert_eq!(messenger.attempts(), 0);
    }

    #[test]
    fn test_build_requires_every_secret() {
        let mut config = test_config("http://localhost/", "http://localhost");
        config.practicum.token = None;
        config.telegram.token = None;

        match Application::build(&config) {
            Err(StartupError::MissingCredentials(missing)) => {
                assert_eq!(missing, vec!["PRACTICUM_TOKEN", "TELEGRAM_TOKEN"])
            }
            Err(e) => panic!("Unexpected error: {e}"),
            Ok(_) => panic!("Application should not start without credentials"),
        }
    }

    #[tokio::test]
    async fn test_status_change_end_to_end() {
        let review_server = MockServer::start().await;
        let telegram_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user_api/homework_statuses/"))
            .and(header("Authorization", "OAuth practicum-token"))
            .and(query_param("from_date", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "homeworks": [{ "status": "approved", "homework_name": "proj1" }],
                "current_date": 100
            })))
            .expect(1)
            .mount(&review_server)
            .await;

        let expected = "Changed review status for \"proj1\". Review checked: reviewer liked everything. Hooray!";
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot123:abc/sendmessage$"))
            .and(body_partial_json(json!({ "chat_id": 42, "text": expected })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message(expected)))
            .expect(1)
            .mount(&telegram_server)
            .await;

        let config = test_config(
            &format!("{}/api/user_api/homework_statuses/", review_server.uri()),
            &telegram_server.uri(),
        );
        let mut app = Application::build(&config).unwrap();

        let outcome = app.cycle().await;

        assert_eq!(outcome, CycleOutcome::Notified(expected.to_string()));
    }

    #[test]
    fn test_invalid_bot_api_url() {
        let config = test_config("http://localhost/", "telegram");
        assert!(matches!(
            Application::build(&config),
            Err(StartupError::InvalidApiUrl { ref url, .. }) if url == "telegram"
        ));
    }

    #[tokio::test]
    async fn test_endpoint_failure_end_to_end() {
        let review_server = MockServer::start().await;
        let telegram_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "not_authenticated",
                "message": "Invalid credentials"
            })))
            .mount(&review_server)
            .await;

        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot123:abc/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message("report")))
            .expect(1)
            .mount(&telegram_server)
            .await;

        let config = test_config(
            &format!("{}/homework_statuses/", review_server.uri()),
            &telegram_server.uri(),
        );
        let mut app = Application::build(&config).unwrap();

        let outcome = app.cycle().await;

        let CycleOutcome::Reported(report) = outcome else {
            panic!("Expected a failure report, got {outcome:?}");
        };
        assert!(report.contains("401 Unauthorized"));
    }
}
