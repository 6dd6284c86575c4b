use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("missing {0}")]
    MissingCredential(&'static str),
    /// Carries no request URL; the URL embeds the bot token.
    #[error("could not reach the bot API: {0}")]
    Transport(reqwest::Error),
    #[error("bot API answered {status} with an unreadable body")]
    UnexpectedResponse { status: StatusCode },
    #[error("bot API rejected the message: {description}")]
    Rejected { description: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.without_url())
    }
}

pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Sends plain text messages to one Telegram chat through a bot.
pub struct TelegramNotifier {
    token: Option<String>,
    chat_id: Option<String>,
    client: Client,
    api_base: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, chat_id: Option<String>) -> Self {
        TelegramNotifier { token, chat_id, client: Client::new(), api_base: TELEGRAM_API.to_string() }
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let token = self.token.as_deref().ok_or(NotifyError::MissingCredential("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = self.chat_id.as_deref().ok_or(NotifyError::MissingCredential("TELEGRAM_CHAT_ID"))?;

        let resp = self
            .client
            .post(format!("{}/bot{token}/sendMessage", self.api_base))
            .json(&SendMessage { chat_id, text })
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        let resp: ApiResponse =
            serde_json::from_str(&body).map_err(|_| NotifyError::UnexpectedResponse { status })?;

        if resp.ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                description: resp.description.unwrap_or_else(|| "no description".into()),
            })
        }
    }
}

/// Delivers `text`, logging instead of failing. Returns whether it went out.
pub fn notify(notifier: &dyn Notifier, text: &str) -> bool {
    match notifier.send(text) {
        Ok(()) => {
            info!("Alert delivered");
            true
        }
        Err(e) => {
            warn!(error = %e, "Alert could not be delivered");
            false
        }
    }
}
