use std::{fmt, future::Future};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::{config::PushoverConfig, monitor::Notifier};

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub reason: String,
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user={} {}", self.recipient, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no notification recipients configured")]
    NoRecipients,
    #[error("pushover failures:\n{}", render_failures(.0))]
    Delivery(Vec<DeliveryFailure>),
}

fn render_failures(failures: &[DeliveryFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Caps `message` at `max_chars` characters, ending in `...` when cut.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return message.chars().take(max_chars).collect();
    }
    let mut truncated: String = message.chars().take(max_chars - ELLIPSIS.len()).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Sends to every recipient in turn and reports all failures together.
/// Successful sends are kept even when others fail.
pub async fn broadcast<F, Fut>(recipients: &[String], send: F) -> Result<usize, NotifyError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    if recipients.is_empty() {
        return Err(NotifyError::NoRecipients);
    }

    let mut delivered = 0;
    let mut failures = Vec::new();
    for recipient in recipients {
        match send(recipient.clone()).await {
            Ok(()) => delivered += 1,
            Err(reason) => {
                tracing::warn!(target: "notify", recipient = %recipient, %reason, "push delivery failed");
                failures.push(DeliveryFailure {
                    recipient: recipient.clone(),
                    reason,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(delivered)
    } else {
        Err(NotifyError::Delivery(failures))
    }
}

#[derive(Clone)]
pub struct PushoverNotifier {
    http: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    pub fn new(http: Client, config: PushoverConfig) -> Self {
        Self { http, config }
    }

    async fn send_one(&self, user: &str, title: &str, message: &str) -> Result<(), String> {
        let params = [
            ("token", self.config.app_token.as_str()),
            ("user", user),
            ("message", message),
            ("title", title),
        ];
        let response = self
            .http
            .post(&self.config.api_url)
            .timeout(self.config.timeout)
            .form(&params)
            .send()
            .await
            .map_err(|err| format!("exception={err}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("status={} body={}", status.as_u16(), body));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        let message = truncate_message(message, self.config.max_chars);
        let message = message.as_str();
        let delivered = broadcast(&self.config.user_keys, |user| async move {
            self.send_one(&user, title, message).await
        })
        .await?;
        tracing::info!(target: "notify", delivered, title, "push notification sent");
        Ok(())
    }
}
