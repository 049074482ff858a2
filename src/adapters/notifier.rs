//! Notification channels. The variant is picked once, when the application is
//! assembled from configuration.

use crate::config::{NotifierConfig, NotifierKind};
use crate::domain::ports::Notifier;
use crate::utils::error::{CityInfoError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::runtime::Handle;

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LocalNotifier {
    mail_from: String,
    mail_to: String,
    mail_server: String,
}

impl LocalNotifier {
    pub fn new(mail_from: String, mail_to: String, mail_server: String) -> Self {
        Self {
            mail_from,
            mail_to,
            mail_server,
        }
    }

    fn log(&self, subject: &str, message: &str) {
        tracing::info!(
            "Mail from {} to {}, using LocalNotifier - server: {}.",
            self.mail_from,
            self.mail_to,
            self.mail_server
        );
        tracing::info!("Subject: {}", subject);
        tracing::info!("Message: {}", message);
    }
}

#[async_trait]
impl Notifier for LocalNotifier {
    fn send(&self, subject: &str, message: &str) {
        self.log(subject, message);
    }

    async fn send_async(&self, subject: &str, message: &str) {
        self.log(subject, message);
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailMessage {
    from: String,
    to: String,
    subject: String,
    message: String,
    sent_at: DateTime<Utc>,
}

/// Posts each message as JSON to a mail relay endpoint.
///
/// `send` called from inside a tokio runtime hands delivery to that runtime
/// instead of blocking it; outside a runtime it delivers before returning.
#[derive(Debug)]
pub struct CloudNotifier {
    endpoint: String,
    mail_from: String,
    mail_to: String,
    timeout: Duration,
    client: Client,
    // Built on first blocking delivery; building or dropping it inside a
    // runtime panics.
    blocking_client: OnceLock<reqwest::blocking::Client>,
}

impl CloudNotifier {
    pub fn new(endpoint: String, mail_from: String, mail_to: String, timeout: Duration) -> Result<Self> {
        validate_url("notifier.endpoint", &endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            mail_from,
            mail_to,
            timeout,
            client,
            blocking_client: OnceLock::new(),
        })
    }

    fn payload(&self, subject: &str, message: &str) -> MailMessage {
        MailMessage {
            from: self.mail_from.clone(),
            to: self.mail_to.clone(),
            subject: subject.to_string(),
            message: message.to_string(),
            sent_at: Utc::now(),
        }
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.blocking_client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(self.blocking_client.get_or_init(|| client))
    }

    /// Blocking delivery. Refused on an async runtime thread.
    pub fn try_send(&self, subject: &str, message: &str) -> Result<()> {
        if Handle::try_current().is_ok() {
            return Err(CityInfoError::NotificationError {
                message: "blocking delivery is not available inside an async runtime".to_string(),
            });
        }
        self.blocking_client()?
            .post(&self.endpoint)
            .json(&self.payload(subject, message))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    pub async fn try_send_async(&self, subject: &str, message: &str) -> Result<()> {
        post(&self.client, &self.endpoint, &self.payload(subject, message)).await
    }
}

async fn post(client: &Client, endpoint: &str, payload: &MailMessage) -> Result<()> {
    client
        .post(endpoint)
        .json(payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn report(endpoint: &str, subject: &str, result: Result<()>) {
    match result {
        Ok(()) => tracing::debug!("Notification '{}' delivered to {}", subject, endpoint),
        Err(e) => tracing::error!(
            endpoint = %endpoint,
            error = %e,
            "Notification '{}' could not be delivered",
            subject
        ),
    }
}

#[async_trait]
impl Notifier for CloudNotifier {
    fn send(&self, subject: &str, message: &str) {
        match Handle::try_current() {
            Ok(handle) => {
                let client = self.client.clone();
                let endpoint = self.endpoint.clone();
                let payload = self.payload(subject, message);
                handle.spawn(async move {
                    let result = post(&client, &endpoint, &payload).await;
                    report(&endpoint, &payload.subject, result);
                });
            }
            Err(_) => report(&self.endpoint, subject, self.try_send(subject, message)),
        }
    }

    async fn send_async(&self, subject: &str, message: &str) {
        let result = self.try_send_async(subject, message).await;
        report(&self.endpoint, subject, result);
    }
}

pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    match config.kind {
        NotifierKind::Local => Ok(Arc::new(LocalNotifier::new(
            config.mail_from.clone(),
            config.mail_to.clone(),
            config.mail_server.clone(),
        ))),
        NotifierKind::Cloud => {
            let endpoint = config
                .endpoint
                .clone()
                .ok_or_else(|| CityInfoError::MissingConfigError {
                    field: "notifier.endpoint".to_string(),
                })?;
            Ok(Arc::new(CloudNotifier::new(
                endpoint,
                config.mail_from.clone(),
                config.mail_to.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?))
        }
    }
}
