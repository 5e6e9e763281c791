use log::{info, warn};
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};

use crate::error::SiteError;

pub const DEFAULT_RELAY: &str = "https://formspree.io/f/xldjndpd";

/// Body of the contact form, relayed as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitted,
    Error,
}

/// Client for the third-party form relay.
#[derive(Debug, Clone)]
pub struct Relay {
    client: Client,
    endpoint: String,
}

impl Relay {
    pub fn new<S: Into<String>>(endpoint: S) -> Result<Self, SiteError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST, no retry. Anything but a 2xx answer is a failure.
    pub async fn submit(&self, form: &ContactForm) -> Result<(), SiteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Form relay rejected message from {}: {status}", form.email);
            return Err(SiteError::RelayStatus(status));
        }

        info!("Relayed contact message from {}", form.email);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use tokio::{net::TcpListener, sync::Mutex};

    use super::ContactForm;

    pub(crate) type Received = Arc<Mutex<Vec<ContactForm>>>;

    /// Local relay answering every submission with `status`.
    pub(crate) async fn spawn_relay(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();

        let router = Router::new()
            .route(
                "/f/test",
                post(
                    move |State(received): State<Received>, Json(form): Json<ContactForm>| async move {
                        received.lock().await.push(form);
                        status
                    },
                ),
            )
            .with_state(Arc::clone(&received));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        (format!("http://{addr}/f/test"), received)
    }
}
