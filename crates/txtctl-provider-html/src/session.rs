//! Panel login and the authenticated session
//!
//! A [`Session`] owns the HTTP client and its cookie jar. It is created by
//! [`SessionClient::login`] and must be passed unchanged to every later call
//! of the same invocation. Nothing is persisted between invocations.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};
use txtctl_core::config::PanelConfig;
use txtctl_core::traits::Credentials;
use txtctl_core::{Error, Result};

use crate::markers::{
    ACTION_APPROVE_TERMS, ACTION_LOGIN, ACTION_PARAM, AUTH_FAILURE_MARKER, TERMS_PENDING_MARKER,
};

/// User-Agent sent when none is configured
const DEFAULT_USER_AGENT: &str = concat!("txtctl/", env!("CARGO_PKG_VERSION"));

/// An HTML page returned by the panel
#[derive(Debug, Clone)]
pub struct Page {
    status: StatusCode,
    body: String,
}

impl Page {
    /// Create a page from a status and body
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status, kept for diagnostics only
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw HTML body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the body contains a literal marker
    pub fn contains(&self, marker: &str) -> bool {
        self.body.contains(marker)
    }

    async fn read(response: reqwest::Response, action: &str) -> Result<Self> {
        let status = response.status();
        if !status.is_success() {
            // Markers decide the outcome; the status is only reported.
            warn!("Panel action '{}' returned HTTP {}", action, status);
        }

        let body = response.text().await.map_err(|e| {
            Error::transport(format!(
                "failed to read '{}' response (HTTP {}): {}",
                action, status, e
            ))
        })?;

        debug!(
            "Panel action '{}' returned {} bytes (HTTP {})",
            action,
            body.len(),
            status
        );
        Ok(Self { status, body })
    }
}

/// Authenticated panel session
///
/// Holds the cookie jar established at login. Cloning shares the same jar.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
}

impl Session {
    /// Panel endpoint this session talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a GET for a panel action
    pub async fn get(&self, action: &str, query: &[(&str, &str)]) -> Result<Page> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[(ACTION_PARAM, action)])
            .query(query)
            .send()
            .await
            .map_err(|e| Error::transport(format!("'{}' request failed: {}", action, e)))?;

        Page::read(response, action).await
    }

    /// Issue a form POST for a panel action
    pub async fn post_form(&self, action: &str, form: &[(&str, &str)]) -> Result<Page> {
        let response = self
            .http
            .post(self.base_url.clone())
            .query(&[(ACTION_PARAM, action)])
            .form(form)
            .send()
            .await
            .map_err(|e| Error::transport(format!("'{}' request failed: {}", action, e)))?;

        Page::read(response, action).await
    }
}

/// Performs panel logins
#[derive(Debug, Clone)]
pub struct SessionClient {
    base_url: Url,
    timeout: Option<Duration>,
    user_agent: String,
}

impl SessionClient {
    /// Create a login client from panel configuration
    pub fn new(config: &PanelConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::config(format!("panel URL '{}' is invalid: {}", config.base_url, e))
        })?;

        Ok(Self {
            base_url,
            timeout: config.timeout(),
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Build a fresh client with an empty cookie jar
    fn build_http(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(self.user_agent.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {}", e)))
    }

    /// Log in and return the authenticated session
    ///
    /// # Errors
    ///
    /// - `Error::Authentication`: the response carries the login-failure marker
    /// - `Error::TermsNotAccepted`: terms are pending and `accept_terms` is false;
    ///   the approval request is not sent
    /// - `Error::Transport`: the panel could not be reached
    pub async fn login(&self, credentials: &Credentials, accept_terms: bool) -> Result<Session> {
        let session = Session {
            http: self.build_http()?,
            base_url: self.base_url.clone(),
        };

        info!(
            "Logging in to {} as '{}'",
            self.base_url.host_str().unwrap_or("panel"),
            credentials.username
        );

        let page = session
            .post_form(
                ACTION_LOGIN,
                &[
                    ("username", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                ],
            )
            .await?;

        if page.contains(AUTH_FAILURE_MARKER) {
            return Err(Error::auth(format!(
                "panel rejected the login for '{}' (HTTP {})",
                credentials.username,
                page.status()
            )));
        }

        if page.contains(TERMS_PENDING_MARKER) {
            if !accept_terms {
                return Err(Error::terms_not_accepted(format!(
                    "account '{}' has pending terms of service and approval was declined",
                    credentials.username
                )));
            }

            info!("Approving pending terms of service");
            let approval = session.get(ACTION_APPROVE_TERMS, &[]).await?;
            debug!("Terms approval returned HTTP {}", approval.status());
        }

        info!("Logged in as '{}'", credentials.username);
        Ok(session)
    }
}
