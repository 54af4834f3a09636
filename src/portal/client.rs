//! MyFuelPortal HTTP Client
//!
//! The portal has no API. Tank data sits behind an ASP.NET login form, so every
//! scrape cycle goes through the same browser-like sequence.
//!
//! # Login Handshake
//!
//! 1. `GET /Account/Login?ReturnUrl=%2F` to obtain the `__RequestVerificationToken`
//!    hidden input and the anti-forgery cookie
//! 2. `POST` the credential form with that token through the same cookie jar
//! 3. Inspect the final URL after redirects: landing back on the login route
//!    means the credentials were rejected
//!
//! The resulting [`Session`] is then used for `GET /Tank`.
//!
//! # Example
//!
//! ```no_run
//! use fuelportal_exporter::portal::{Credentials, PortalClient};
//! use secrecy::SecretString;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PortalClient::new("https://acme.myfuelportal.com", Duration::from_secs(10));
//! let credentials = Credentials::new("me@example.com", SecretString::from("secret"));
//!
//! let session = client.authenticate(&credentials).await?;
//! let html = client.fetch_data(&session).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::PortalConfig;
use crate::error::{AuthError, FetchError};
use crate::portal::types::Credentials;
use scraper::{Html, Selector};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const LOGIN_PATH: &str = "/Account/Login";
pub const LOGIN_URL_PATH: &str = "/Account/Login?ReturnUrl=%2F";
pub const DATA_PATH: &str = "/Tank";
const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Stateless client for one portal; each login creates its own [`Session`]
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
    timeout: Duration,
}

/// An authenticated connection: a cookie-carrying HTTP client bound to a portal.
///
/// Owned by the cycle that created it and dropped with it.
pub struct Session {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_URL_PATH)
    }

    /// Log in and return a session holding the portal's auth cookies
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .user_agent(concat!("fuelportal-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::PageUnavailable(e.to_string()))?;

        let login_url = self.login_url();
        debug!("Fetching login page {}", login_url);

        let login_page = http
            .get(&login_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AuthError::PageUnavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| AuthError::PageUnavailable(e.to_string()))?;

        let token = extract_token(&login_page).ok_or(AuthError::TokenMissing)?;

        let form = [
            ("EmailAddress", credentials.username.as_str()),
            ("Password", credentials.password.expose_secret()),
            ("RememberMe", "false"),
            (TOKEN_FIELD, token.as_str()),
        ];

        let resp = http
            .post(&login_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::PageUnavailable(e.to_string()))?;

        if resp.url().path().contains(LOGIN_PATH) {
            warn!("Portal redirected back to the login page");
            return Err(AuthError::InvalidCredentials);
        }

        info!("Logged in to {}", self.base_url);
        Ok(Session {
            http,
            base_url: self.base_url.clone(),
        })
    }

    /// Fetch the raw tank page HTML
    pub async fn fetch_data(&self, session: &Session) -> Result<String, FetchError> {
        let url = format!("{}{}", session.base_url, DATA_PATH);
        debug!("Fetching tank page {}", url);

        let resp = session
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "tank page returned HTTP {}",
                status
            )));
        }
        if resp.url().path().contains(LOGIN_PATH) {
            return Err(FetchError::Unavailable(
                "session was redirected to the login page".to_string(),
            ));
        }

        resp.text()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))
    }
}

/// Value of the login form's anti-forgery hidden input
pub fn extract_token(html: &str) -> Option<String> {
    let selector = Selector::parse(&format!("input[name=\"{}\"]", TOKEN_FIELD)).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}
