//! Local stand-in for a MyFuelPortal provider site.
//!
//! Serves the login form, checks the anti-forgery token and cookies on login,
//! and guards `/Tank` behind the auth cookie the way the real portal does.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use fuelportal_exporter::portal::{Credentials, PortalClient};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USERNAME: &str = "owner@example.com";
pub const PASSWORD: &str = "correct horse battery";
pub const TOKEN: &str = "csrf-token-123";

pub const TANK_PAGE: &str = include_str!("../fixtures/tank_page.html");

pub const LOGIN_PAGE: &str = r#"<html><body>
<form action="/Account/Login?ReturnUrl=%2F" method="post">
  <input value="csrf-token-123" type="hidden" name="__RequestVerificationToken" />
  <input type="email" name="EmailAddress" />
  <input type="password" name="Password" />
  <input type="checkbox" name="RememberMe" value="true" />
</form>
</body></html>"#;

pub const LOGIN_PAGE_WITHOUT_TOKEN: &str = r#"<html><body>
<form action="/Account/Login" method="post">
  <input type="email" name="EmailAddress" />
  <input type="password" name="Password" />
</form>
</body></html>"#;

pub struct PortalState {
    pub login_page: Mutex<String>,
    pub login_status: AtomicU16,
    pub tank_page: Mutex<String>,
    pub tank_status: AtomicU16,
    pub tank_delay_ms: AtomicU64,
    pub login_posts: AtomicUsize,
    pub tank_fetches: AtomicUsize,
}

pub struct MockPortal {
    pub base_url: String,
    pub state: Arc<PortalState>,
}

impl MockPortal {
    pub async fn start() -> Self {
        let state = Arc::new(PortalState {
            login_page: Mutex::new(LOGIN_PAGE.to_string()),
            login_status: AtomicU16::new(200),
            tank_page: Mutex::new(TANK_PAGE.to_string()),
            tank_status: AtomicU16::new(200),
            tank_delay_ms: AtomicU64::new(0),
            login_posts: AtomicUsize::new(0),
            tank_fetches: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/", get(home))
            .route("/Account/Login", get(login_form).post(login_submit))
            .route("/Tank", get(serve_tank_page))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock portal");
        let addr = listener.local_addr().expect("mock portal addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock portal");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> PortalClient {
        PortalClient::new(self.base_url.clone(), Duration::from_secs(5))
    }

    pub fn set_login_page(&self, html: &str) {
        *self.state.login_page.lock().unwrap() = html.to_string();
    }

    pub fn set_login_status(&self, status: u16) {
        self.state.login_status.store(status, Ordering::SeqCst);
    }

    pub fn set_tank_page(&self, html: &str) {
        *self.state.tank_page.lock().unwrap() = html.to_string();
    }

    pub fn set_tank_status(&self, status: u16) {
        self.state.tank_status.store(status, Ordering::SeqCst);
    }

    /// Hold every `/Tank` response back so cycles stay in flight
    pub fn set_tank_delay(&self, delay: Duration) {
        self.state
            .tank_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn login_posts(&self) -> usize {
        self.state.login_posts.load(Ordering::SeqCst)
    }

    pub fn tank_fetches(&self) -> usize {
        self.state.tank_fetches.load(Ordering::SeqCst)
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(USERNAME, SecretString::from(PASSWORD))
}

pub fn wrong_credentials() -> Credentials {
    Credentials::new(USERNAME, SecretString::from("wrong password"))
}

/// Page with one tank block per `(name, percent, gallons, reading date)`
pub fn tank_page(tanks: &[(&str, &str, &str, &str)]) -> String {
    let blocks: String = tanks
        .iter()
        .map(|(name, percent, gallons, date)| {
            format!(
                r#"<div class="row tank-row">
  <span class="text-larger">{name}</span>
  <div class="progress-bar">{percent}</div>
  <p>Approximately {gallons} gallons</p>
  <p>Reading Date: {date}</p>
</div>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", blocks)
}

fn has_cookie(headers: &HeaderMap, cookie: &str) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').any(|c| c.trim() == cookie))
        .unwrap_or(false)
}

async fn home() -> Html<&'static str> {
    Html("<html><body>Welcome</body></html>")
}

async fn login_form(State(state): State<Arc<PortalState>>) -> Response {
    let status = StatusCode::from_u16(state.login_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !status.is_success() {
        return (status, "login unavailable").into_response();
    }
    let page = state.login_page.lock().unwrap().clone();
    (
        [(header::SET_COOKIE, "antiforgery=af1; Path=/")],
        Html(page),
    )
        .into_response()
}

async fn login_submit(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.login_posts.fetch_add(1, Ordering::SeqCst);

    let field = |name: &str| form.get(name).map(String::as_str);
    let accepted = field("EmailAddress") == Some(USERNAME)
        && field("Password") == Some(PASSWORD)
        && field("RememberMe") == Some("false")
        && field("__RequestVerificationToken") == Some(TOKEN)
        && has_cookie(&headers, "antiforgery=af1");

    if accepted {
        (
            [(header::SET_COOKIE, "auth=ok; Path=/")],
            Redirect::to("/"),
        )
            .into_response()
    } else {
        Redirect::to("/Account/Login?ReturnUrl=%2F").into_response()
    }
}

async fn serve_tank_page(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    state.tank_fetches.fetch_add(1, Ordering::SeqCst);

    let delay = state.tank_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if !has_cookie(&headers, "auth=ok") {
        return Redirect::to("/Account/Login?ReturnUrl=%2FTank").into_response();
    }
    let status = StatusCode::from_u16(state.tank_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !status.is_success() {
        return (status, "server error").into_response();
    }
    Html(state.tank_page.lock().unwrap().clone()).into_response()
}
