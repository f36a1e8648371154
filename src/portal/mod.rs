// src/portal/mod.rs

use crate::error::{RegistrarError, Result};
use crate::model::ResolvedCourse;
use crate::registration::RegistrationRequest;
use crate::storage::Credentials;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, ORIGIN, REFERER};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod html;
pub use html::{extract_csrf_token, extract_form_build_id, is_logged_in};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// An authenticated portal session. Passed explicitly into every call; the
/// client itself keeps no cookies between calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl PortalSession {
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Parses a `Cookie:` header value (`a=1; b=2`) into name/value pairs.
pub fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// The shopping-cart endpoint answers with plain text, not JSON.
    pub fn cart_accepted(&self) -> bool {
        self.status == 200
            && (self.body.contains("Adding to Shopping Cart")
                || self.body.contains("Already in Shopping Cart"))
    }
}

/// The network calls a registration run makes. `Err` means no response was
/// obtained at all.
pub trait Submitter {
    fn add_to_cart(
        &self,
        session: &PortalSession,
        course: &ResolvedCourse,
    ) -> std::result::Result<RawResponse, String>;

    fn register(
        &self,
        session: &PortalSession,
        request: &RegistrationRequest,
    ) -> std::result::Result<RawResponse, String>;
}

/// Blocking HTTP client for the registrar portal.
pub struct RegistrarClient {
    base_url: String,
    accept_invalid_certs: bool,
    client: Client,
}

impl RegistrarClient {
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            accept_invalid_certs,
            client,
        })
    }

    pub fn login_url(&self) -> String {
        format!("{}/user/login", self.base_url)
    }

    pub fn registration_page_url(&self) -> String {
        format!("{}/my-registrar/course-registration", self.base_url)
    }

    pub fn selected_courses_url(&self) -> String {
        format!("{}/selected", self.registration_page_url())
    }

    pub fn api_url(&self) -> String {
        format!("{}/json", self.registration_page_url())
    }

    /// Runs the login form flow and returns the resulting session.
    pub fn login(&self, credentials: &Credentials) -> Result<PortalSession> {
        info!("--- Starting Login Process ---");
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        let form_build_id = self.fetch_form_build_id(&client)?;

        info!("Submitting credentials...");
        let form = [
            ("name", credentials.username.as_str()),
            ("pass", credentials.password.as_str()),
            ("form_build_id", form_build_id.as_str()),
            ("form_id", "user_login"),
            ("op", "Log in"),
        ];
        let landing = client
            .post(self.login_url())
            .form(&form)
            .send()?
            .error_for_status()?
            .text()?;
        if !is_logged_in(&landing) {
            return Err(RegistrarError::Portal(
                "login failed, double-check your credentials".into(),
            ));
        }
        info!("✅ Login successful");

        let csrf_token = self.fetch_csrf_token(&client)?;

        let base = Url::parse(&self.base_url)
            .map_err(|e| RegistrarError::Config(format!("invalid portal URL '{}': {}", self.base_url, e)))?;
        let cookies = jar
            .cookies(&base)
            .and_then(|value| value.to_str().ok().map(parse_cookie_header))
            .unwrap_or_default();
        if cookies.is_empty() {
            warn!("⚠️ Portal set no cookies during login");
        }

        Ok(PortalSession { cookies, csrf_token })
    }

    fn fetch_form_build_id(&self, client: &Client) -> Result<String> {
        let login_page = client.get(self.login_url()).send()?.error_for_status()?.text()?;
        let form_build_id = extract_form_build_id(&login_page)
            .ok_or_else(|| RegistrarError::Portal("form_build_id not found on login page".into()))?;
        debug!(form_build_id = %form_build_id, "Found login form");
        Ok(form_build_id)
    }

    fn fetch_csrf_token(&self, client: &Client) -> Result<String> {
        let registration_page = client
            .get(self.registration_page_url())
            .send()?
            .error_for_status()?
            .text()?;
        extract_csrf_token(&registration_page)
            .ok_or_else(|| RegistrarError::Portal("csrf-token meta tag not found".into()))
    }

    /// Asks the portal whether `session` is still logged in.
    pub fn is_session_valid(&self, session: &PortalSession) -> Result<bool> {
        info!("--- Validating session with the server ---");
        let page = self
            .client
            .get(self.registration_page_url())
            .header(COOKIE, session.cookie_header())
            .send()?
            .error_for_status()?
            .text()?;
        Ok(is_logged_in(&page))
    }
}

impl Submitter for RegistrarClient {
    fn add_to_cart(
        &self,
        session: &PortalSession,
        course: &ResolvedCourse,
    ) -> std::result::Result<RawResponse, String> {
        let form = [
            ("method", "shoppingCartAddRemove"),
            ("instanceid", course.instance_id.as_str()),
            ("action", "1"),
        ];
        let response = self
            .client
            .post(self.api_url())
            .header(COOKIE, session.cookie_header())
            .header("X-Requested-With", "XMLHttpRequest")
            .header("headerval", session.csrf_token.as_str())
            .header(REFERER, self.registration_page_url())
            .header(ORIGIN, self.base_url.as_str())
            .form(&form)
            .send()
            .map_err(|e| e.to_string())?;
        read_response(response)
    }

    fn register(
        &self,
        session: &PortalSession,
        request: &RegistrationRequest,
    ) -> std::result::Result<RawResponse, String> {
        let response = self
            .client
            .get(self.api_url())
            .header(COOKIE, session.cookie_header())
            .header("x-csrf-token", session.csrf_token.as_str())
            .header(REFERER, self.selected_courses_url())
            .query(&request.query())
            .send()
            .map_err(|e| e.to_string())?;
        read_response(response)
    }
}

fn read_response(response: reqwest::blocking::Response) -> std::result::Result<RawResponse, String> {
    let status = response.status().as_u16();
    let body = response.text().map_err(|e| e.to_string())?;
    Ok(RawResponse { status, body })
}
