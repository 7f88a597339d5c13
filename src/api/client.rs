//! API client for the LibreLinkUp REST API.
//!
//! Three calls are made per run: login, connections and graph. Every call
//! checks the HTTP status first, then the `status` field of the JSON
//! envelope.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::SessionData;
use crate::config::{base_url_for, resolve_redirect, BASE_URL_TEMPLATE};
use crate::models::{Connection, GlucoseItem, GraphData};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Product identifier the API expects from the Android LibreLinkUp app
const PRODUCT: &str = "llu.android";

/// Client version string; older versions are rejected by the API
const CLIENT_VERSION: &str = "4.16.0";

const USER_AGENT: &str = "LibreLinkUpTest/1.0";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 20;

const LOGIN_PATH: &str = "/llu/auth/login";
const CONNECTIONS_PATH: &str = "/llu/connections";

/// `{status, data}` wrapper around every response.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: Option<i64>,
    #[serde(default)]
    data: serde_json::Value,
}

impl Envelope {
    fn is_ok(&self) -> bool {
        self.status == Some(0)
    }

    /// Deserialize `data`, treating a missing or null payload as `T::default()`
    fn data_as<T: DeserializeOwned + Default>(&self) -> serde_json::Result<T> {
        if self.data.is_null() {
            Ok(T::default())
        } else {
            T::deserialize(&self.data)
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginData {
    redirect: Option<bool>,
    region: Option<String>,
    #[serde(rename = "authTicket")]
    auth_ticket: Option<AuthTicket>,
    user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
struct AuthTicket {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: Option<String>,
}

/// API client for LibreLinkUp.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url_template: String,
}

impl ApiClient {
    /// Create a new API client against the public regional hosts
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url_template: BASE_URL_TEMPLATE.to_string(),
        })
    }

    /// Replace the base URL template. `{region}` is substituted with the
    /// region code on login and on region redirects.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn base_url_for_region(&self, region: &str) -> String {
        base_url_for(&self.url_template, region)
    }

    /// Headers sent on every request
    fn base_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("product"), HeaderValue::from_static(PRODUCT));
        headers.insert(
            HeaderName::from_static("version"),
            HeaderValue::from_static(CLIENT_VERSION),
        );
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers
    }

    fn auth_headers(session: &SessionData) -> Result<HeaderMap> {
        let mut headers = Self::base_headers();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&session.bearer())?);
        headers.insert(
            HeaderName::from_static("account-id"),
            HeaderValue::from_str(&session.account_id)?,
        );
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Read the body and parse the envelope. The raw body is returned too so
    /// failures can quote it.
    async fn read_envelope(response: reqwest::Response, what: &str) -> Result<(Envelope, String)> {
        let response = Self::check_response(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", what))?;
        let envelope: Envelope = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {} response", what))?;
        Ok((envelope, text))
    }

    async fn post_login(&self, base_url: &str, email: &str, password: &str) -> Result<(Envelope, String)> {
        let url = format!("{}{}", base_url, LOGIN_PATH);
        debug!(url = %url, "Sending login request");

        let response = self
            .client
            .post(&url)
            .headers(Self::base_headers())
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(ApiError::from)?;

        let (envelope, body) = Self::read_envelope(response, "login").await?;
        debug!(status = ?envelope.status, "Login response received");
        Ok((envelope, body))
    }

    async fn get_envelope(&self, url: &str, session: &SessionData, what: &str) -> Result<(Envelope, String)> {
        let response = self
            .client
            .get(url)
            .headers(Self::auth_headers(session)?)
            .send()
            .await
            .map_err(ApiError::from)?;

        Self::read_envelope(response, what).await
    }

    /// Log in and return session data.
    ///
    /// A successful response that asks for a region redirect is retried once
    /// against the redirected host; that host becomes the session's base URL.
    pub async fn authenticate(&self, base_url: &str, email: &str, password: &str) -> Result<SessionData> {
        let mut base_url = base_url.to_string();
        let (mut envelope, mut body) = self.post_login(&base_url, email, password).await?;

        if envelope.is_ok() {
            let redirect: LoginData = envelope
                .data_as()
                .context("Failed to parse login response")?;

            if redirect.redirect.unwrap_or(false) {
                let region = redirect
                    .region
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        ApiError::InvalidResponse("Login redirect without a region".to_string())
                    })?;
                base_url = resolve_redirect(&self.url_template, &region);
                info!(region = %region, base_url = %base_url, "Login redirected");
                (envelope, body) = self.post_login(&base_url, email, password).await?;
            }
        }

        if !envelope.is_ok() {
            let status = envelope
                .status
                .map_or_else(|| "none".to_string(), |s| s.to_string());
            return Err(ApiError::Authentication(format!(
                "status {}: {}",
                status,
                ApiError::truncate_body(&body)
            ))
            .into());
        }

        let data: LoginData = envelope
            .data_as()
            .context("Failed to parse login response")?;
        let token = data.auth_ticket.and_then(|t| t.token).filter(|t| !t.is_empty());
        let user_id = data.user.and_then(|u| u.id).filter(|id| !id.is_empty());

        match (token, user_id) {
            (Some(token), Some(user_id)) => Ok(SessionData::new(token, user_id, base_url)),
            _ => Err(ApiError::Authentication(
                "Login response missing token or user id".to_string(),
            )
            .into()),
        }
    }

    /// Fetch the first patient connection. Further connections are ignored.
    pub async fn fetch_connection(&self, session: &SessionData) -> Result<Connection> {
        let url = format!("{}{}", session.base_url, CONNECTIONS_PATH);
        let (envelope, body) = self.get_envelope(&url, session, "connections").await?;

        if !envelope.is_ok() {
            return Err(ApiError::status("Connections", envelope.status, &body).into());
        }

        let connections: Vec<Connection> = envelope
            .data_as()
            .context("Failed to parse connections response")?;
        debug!(count = connections.len(), "Connections received");

        connections
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NoData("No connections returned".to_string()).into())
    }

    /// Fetch the graph for a patient and pick its most recent measurement.
    pub async fn fetch_latest_measurement(&self, session: &SessionData, patient_id: &str) -> Result<GlucoseItem> {
        let url = format!("{}{}/{}/graph", session.base_url, CONNECTIONS_PATH, patient_id);
        let (envelope, body) = self.get_envelope(&url, session, "graph").await?;

        if !envelope.is_ok() {
            return Err(ApiError::status("Graph", envelope.status, &body).into());
        }

        let graph: GraphData = envelope
            .data_as()
            .context("Failed to parse graph response")?;
        debug!(points = graph.point_count(), "Graph data received");

        graph
            .connection
            .as_ref()
            .and_then(Connection::latest_measurement)
            .cloned()
            .ok_or_else(|| ApiError::NoData("No glucose measurement available".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_headers() {
        let headers = ApiClient::base_headers();
        assert_eq!(headers["product"], "llu.android");
        assert_eq!(headers["version"], "4.16.0");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::USER_AGENT], "LibreLinkUpTest/1.0");
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert!(headers.get("account-id").is_none());
    }

    #[test]
    fn test_auth_headers() {
        let session = SessionData::new(
            "T".to_string(),
            "U".to_string(),
            "https://api-eu.libreview.io".to_string(),
        );
        let headers = ApiClient::auth_headers(&session).expect("headers should build");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer T");
        assert_eq!(
            headers["account-id"],
            "a25513c7e0f6eaa80a3337ee18081b9e2ed09e00af8531c8f7bb2542764027e7"
        );
        assert_eq!(headers["product"], "llu.android");
    }

    #[test]
    fn test_envelope_data_as() {
        let env: Envelope = serde_json::from_str(r#"{"status": 0}"#).expect("parse");
        assert!(env.is_ok());
        let conns: Vec<Connection> = env.data_as().expect("null data defaults");
        assert!(conns.is_empty());

        let env: Envelope = serde_json::from_str(r#"{"data": {}}"#).expect("parse");
        assert!(!env.is_ok());
    }

    #[test]
    fn test_parse_login_data() {
        let json = r#"{"user": {"id": "U"}, "authTicket": {"token": "T", "expires": 1, "duration": 2}}"#;
        let data: LoginData = serde_json::from_str(json).expect("Failed to parse login data");
        assert_eq!(data.auth_ticket.and_then(|t| t.token).as_deref(), Some("T"));
        assert_eq!(data.user.and_then(|u| u.id).as_deref(), Some("U"));
        assert!(data.redirect.is_none());
    }

    #[test]
    fn test_base_url_for_region() {
        let client = ApiClient::new()
            .expect("client should build")
            .with_url_template("http://127.0.0.1:9/api-{region}");
        assert_eq!(client.base_url_for_region("us"), "http://127.0.0.1:9/api-us");
    }
}
