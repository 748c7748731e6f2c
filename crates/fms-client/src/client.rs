use std::sync::Arc;

use fms_core::config::{Config, Endpoints};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::request::UpstreamRequest;
use crate::Result;

const ACCEPT_ANY: &str = "application/json, text/plain, */*";

/// Authenticated FMS client.
///
/// Owns the credential cache. Concurrent callers may both trigger a login
/// when the cache is cold or stale; the upstream issues equally valid tokens
/// either way, so refreshes are not serialized.
pub struct FmsClient {
    http: reqwest::Client,
    config: Config,
    endpoints: Endpoints,
    clock: Arc<dyn Clock>,
    credentials: RwLock<Option<Credentials>>,
}

impl FmsClient {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let endpoints = config.endpoints();
        Ok(Self {
            http,
            config,
            endpoints,
            clock,
            credentials: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Return cached credentials, logging in when the cache is empty, older
    /// than the configured TTL, or `force_refresh` is set.
    pub async fn acquire_credentials(&self, force_refresh: bool) -> Result<Credentials> {
        if !force_refresh {
            let now = self.clock.now();
            if let Some(creds) = self.credentials.read().await.as_ref() {
                if creds.is_fresh(now, self.config.token_ttl()) {
                    return Ok(creds.clone());
                }
            }
        }

        let creds = self.login().await?;
        *self.credentials.write().await = Some(creds.clone());
        Ok(creds)
    }

    /// Drop cached credentials so the next call logs in again. Rejected
    /// credentials are dropped before the refresh, so a failed refresh
    /// leaves the cache empty.
    pub async fn invalidate(&self) {
        *self.credentials.write().await = None;
    }

    async fn login(&self) -> Result<Credentials> {
        debug!(url = %self.endpoints.login, "logging in to FMS");
        let resp = self
            .http
            .post(&self.endpoints.login)
            .header(CONTENT_TYPE, "application/json")
            .header("fms-client", &self.config.client_name)
            .json(&json!({
                "account": self.config.account.user,
                "password": self.config.account.password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "FMS login rejected");
            return Err(ClientError::Auth(format!("login rejected with HTTP {status}")));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("login response was not JSON: {e}")))?;
        let creds = Credentials::from_login_response(&body, self.clock.now())?;
        info!("FMS login succeeded");
        Ok(creds)
    }

    /// Send `request` with credentials attached.
    ///
    /// A 401 or 403 triggers exactly one forced refresh and one retry. The
    /// response to the retry is returned as-is, whatever its status.
    pub async fn call(&self, request: &UpstreamRequest) -> Result<reqwest::Response> {
        let mut refreshed = false;
        loop {
            let creds = self.acquire_credentials(refreshed).await?;
            let resp = self.send(request, &creds).await?;
            let status = resp.status();

            if is_auth_failure(status) && !refreshed {
                warn!(%status, url = %request.url, "FMS rejected credentials, refreshing once");
                self.invalidate().await;
                refreshed = true;
                continue;
            }
            if is_auth_failure(status) {
                warn!(%status, url = %request.url, "FMS rejected refreshed credentials");
            }
            return Ok(resp);
        }
    }

    async fn send(&self, request: &UpstreamRequest, creds: &Credentials) -> Result<reqwest::Response> {
        let resp = request
            .build(&self.http)?
            .header(ACCEPT, ACCEPT_ANY)
            .header(AUTHORIZATION, creds.authorization())
            .header("fms-token", &creds.primary_token)
            .header("fms-client", &self.config.client_name)
            .header("company-id", &self.config.company_id)
            .send()
            .await?;
        debug!(method = %request.method, url = %request.url, status = %resp.status(), "FMS call");
        Ok(resp)
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

impl std::fmt::Debug for FmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmsClient")
            .field("base_url", &self.config.base_url)
            .field("company_id", &self.config.company_id)
            .finish()
    }
}
