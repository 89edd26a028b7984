//! Session handle for one Densify instance
//!
//! A [`Client`] owns the HTTP connection, the bearer token, the configured
//! query and the analysis ids resolved for it. It is an explicit handle
//! passed by the caller, not process-wide state, and is meant for one
//! sequential configure → resolve → aggregate → match workflow at a time.
//! Every call is a single request/response round trip with no retries.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::models::{Analysis, InstanceGovernance, Recommendation};
use crate::query::ApiQuery;
use crate::recommend;
use crate::resolve;
use crate::Result;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Response of the authorize call. The token is opaque; the expiry is
/// milliseconds since the epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub api_token: String,
    pub expires: i64,
    pub status: i64,
    pub message: String,
}

/// Client for one Densify instance.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    api_token: String,
    token_expiry_ms: i64,

    query: Option<ApiQuery>,
    /// Analysis ids making up the resolved account or cluster, which can
    /// be spread across multiple analyses. Reset by `configure_query`.
    analysis_ids: Vec<String>,
}

impl Client {
    /// Connect to an instance and authenticate.
    ///
    /// `instance_url` may omit the scheme; https is assumed. The API
    /// version path is appended here. `timeout_secs` of 0 selects the
    /// 60 second default applied to every request.
    pub async fn connect(
        instance_url: &str,
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        if instance_url.is_empty() || username.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let lowered = instance_url.to_lowercase();
        let prefix = if lowered.starts_with("http") {
            ""
        } else {
            "https://"
        };
        let base_url = format!("{prefix}{lowered}/api/v2");
        Url::parse(&base_url)?;

        let timeout = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        let mut client = Self {
            http,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            api_token: String::new(),
            token_expiry_ms: 0,
            query: None,
            analysis_ids: Vec::new(),
        };
        client.refresh_token().await?;
        Ok(client)
    }

    /// Request a new bearer token with the stored credentials.
    pub async fn refresh_token(&mut self) -> Result<AuthResponse> {
        let url = format!("{}/authorize", self.base_url);
        let body = serde_json::json!({
            "userName": self.username,
            "pwd": self.password,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Error::AuthFailed {
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        let auth: AuthResponse = serde_json::from_str(&text)?;
        self.api_token = auth.api_token.clone();
        self.token_expiry_ms = auth.expires;

        if auth.message.is_empty() {
            info!(expires = auth.expires, "authenticated");
        } else {
            info!(status = auth.status, message = %auth.message, "authenticated");
        }
        Ok(auth)
    }

    /// Whether the current token has passed its expiry timestamp. Checking
    /// and refreshing is the caller's responsibility; nothing refreshes in
    /// the background.
    pub fn is_token_expired(&self) -> bool {
        chrono::Utc::now().timestamp_millis() >= self.token_expiry_ms
    }

    /// The current bearer token.
    pub fn token(&self) -> &str {
        &self.api_token
    }

    /// Validate, normalize and store the query for subsequent calls.
    /// Resolved analysis ids from any previous query are discarded.
    pub fn configure_query(&mut self, mut query: ApiQuery) -> Result<()> {
        query.normalize();
        query.validate()?;
        self.query = Some(query);
        self.analysis_ids.clear();
        Ok(())
    }

    /// The currently configured query, if any.
    pub fn query(&self) -> Option<&ApiQuery> {
        self.query.as_ref()
    }

    /// Analysis ids resolved by the last `get_account_or_cluster` call.
    pub fn analysis_ids(&self) -> &[String] {
        &self.analysis_ids
    }

    /// List the analyses for the query's technology and keep those
    /// matching its account or cluster selector. The matched analysis ids
    /// are retained for aggregation.
    ///
    /// With `skip_errors` set, a selector that matches nothing yields an
    /// empty set instead of an error; `get_recommendation` then degrades
    /// to the fallback record.
    pub async fn get_account_or_cluster(&mut self) -> Result<Vec<Analysis>> {
        let query = self.query.as_ref().ok_or(Error::NoConfiguredQuery)?;
        let path = query.analysis_path()?;

        let analyses: Vec<Analysis> = self.get_json(path).await?;
        let matched = match resolve::resolve_analyses(query, &analyses) {
            Ok(matched) => matched,
            Err(err) if query.skip_errors => {
                warn!(error = %err, "resolution failed; continuing without analyses");
                self.analysis_ids.clear();
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        self.analysis_ids = matched
            .iter()
            .map(|analysis| analysis.analysis_id.clone())
            .collect();
        Ok(matched)
    }

    /// Fetch and concatenate the recommendation lists of every resolved
    /// analysis, in resolution order, decorated with the query's context.
    ///
    /// Partial success is not supported: the first failing analysis aborts
    /// the whole aggregation.
    pub async fn get_recommendations(&self) -> Result<Vec<Recommendation>> {
        let query = self.query.as_ref().ok_or(Error::NoConfiguredQuery)?;
        if self.analysis_ids.is_empty() {
            return Err(Error::NoResolvedAnalyses);
        }
        let path = query.analysis_path()?;

        let mut all = Vec::new();
        for analysis_id in &self.analysis_ids {
            let mut recos: Vec<Recommendation> = self
                .get_json(&format!("{path}/{analysis_id}/results"))
                .await?;
            recommend::decorate(&mut recos, query);
            debug!(analysis_id = %analysis_id, count = recos.len(), "fetched recommendations");
            all.extend(recos);
        }
        Ok(all)
    }

    /// Aggregate and match: the one recommendation (cloud) or pod-level
    /// merged recommendation (Kubernetes) the query asks for.
    ///
    /// With `skip_errors` set, aggregation and match failures are absorbed
    /// and a synthetic fallback record is returned instead.
    pub async fn get_recommendation(&self) -> Result<Recommendation> {
        let query = self.query.as_ref().ok_or(Error::NoConfiguredQuery)?;

        let recos = match self.get_recommendations().await {
            Ok(recos) => recos,
            Err(err) if query.skip_errors => {
                warn!(error = %err, "aggregation failed; returning fallback");
                return Ok(recommend::fallback_recommendation(query));
            }
            Err(err) => return Err(err),
        };
        recommend::match_recommendation(query, &recos)
    }

    /// Fetch the instance-governance scope for a matched recommendation
    /// and attach it. Optional enrichment; the matching flow works without
    /// it.
    pub async fn load_guardrails(
        &self,
        reco: &mut Recommendation,
        spend_tolerance: f64,
    ) -> Result<()> {
        let query = self.query.as_ref().ok_or(Error::NoConfiguredQuery)?;
        let path = query.analysis_path()?;

        let governance: InstanceGovernance = self
            .get_json(&format!(
                "{path}/{}/results/{}?scope=instanceGovernance&spendTolerance={spend_tolerance}",
                reco.analysis_id, reco.entity_id
            ))
            .await?;
        reco.instance_governance = governance;
        Ok(())
    }

    /// One authenticated GET against the instance, decoded from JSON.
    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{path_and_query}", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
