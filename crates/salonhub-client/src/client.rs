//! The authenticated API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use salonhub_auth::SessionService;
use salonhub_core::config::ApiConfig;

use crate::error::ApiError;
use crate::redirect::{LoggingRedirect, LoginRedirect};
use crate::refresh::{FailClosedRefresher, RefreshCoordinator, RefreshTicket, TokenRefresher};
use crate::request::ApiRequest;

/// Header carrying the tenant identifier in multi-tenant deployments.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// HTTP client for the SalonHub REST API.
///
/// Outgoing requests get the session's bearer token. A 401 triggers one
/// refresh-and-replay; every other failure is returned to the caller as is.
#[derive(Debug)]
pub struct ApiClient {
    /// Underlying connection pool.
    http: reqwest::Client,
    /// Prefix for every request path.
    base_url: String,
    /// Tenant sent with every request, if configured.
    tenant_id: Option<String>,
    /// Where users go when the session cannot be recovered.
    login_redirect: String,
    /// Source of the bearer token; cleared when a refresh fails.
    session: Arc<dyn SessionService>,
    /// Produces replacement tokens.
    refresher: Arc<dyn TokenRefresher>,
    /// Fired once per failed refresh.
    redirect: Arc<dyn LoginRedirect>,
    /// Single-flight refresh state for this client.
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Creates a client that fails closed on 401 and logs the login redirect.
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionService>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tenant_id: config.tenant_id.clone(),
            login_redirect: config.login_redirect.clone(),
            session,
            refresher: Arc::new(FailClosedRefresher),
            redirect: Arc::new(LoggingRedirect),
            refresh: RefreshCoordinator::new(config.max_pending_refresh),
        })
    }

    /// Replaces the token refresher.
    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    /// Replaces the login redirect hook.
    pub fn with_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Arc<dyn SessionService> {
        &self.session
    }

    /// Refresh bookkeeping for this client.
    pub fn refresh_state(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// GET `path` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// POST `body` to `path` and decode the JSON response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    /// PUT `body` to `path` and decode the JSON response.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).json(body)?).await
    }

    /// PATCH `path` (with no body) and decode the JSON response.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::patch(path)).await
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Sends `request` and decodes the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let url = response.url().to_string();
        response.json::<T>().await.map_err(|source| {
            error!(%url, error = %source, "Failed to decode response body");
            ApiError::Decode { url, source }
        })
    }

    /// Sends `request`, returning the successful response.
    ///
    /// A 401 on an authenticated request that has not been replayed yet
    /// goes through the refresh path; everything else is final.
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let response = self.dispatch(&request, None).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED && request.authenticated && !request.retried {
            let rejected = self.reject(response).await;
            return self.recover_unauthorized(request, rejected).await;
        }
        Err(self.reject(response).await)
    }

    /// Obtains a fresh token (or waits for the refresh in flight) and
    /// replays `request` once. `rejected` is the original 401, returned if
    /// the session cannot be recovered.
    async fn recover_unauthorized(
        &self,
        mut request: ApiRequest,
        rejected: ApiError,
    ) -> Result<Response, ApiError> {
        request.retried = true;

        let token = match self.refresh.begin() {
            RefreshTicket::Waiter(pending) => {
                debug!(path = %request.path, "Waiting for token refresh in flight");
                match pending.wait().await {
                    Some(token) => token,
                    None => return Err(rejected),
                }
            }
            RefreshTicket::Overflow => {
                warn!(path = %request.path, "Refresh queue full, failing request");
                return Err(rejected);
            }
            RefreshTicket::Leader(leader) => match self.run_refresh().await {
                Some(token) => {
                    let released = leader.resolve(token.clone());
                    debug!(released, "Released parked requests with refreshed token");
                    token
                }
                None => {
                    let released = leader.reject();
                    warn!(released, "Token refresh failed, parked requests rejected");
                    self.redirect.redirect(&self.login_redirect);
                    return Err(rejected);
                }
            },
        };

        let response = self.dispatch(&request, Some(&token)).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.reject(response).await)
        }
    }

    /// Runs the refresher and installs its token in the session. On failure
    /// the session is signed out before returning.
    async fn run_refresh(&self) -> Option<String> {
        info!("Access token rejected, refreshing session");
        match self.refresher.refresh().await {
            Ok(token) => match self.session.login(&token).await {
                Ok(identity) => {
                    info!(user_id = %identity.id, "Session refreshed");
                    Some(token)
                }
                Err(e) => {
                    warn!(error = %e, "Refreshed token rejected by session store, signing out");
                    self.sign_out().await;
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "Token refresh failed, signing out");
                self.sign_out().await;
                None
            }
        }
    }

    async fn sign_out(&self) {
        if let Err(e) = self.session.logout().await {
            error!(error = %e, "Failed to clear session after refresh failure");
        }
    }

    /// Builds and sends one attempt of `request`.
    ///
    /// `token` overrides the session's bearer token (used by replays).
    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let url = self.url_for(request)?;
        let mut builder = self.http.request(request.method.clone(), url.clone());

        if let Some(tenant) = &self.tenant_id {
            builder = builder.header(TENANT_HEADER, tenant.as_str());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.authenticated {
            let bearer = match token {
                Some(token) => Some(token.to_string()),
                None => self.session.bearer_token().await,
            };
            if let Some(bearer) = bearer {
                builder = builder.bearer_auth(bearer);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let built = builder.build().map_err(|e| {
            error!(%url, error = %e, "Failed to construct request");
            ApiError::Request(e.to_string())
        })?;

        debug!(method = %request.method, %url, retry = request.retried, "Sending request");
        self.http
            .execute(built)
            .await
            .map_err(|e| transport_error(&url, e))
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| {
            error!(url = %joined, error = %e, "Failed to construct request URL");
            ApiError::Request(format!("invalid URL '{joined}': {e}"))
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Logs a failed response by status and converts it into an error.
    async fn reject(&self, response: Response) -> ApiError {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => warn!(%url, "Request unauthorized"),
            StatusCode::FORBIDDEN => warn!(%url, %body, "Access forbidden for current user"),
            StatusCode::NOT_FOUND => warn!(%url, "Resource not found"),
            s if s.is_server_error() => {
                error!(%url, status = s.as_u16(), %body, "Server error response");
            }
            s => warn!(%url, status = s.as_u16(), %body, "Request failed"),
        }

        ApiError::Status { status, url, body }
    }
}

/// Classifies a `reqwest` send failure.
fn transport_error(url: &Url, err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        error!(%url, error = %err, "Failed to construct request");
        return ApiError::Request(err.to_string());
    }
    error!(
        %url,
        timeout = err.is_timeout(),
        connect = err.is_connect(),
        error = %err,
        "No response received from server"
    );
    ApiError::NoResponse {
        url: url.to_string(),
        source: err,
    }
}
