//! Builds and executes authenticated calls against the WaterSync API.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::{Token, WatersyncClient};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::{Map, Value};

/// Ensures a base URL ends with a single trailing `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

/// Strips leading slashes from an endpoint and ensures it ends with `/`.
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_start_matches('/');
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// A single call to the API: where it goes, who makes it and what it carries.
///
/// The project scope and token are only turned into a query parameter and an
/// `Authorization` header when the request is sent, so the request itself can
/// be inspected or reused freely.
#[derive(Debug, Clone)]
pub struct WaterRequest {
    http: Client,
    base_url: String,
    endpoint: String,
    project: Option<String>,
    token: Option<Token>,
    data: Option<Value>,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
}

impl WaterRequest {
    /// Creates an unauthenticated request without a project scope.
    pub fn new(base_url: &str, endpoint: &str) -> Self {
        Self::on_connection(Client::new(), base_url, endpoint)
    }

    /// Creates a request that carries the client's base URL, project, token
    /// and HTTP connection pool.
    pub fn from_client(client: &WatersyncClient, endpoint: &str) -> Self {
        let mut request = Self::on_connection(client.http(), client.base_url(), endpoint);
        request.project = client.project().map(str::to_string);
        request.token = client.token().cloned();
        request
    }

    /// Creates an unauthenticated request on an existing connection pool.
    pub(crate) fn on_connection(http: Client, base_url: &str, endpoint: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            endpoint: normalize_endpoint(endpoint),
            project: None,
            token: None,
            data: None,
            headers: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Adds every parameter that has a value and skips the unset ones.
    pub fn with_optional_params<K, V>(mut self, params: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            if let Some(value) = value {
                self.params.push((key.into(), value.into()));
            }
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint)
    }

    /// Query parameters as sent: the caller's parameters plus `project` when
    /// the request is scoped to one.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = self.params.clone();
        if let Some(project) = &self.project {
            query.push(("project".to_string(), project.clone()));
        }
        query
    }

    /// The `Authorization` header value, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Token {}", token.expose()))
    }

    pub fn get(&self) -> Result<WaterResponse, ApiError> {
        self.send(Method::GET)
    }

    /// Sends the payload as JSON; a request without data posts `{}`.
    pub fn post(&self) -> Result<WaterResponse, ApiError> {
        self.send(Method::POST)
    }

    pub fn delete(&self) -> Result<WaterResponse, ApiError> {
        Err(ApiError::MethodNotImplemented("DELETE"))
    }

    pub fn patch(&self) -> Result<WaterResponse, ApiError> {
        Err(ApiError::MethodNotImplemented("PATCH"))
    }

    fn send(&self, method: Method) -> Result<WaterResponse, ApiError> {
        let url = self.full_url();
        let query = self.query();
        debug!("{} {} with params {:?}", method, url, query);

        let mut builder = self.http.request(method.clone(), &url).query(&query);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(authorization) = self.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if method == Method::POST {
            let empty = Value::Object(Map::new());
            builder = builder.json(self.data.as_ref().unwrap_or(&empty));
        }

        let response = builder.send().map_err(|e| {
            warn!("{} {} failed before a response arrived: {}", method, url, e);
            ApiError::NetworkRequest(url.clone(), e)
        })?;

        WaterResponse::from_blocking(url, response)
    }
}
