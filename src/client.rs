//! This module provides the main entry point for talking to the WaterSync API.
//! A [`WatersyncClient`] holds the base URL, the project scope and, after
//! [`WatersyncClient::login`], the authentication token used by every request.

use crate::api::endpoints::Endpoints;
use crate::api::error::ApiError;
use crate::api::request::{normalize_base_url, WaterRequest};
use crate::api::response::Content;
use crate::config::ClientConfig;
use bon::bon;
use log::{info, warn};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// An API token. `Debug` never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(****)")
    }
}

/// The client holding everything a request needs to reach and authenticate
/// against the API.
///
/// # Examples
///
/// ```no_run
/// use waterspy::WatersyncClient;
///
/// # fn main() -> Result<(), waterspy::WaterspyError> {
/// let mut client = WatersyncClient::builder()
///     .base_url("https://watersync.example.org/api")
///     .project("delta-monitoring")
///     .build();
///
/// // Prompts on the terminal for whatever is not passed in.
/// client.login(Some("analyst@example.org"), None)?;
/// assert!(client.is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WatersyncClient {
    base_url: String,
    project: Option<String>,
    token: Option<Token>,
    endpoints: Arc<Endpoints>,
    http: Client,
}

#[bon]
impl WatersyncClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.base_url(&str)`: **Required.** Root URL of the API; a trailing `/` is added if missing.
    /// * `.project(&str)`: Optional. Project used to scope requests.
    /// * `.token(&str)`: Optional. A token obtained earlier; otherwise call [`Self::login`].
    /// * `.endpoints(Arc<Endpoints>)`: Optional. Endpoint table; defaults to [`Endpoints::default`].
    #[builder]
    pub fn new(
        base_url: &str,
        project: Option<&str>,
        token: Option<&str>,
        endpoints: Option<Arc<Endpoints>>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            project: project.map(str::to_string),
            token: token.map(Token::new),
            endpoints: endpoints.unwrap_or_default(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::builder()
            .base_url(&config.base_url)
            .maybe_project(config.project.as_deref())
            .endpoints(Arc::new(config.endpoints.clone()))
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> Client {
        self.http.clone()
    }

    /// Starts a request to `endpoint` carrying this client's scope and token.
    pub fn request(&self, endpoint: &str) -> WaterRequest {
        WaterRequest::from_client(self, endpoint)
    }

    /// Obtains a token from the API and stores it on the client.
    ///
    /// Missing credentials are asked for on the terminal. The password prompt
    /// echoes its input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginFailed`] with the response's failure
    /// description when the API does not hand out a token, or a network error
    /// if the call cannot be made.
    pub fn login(&mut self, email: Option<&str>, password: Option<&str>) -> Result<(), ApiError> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.login_with_prompt(email, password, &mut input, &mut output)
    }

    /// [`Self::login`] with the prompt reading from `input` and writing to `output`.
    pub fn login_with_prompt<R: BufRead, W: Write>(
        &mut self,
        email: Option<&str>,
        password: Option<&str>,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), ApiError> {
        let email = match email {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => prompt("Enter your email: ", input, output)?,
        };
        let password = match password {
            Some(password) if !password.is_empty() => password.to_string(),
            _ => prompt("Enter your password: ", input, output)?,
        };

        let response = WaterRequest::on_connection(self.http(), &self.base_url, &self.endpoints.login)
            .with_data(json!({ "email": email, "password": password }))
            .post()?;

        let token = match response.content()? {
            Content::Success(Value::Object(body)) => body
                .get("token")
                .and_then(Value::as_str)
                .map(Token::new),
            _ => None,
        };

        match token {
            Some(token) => {
                self.token = Some(token);
                info!("Login successful.");
                Ok(())
            }
            None => {
                warn!("Login for {} was rejected", email);
                Err(ApiError::LoginFailed(response.fail()))
            }
        }
    }
}

fn prompt<R: BufRead, W: Write>(label: &str, input: &mut R, output: &mut W) -> Result<String, ApiError> {
    output
        .write_all(label.as_bytes())
        .and_then(|_| output.flush())
        .map_err(ApiError::Prompt)?;
    let mut line = String::new();
    input.read_line(&mut line).map_err(ApiError::Prompt)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
