use std::future::Future;
use std::time::Duration;

use reqwest::{multipart::Form, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, ErrorBody, FieldErrors, Result};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP wrapper shared by every service. Clones share the connection pool
/// and the cookie jar holding the session cookie.
///
/// Paths are passed as segments; each one is percent-encoded, so ids never
/// change the route they are sent to.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    scope: CancellationToken,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let base = Url::parse(config.api_url.trim_end_matches('/'))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "PORTAL_API_URL is not a base URL: {}",
                config.api_url
            )));
        }

        Ok(Self {
            http,
            base,
            scope: CancellationToken::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// A client whose requests are cancelled together with `self`, or on
    /// their own through the returned client's token.
    pub fn scoped(&self) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            scope: self.scope.child_token(),
        }
    }

    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    pub fn cancel(&self) {
        self.scope.cancel();
    }

    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("PORTAL_API_URL is not a base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let request = self.http.get(self.url(path)?);
        self.send(Method::GET, path, request).await
    }

    pub async fn get_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)?).query(query);
        self.send(Method::GET, path, request).await
    }

    pub async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)?).json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn put<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.put(self.url(path)?).json(body);
        self.send(Method::PUT, path, request).await
    }

    pub async fn patch<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.patch(self.url(path)?).json(body);
        self.send(Method::PATCH, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let request = self.http.delete(self.url(path)?);
        self.send(Method::DELETE, path, request).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &[&str],
        form: Form,
    ) -> Result<T> {
        let request = self.http.post(self.url(path)?).multipart(form);
        self.send(Method::POST, path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        request: RequestBuilder,
    ) -> Result<T> {
        let path = format!("/{}", path.join("/"));
        let value = scoped(&self.scope, self.dispatch(&method, &path, request)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<JsonValue> {
        debug!(%method, path, "Sending portal API request");

        let response = request.send().await.map_err(|err| {
            warn!(%method, path, error = %err, "Portal API request failed to send");
            Error::Transport(err)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body: JsonValue = if bytes.iter().all(u8::is_ascii_whitespace) {
            JsonValue::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(v) => v,
                Err(err) if status.is_success() => return Err(Error::Json(err)),
                Err(_) => JsonValue::String(String::from_utf8_lossy(&bytes).trim().to_string()),
            }
        };

        if !status.is_success() {
            let err = classify(status, body);
            warn!(%method, path, status = status.as_u16(), error = %err, "Portal API call failed");
            return Err(err);
        }

        info!(%method, path, status = status.as_u16(), "Portal API call completed");

        let is_envelope = body
            .as_object()
            .is_some_and(|map| map.contains_key("success") || map.contains_key("data"));
        if !is_envelope {
            return Ok(body);
        }

        let envelope: Envelope<JsonValue> = serde_json::from_value(body)?;
        if envelope.success == Some(false) {
            return Err(Error::Server {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }
        Ok(envelope.data.unwrap_or(JsonValue::Null))
    }
}

/// Runs `fut` unless `scope` is cancelled first.
pub async fn scoped<T, F>(scope: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if scope.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        biased;
        _ = scope.cancelled() => {
            debug!("Portal API request cancelled");
            Err(Error::Cancelled)
        }
        res = fut => res,
    }
}

fn classify(status: StatusCode, body: JsonValue) -> Error {
    let parsed: ErrorBody = match body {
        JsonValue::String(text) => ErrorBody {
            message: (!text.is_empty()).then_some(text),
            errors: Vec::new(),
        },
        other => serde_json::from_value(other).unwrap_or_default(),
    };
    let message = parsed.message.unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(if message.is_empty() {
            "Not authenticated".to_string()
        } else {
            message
        }),
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound(if message.is_empty() {
            "Resource not found".to_string()
        } else {
            message
        }),
        _ if !parsed.errors.is_empty() => Error::Validation {
            message,
            errors: FieldErrors::from_server(&parsed.errors),
        },
        StatusCode::UNPROCESSABLE_ENTITY => Error::Validation {
            message,
            errors: FieldErrors::new(),
        },
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    }
}
