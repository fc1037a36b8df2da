//! HTTP client implementation for the COROS web API.
//!
//! This module provides a reqwest-based implementation of the [`CorosClient`](crate::CorosClient) trait.

use crate::config::Config;
use crate::wire::{self, ActivityPage, DownloadData, Envelope, LoginData, LoginRequest};
use crate::{
    ActivitySummary, CorosClient, CorosError, Credentials, DownloadRequest, DownloadedFile,
    Operation, Session,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use md5::{Digest, Md5};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Upper bound on a downloaded export. Activity files are small; anything
/// larger is treated as a broken response.
pub const MAX_FILE_BYTES: usize = 64 * 1024 * 1024;

/// Client for the COROS web API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestCorosClient {
    base_url: String,
    client: reqwest::Client,
    max_file_bytes: usize,
}

impl ReqwestCorosClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API host of the account's region (e.g., "https://teameuapi.coros.com")
    /// * `timeout` - Applied to every request, connect through body
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CorosError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CorosError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            max_file_bytes: MAX_FILE_BYTES,
        })
    }

    /// Replace the [`MAX_FILE_BYTES`] cap on downloaded exports.
    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, CorosError> {
        Self::new(config.base_url(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an authenticated GET request.
    fn get_request(&self, session: &Session, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).header(
            wire::ACCESS_TOKEN_HEADER,
            session.access_token().expose_secret(),
        )
    }

    /// Build an authenticated POST request.
    fn post_request(&self, session: &Session, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).header(
            wire::ACCESS_TOKEN_HEADER,
            session.access_token().expose_secret(),
        )
    }

    /// Send a request, turning transport failures and non-2xx statuses into errors.
    async fn send(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CorosError> {
        let resp = request
            .send()
            .await
            .map_err(|e| CorosError::transport(operation, e))?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(operation, resp).await);
        }
        Ok(resp)
    }

    /// Execute a request and decode the vendor envelope.
    async fn execute_envelope<T: serde::de::DeserializeOwned>(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, CorosError> {
        let resp = self.send(operation, request).await?;
        // Read body as text first so a shape mismatch can quote the payload.
        let text = resp
            .text()
            .await
            .map_err(|e| CorosError::transport(operation, e))?;
        serde_json::from_str(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(256).collect();
            CorosError::api(
                operation,
                format!("malformed response body: {e} - body: {body_snippet}"),
            )
        })
    }

    /// Extract error information from a failed response.
    async fn error_from_response(
        &self,
        operation: Operation,
        resp: reqwest::Response,
    ) -> CorosError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        let message = if body_snippet.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body_snippet}")
        };

        match status {
            401 | 403 => CorosError::auth(operation, message),
            404 if operation == Operation::DownloadActivity => {
                CorosError::not_found(operation, message)
            }
            _ => CorosError::api(operation, message),
        }
    }

    /// Fail with `Auth` when the vendor rejected the token.
    fn check_token<T>(operation: Operation, envelope: &Envelope<T>) -> Result<(), CorosError> {
        if envelope.is_token_rejected() {
            return Err(CorosError::auth(operation, envelope.reason()));
        }
        Ok(())
    }

    /// Export links are usually absolute (object storage); relative ones are
    /// served from the API host.
    fn resolve_file_url(&self, file_url: &str) -> Result<Url, CorosError> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| CorosError::Config(format!("invalid base url {}: {e}", self.base_url)))?;
        base.join(file_url).map_err(|e| {
            CorosError::api(
                Operation::DownloadActivity,
                format!("invalid file url {file_url}: {e}"),
            )
        })
    }

    /// Buffer an export body in memory, bounded by the client's file cap.
    ///
    /// The token is not attached: export links are pre-signed and may point
    /// at a third-party host. A 401/403 from that host is an unusable link
    /// and is reported as `Api`.
    async fn fetch_file(&self, url: Url) -> Result<Vec<u8>, CorosError> {
        let operation = Operation::DownloadActivity;
        let resp = self
            .send(operation, self.client.get(url))
            .await
            .map_err(|e| match e {
                CorosError::Auth { operation, message } => {
                    CorosError::api(operation, format!("export link rejected: {message}"))
                }
                other => other,
            })?;
        if let Some(len) = resp.content_length()
            && len > self.max_file_bytes as u64
        {
            return Err(file_too_large(self.max_file_bytes));
        }

        read_capped(resp.bytes_stream(), self.max_file_bytes, |e| {
            CorosError::transport(operation, e)
        })
        .await
    }
}

fn file_too_large(max: usize) -> CorosError {
    CorosError::api(
        Operation::DownloadActivity,
        format!("file exceeds {max} bytes"),
    )
}

/// Collect a body stream, failing as soon as it grows past `max` bytes.
async fn read_capped<S, B, E>(
    mut stream: S,
    max: usize,
    map_err: impl Fn(E) -> CorosError,
) -> Result<Vec<u8>, CorosError>
where
    S: futures_util::Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(&map_err)?;
        let chunk = chunk.as_ref();
        if bytes.len() + chunk.len() > max {
            return Err(file_too_large(max));
        }
        bytes.extend_from_slice(chunk);
        tracing::trace!(bytes_downloaded = bytes.len(), "download progress");
    }
    Ok(bytes)
}

/// Lowercase hex MD5 digest, as the login endpoint expects.
pub fn hash_password(password: &SecretString) -> String {
    hex::encode(Md5::digest(password.expose_secret().as_bytes()))
}

#[async_trait]
impl CorosClient for ReqwestCorosClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, CorosError> {
        let operation = Operation::Login;
        let url = self.url(wire::LOGIN_PATH);
        let body = LoginRequest {
            account: &credentials.email,
            account_type: wire::EMAIL_ACCOUNT_TYPE,
            pwd: hash_password(&credentials.password),
        };
        tracing::debug!(base_url = %self.base_url, "logging in");

        let envelope: Envelope<LoginData> = self
            .execute_envelope(operation, self.client.post(&url).json(&body))
            .await?;
        let reason = envelope.reason();
        if !envelope.is_ok() {
            return Err(CorosError::auth(operation, reason));
        }
        let token = envelope
            .data
            .and_then(|d| d.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CorosError::auth(operation, reason))?;

        tracing::info!("logged in; any other web session of this account has been signed out");
        Ok(Session::new(SecretString::new(token.into())))
    }

    async fn list_activities(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<ActivitySummary>, CorosError> {
        let operation = Operation::ListActivities;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let url = self.url(wire::ACTIVITY_QUERY_PATH);
        let size = limit.to_string();
        let qp = [
            ("size", size.as_str()),
            ("pageNumber", "1"),
            ("modeList", ""),
        ];
        tracing::debug!(limit, "fetching activities");

        let envelope: Envelope<ActivityPage> = self
            .execute_envelope(operation, self.get_request(session, &url).query(&qp))
            .await?;
        Self::check_token(operation, &envelope)?;
        if !envelope.is_ok() {
            return Err(CorosError::api(operation, envelope.reason()));
        }

        let records = envelope
            .data
            .and_then(|page| page.data_list)
            .unwrap_or_default();
        Ok(records
            .into_iter()
            .take(limit as usize)
            .map(ActivitySummary::from)
            .collect())
    }

    async fn download_activity(
        &self,
        session: &Session,
        request: &DownloadRequest,
    ) -> Result<DownloadedFile, CorosError> {
        let operation = Operation::DownloadActivity;
        let url = self.url(wire::ACTIVITY_DOWNLOAD_PATH);
        let sport_type = request.sport_type.code().to_string();
        let qp = [
            ("labelId", request.activity_id.as_str()),
            ("sportType", sport_type.as_str()),
            ("fileType", wire::file_type_code(request.format)),
        ];
        tracing::debug!(
            activity_id = %request.activity_id,
            format = %request.format,
            "requesting export"
        );

        // The export link is requested with POST, not GET.
        let envelope: Envelope<DownloadData> = self
            .execute_envelope(operation, self.post_request(session, &url).query(&qp))
            .await?;
        Self::check_token(operation, &envelope)?;
        if !envelope.is_ok() {
            return Err(CorosError::not_found(operation, envelope.reason()));
        }
        let file_url = envelope
            .data
            .and_then(|d| d.file_url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                CorosError::not_found(
                    operation,
                    format!(
                        "no {} export for activity {}",
                        request.format, request.activity_id
                    ),
                )
            })?;

        let bytes = self.fetch_file(self.resolve_file_url(&file_url)?).await?;
        tracing::debug!(bytes = bytes.len(), "export downloaded");
        Ok(DownloadedFile {
            bytes,
            file_name: request.file_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_trims_trailing_slash() {
        let client =
            ReqwestCorosClient::new("http://localhost/", Duration::from_secs(1)).expect("client");
        assert_eq!(client.base_url(), "http://localhost");
    }

    #[test]
    fn hash_password_is_md5_hex() {
        let hashed = hash_password(&SecretString::new("x".into()));
        assert_eq!(hashed, "9dd4e461268c8034f5c8564e155c67a6");
    }

    #[test]
    fn resolve_file_url_handles_absolute_and_relative() {
        let client =
            ReqwestCorosClient::new("https://api.example.com", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client
                .resolve_file_url("https://cdn.example.com/a/1.gpx")
                .unwrap()
                .as_str(),
            "https://cdn.example.com/a/1.gpx"
        );
        assert_eq!(
            client.resolve_file_url("/files/1.gpx").unwrap().as_str(),
            "https://api.example.com/files/1.gpx"
        );
    }

    #[tokio::test]
    async fn read_capped_stops_at_limit_while_streaming() {
        let chunks = vec![
            Ok::<_, std::convert::Infallible>(vec![1u8; 4]),
            Ok(vec![2u8; 4]),
            Ok(vec![3u8; 4]),
        ];
        let err = read_capped(futures_util::stream::iter(chunks), 10, |e| match e {})
            .await
            .unwrap_err();
        match err {
            CorosError::Api { operation, message } => {
                assert_eq!(operation, Operation::DownloadActivity);
                assert_eq!(message, "file exceeds 10 bytes");
            }
            other => panic!("expected api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn read_capped_accepts_body_at_limit() {
        let chunks = vec![Ok::<_, std::convert::Infallible>(vec![7u8; 6]), Ok(vec![8u8; 4])];
        let bytes = read_capped(futures_util::stream::iter(chunks), 10, |e| match e {})
            .await
            .unwrap();
        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[..6], &[7u8; 6]);
    }
}
