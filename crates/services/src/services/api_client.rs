//! HTTP client for the Yuntas backend REST API.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, StatusCode, multipart};
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;
use utils::response::ApiResponse;

use super::{endpoints::Endpoints, session::Session, validation::ValidationErrors};

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Backend(String),
    #[error("json error: {0}")]
    Serde(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("no session token: sign in to the admin panel first")]
    MissingToken,
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("could not read upload: {0}")]
    Upload(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Whether a request needs the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach the token when there is one.
    Optional,
    /// Fail with [`ApiError::MissingToken`] before sending when there is none.
    Required,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Arc<Endpoints>,
    session: Arc<Session>,
}

impl ApiClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(
        endpoints: Endpoints,
        session: Arc<Session>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout.unwrap_or(Self::DEFAULT_TIMEOUT))
            .user_agent(concat!("yuntas-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            session,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// GET returning the envelope payload.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        auth: Auth,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let request = self.http.request(Method::GET, url).query(query);
        let request = self.authorize(request, auth)?;
        self.execute(request, cancel).await
    }

    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.request(method, url).json(body);
        let request = self.authorize(request, Auth::Required)?;
        self.execute(request, &CancellationToken::new()).await
    }

    /// POST a multipart form. Updates spoof the method through a `_method`
    /// field since multipart bodies are only parsed on POST by the backend.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let request = self.http.post(url).multipart(form);
        let request = self.authorize(request, Auth::Required)?;
        self.execute(request, &CancellationToken::new()).await
    }

    /// DELETE; only the envelope's success flag matters.
    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let request = self.http.delete(url);
        let request = self.authorize(request, Auth::Required)?;
        let response = self.send(request, &CancellationToken::new()).await?;
        let (status, body) = read_body(response).await?;
        decode_acknowledgement(status, &body).map_err(|e| self.to_api_error(status, e))
    }

    fn authorize(&self, request: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ApiError> {
        match (self.session.token(), auth) {
            (Some(token), _) => Ok(request.bearer_auth(token.expose_secret())),
            (None, Auth::Optional) => Ok(request),
            (None, Auth::Required) => Err(ApiError::MissingToken),
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ApiError> {
        let request = request
            .header("accept", "application/json")
            .build()
            .map_err(map_reqwest_error)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = self.http.execute(request) => result.map_err(map_reqwest_error),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let response = self.send(request, cancel).await?;
        let (status, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            result = read_body(response) => result?,
        };
        decode_envelope(status, &body).map_err(|e| self.to_api_error(status, e))
    }

    fn to_api_error(&self, status: StatusCode, error: EnvelopeError) -> ApiError {
        let error = error.into_api_error(status);
        if error.is_unauthorized() {
            warn!("backend rejected the session token, clearing it");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear session token");
            }
        }
        error
    }
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String), ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    Ok((status, body))
}

#[derive(Debug, PartialEq)]
enum EnvelopeError {
    /// Non-2xx status; carries the envelope message or the raw body.
    Status(String),
    /// 2xx with `success: false`.
    Rejected(String),
    /// 2xx envelope without `data`.
    NoData,
    Decode(String),
}

impl EnvelopeError {
    fn into_api_error(self, status: StatusCode) -> ApiError {
        match self {
            Self::Status(message) if status == StatusCode::UNAUTHORIZED => {
                ApiError::Unauthorized(message)
            }
            Self::Status(message) => ApiError::Http {
                status: status.as_u16(),
                message,
            },
            Self::Rejected(message) => ApiError::Backend(message),
            Self::NoData => ApiError::Backend("response carried no data".to_string()),
            Self::Decode(message) => ApiError::Serde(message),
        }
    }
}

/// Decodes `{success, data, message, status}` into the payload.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, EnvelopeError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| {
                let body = body.trim();
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body.chars().take(300).collect()
                }
            });
        return Err(EnvelopeError::Status(message));
    }

    let envelope: ApiResponse<T> =
        serde_json::from_str(body).map_err(|e| EnvelopeError::Decode(e.to_string()))?;
    match (envelope.success, envelope.data) {
        (true, Some(data)) => Ok(data),
        (true, None) => Err(EnvelopeError::NoData),
        (false, _) => Err(EnvelopeError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        )),
    }
}

/// Decodes the reply to a request whose payload is ignored. A 2xx with an
/// empty body (`204 No Content`) or an envelope without `data` both count as
/// success.
fn decode_acknowledgement(status: StatusCode, body: &str) -> Result<(), EnvelopeError> {
    if status.is_success() && body.trim().is_empty() {
        return Ok(());
    }
    match decode_envelope::<serde_json::Value>(status, body) {
        Ok(_) | Err(EnvelopeError::NoData) => Ok(()),
        Err(e) => Err(e),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Serde(e.to_string())
    } else {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope_success() {
        let data: Vec<i64> =
            decode_envelope(StatusCode::OK, r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(data, vec![1, 2]);
    }

    #[test]
    fn test_decode_envelope_rejected() {
        let err = decode_envelope::<i64>(
            StatusCode::OK,
            r#"{"success": false, "message": "Producto no encontrado"}"#,
        )
        .unwrap_err();
        assert_eq!(err, EnvelopeError::Rejected("Producto no encontrado".to_string()));
    }

    #[test]
    fn test_decode_envelope_status_message() {
        let err = decode_envelope::<i64>(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"success": false, "message": "El email ya existe"}"#,
        )
        .unwrap_err();
        let api_error = err.into_api_error(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.to_string(), "http 422: El email ya existe");
    }

    #[test]
    fn test_decode_envelope_unauthorized_plain_body() {
        let err = decode_envelope::<i64>(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(err.into_api_error(StatusCode::UNAUTHORIZED).is_unauthorized());
    }

    #[test]
    fn test_decode_envelope_garbage() {
        let err = decode_envelope::<i64>(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode(_)));
    }

    #[test]
    fn test_acknowledgement_accepts_empty_success() {
        assert_eq!(decode_acknowledgement(StatusCode::NO_CONTENT, ""), Ok(()));
        assert_eq!(decode_acknowledgement(StatusCode::OK, "  \n"), Ok(()));
        assert_eq!(
            decode_acknowledgement(StatusCode::OK, r#"{"success": true, "message": "Eliminado"}"#),
            Ok(())
        );
        assert_eq!(
            decode_acknowledgement(StatusCode::OK, r#"{"success": false, "message": "En uso"}"#),
            Err(EnvelopeError::Rejected("En uso".to_string()))
        );
        assert!(matches!(
            decode_acknowledgement(StatusCode::NOT_FOUND, ""),
            Err(EnvelopeError::Status(_))
        ));
    }

    fn client_with_token(token: &str) -> (ApiClient, Arc<Session>) {
        let storage = Arc::new(utils::storage::LocalStorage::in_memory());
        let session = Arc::new(Session::new(storage));
        session.set_token(&secrecy::SecretString::from(token)).unwrap();
        let client = ApiClient::new(Endpoints::default(), session.clone(), None).unwrap();
        (client, session)
    }

    #[test]
    fn test_unauthorized_clears_session() {
        let (client, session) = client_with_token("abc");
        assert!(session.token().is_some());

        let err = client.to_api_error(
            StatusCode::UNAUTHORIZED,
            EnvelopeError::Status("Unauthenticated.".to_string()),
        );
        assert!(err.is_unauthorized());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_other_errors_keep_session() {
        let (client, session) = client_with_token("abc");
        let err = client.to_api_error(
            StatusCode::FORBIDDEN,
            EnvelopeError::Status("Forbidden".to_string()),
        );
        assert!(!err.is_unauthorized());
        assert!(session.token().is_some());
    }

    #[tokio::test]
    async fn test_cancelled_request_returns_cancelled() {
        let (client, _session) = client_with_token("abc");
        let cancel = CancellationToken::new();
        cancel.cancel();
        // The address is unroutable, so only cancellation can end the call.
        let request = client.http.get("http://10.255.255.1/api/v2/blogs");
        let result = client.send(request, &cancel).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[test]
    fn test_missing_token_blocks_required_requests() {
        let storage = Arc::new(utils::storage::LocalStorage::in_memory());
        let session = Arc::new(Session::new(storage));
        let client = ApiClient::new(Endpoints::default(), session, None).unwrap();
        let request = client.http.get(client.endpoints().login());
        assert!(matches!(
            client.authorize(request, Auth::Required),
            Err(ApiError::MissingToken)
        ));
    }
}
