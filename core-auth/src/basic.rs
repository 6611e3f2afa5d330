//! Password Authentication Module
//!
//! Direct email/password login and account signup against the platform API.
//! Unlike the browser-flow modules, authentication here is a single POST:
//! credentials go out, a token comes back in `data.token`.

use crate::error::{AuthError, Result};
use crate::module::AuthModule;
use crate::types::{AuthData, AuthModuleKind, UserDetails};
use async_trait::async_trait;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::ClientConfig;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Email/password authentication against the platform API.
pub struct BasicAuthModule {
    app_id: String,
    api_url: String,
    http: Arc<dyn HttpClient>,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    data: TokenPayload,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    error_type: String,
    parameter: String,
}

/// Best-effort extraction of machine-readable error codes from a structured
/// error response body.
///
/// Each entry of `error.details[]` becomes an `"{error_type}_{parameter}"`
/// code. A body that is absent, malformed, or shaped differently yields an
/// empty list rather than a parsing failure, so signup error reporting
/// degrades gracefully.
pub fn detailed_error_codes(body: &[u8]) -> Vec<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .map(|envelope| {
            envelope
                .error
                .details
                .iter()
                .map(|detail| format!("{}_{}", detail.error_type, detail.parameter))
                .collect()
        })
        .unwrap_or_default()
}

impl BasicAuthModule {
    pub fn new(
        app_id: impl Into<String>,
        api_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_url: api_url.into(),
            http,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.app_id.clone(),
            config.api_url.clone(),
            config.http_client.clone(),
        )
    }
}

#[async_trait]
impl AuthModule for BasicAuthModule {
    fn kind(&self) -> AuthModuleKind {
        AuthModuleKind::Basic
    }

    async fn authenticate(&self, data: AuthData) -> Result<String> {
        let AuthData::Basic(credentials) = data else {
            return Err(AuthError::Validation(
                "email and password credentials are required".to_string(),
            ));
        };

        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::Validation(
                "email and password must both be provided".to_string(),
            ));
        }

        debug!(email = %credentials.email, "authenticating with password credentials");

        let body = json!({
            "app_id": self.app_id,
            "email": credentials.email,
            "password": credentials.password,
        });

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/auth/login", self.api_url))
            .json(&body)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unreadable response body".to_string());
            warn!(status = response.status, "password login rejected");
            return Err(AuthError::Server {
                status: response.status,
                message,
            });
        }

        let envelope: TokenEnvelope = response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        info!("password login succeeded");
        Ok(envelope.data.token)
    }

    async fn signup(&self, details: &UserDetails) -> Result<()> {
        let mut payload = serde_json::Map::new();
        payload.insert("app_id".to_string(), json!(self.app_id));
        payload.insert("email".to_string(), json!(details.email));
        payload.insert("password".to_string(), json!(details.password));

        if let Some(username) = &details.username {
            payload.insert("username".to_string(), json!(username));
        }
        if let Some(image) = &details.image {
            payload.insert("image".to_string(), json!(image));
        }
        if let Some(name) = &details.name {
            payload.insert("name".to_string(), json!(name));
        }
        if let Some(custom) = &details.custom {
            payload.insert("custom".to_string(), custom.clone());
        }

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/users", self.api_url))
            .json(&serde_json::Value::Object(payload))
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        // Every failure surfaces as a structured, enumerable code list; a
        // request that never produced a response yields an empty list.
        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "signup request failed in transit");
                return Err(AuthError::SignupRejected { codes: Vec::new() });
            }
        };

        if response.is_success() {
            info!(email = %details.email, "signup accepted");
            return Ok(());
        }

        let codes = detailed_error_codes(&response.body);
        warn!(
            status = response.status,
            error_count = codes.len(),
            "signup rejected"
        );
        Err(AuthError::SignupRejected { codes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BasicCredentials;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::HttpResponse;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted HTTP client recording every request it receives
    struct StubHttpClient {
        calls: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<BridgeResult<HttpResponse>>>,
    }

    impl StubHttpClient {
        fn returning(status: u16, body: serde_json::Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::from([Ok(HttpResponse {
                    status,
                    headers: Default::default(),
                    body: Bytes::from(serde_json::to_vec(&body).unwrap()),
                })])),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::from([Err(BridgeError::OperationFailed(
                    message.to_string(),
                ))])),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> HttpRequest {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl HttpClient for StubHttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(BridgeError::OperationFailed(
                        "no scripted response".to_string(),
                    ))
                })
        }
    }

    fn module(http: Arc<StubHttpClient>) -> BasicAuthModule {
        BasicAuthModule::new("testapp", "https://api.example.com", http)
    }

    fn request_body(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_rejects_empty_email_without_http_call() {
        let http = Arc::new(StubHttpClient::returning(200, json!({})));
        let module = module(http.clone());

        let err = module
            .authenticate(AuthData::Basic(BasicCredentials::new("", "x")))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_empty_password_without_http_call() {
        let http = Arc::new(StubHttpClient::returning(200, json!({})));
        let module = module(http.clone());

        let err = module
            .authenticate(AuthData::Basic(BasicCredentials::new("a@b.com", "")))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_non_basic_data() {
        let http = Arc::new(StubHttpClient::returning(200, json!({})));
        let module = module(http.clone());

        let err = module.authenticate(AuthData::None).await.unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_resolves_token() {
        let http = Arc::new(StubHttpClient::returning(
            200,
            json!({"data": {"token": "abc"}}),
        ));
        let module = module(http.clone());

        let token = module
            .authenticate(AuthData::Basic(BasicCredentials::new("a@b.com", "p")))
            .await
            .unwrap();

        assert_eq!(token, "abc");
        assert_eq!(http.call_count(), 1);

        let request = http.request(0);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.example.com/auth/login");
        let body = request_body(&request);
        assert_eq!(body["app_id"], "testapp");
        assert_eq!(body["email"], "a@b.com");
        assert_eq!(body["password"], "p");
    }

    #[tokio::test]
    async fn test_authenticate_propagates_transport_error() {
        let http = Arc::new(StubHttpClient::failing("connection reset"));
        let module = module(http);

        let err = module
            .authenticate(AuthData::Basic(BasicCredentials::new("a@b.com", "p")))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Transport(_)));
    }

    #[tokio::test]
    async fn test_authenticate_surfaces_server_error() {
        let http = Arc::new(StubHttpClient::returning(
            401,
            json!({"error": "bad credentials"}),
        ));
        let module = module(http);

        let err = module
            .authenticate(AuthData::Basic(BasicCredentials::new("a@b.com", "wrong")))
            .await
            .unwrap_err();

        match err {
            AuthError::Server { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_sends_required_and_present_optional_fields() {
        let http = Arc::new(StubHttpClient::returning(201, json!({})));
        let module = module(http.clone());

        let mut details = UserDetails::new("a@b.com", "secret");
        details.username = Some("ab".to_string());
        details.custom = Some(json!({"plan": "pro"}));

        module.signup(&details).await.unwrap();

        let request = http.request(0);
        assert_eq!(request.url, "https://api.example.com/users");
        let body = request_body(&request);
        assert_eq!(body["app_id"], "testapp");
        assert_eq!(body["email"], "a@b.com");
        assert_eq!(body["password"], "secret");
        assert_eq!(body["username"], "ab");
        assert_eq!(body["custom"]["plan"], "pro");
        // Absent optional fields are omitted entirely
        assert!(body.get("image").is_none());
        assert!(body.get("name").is_none());
    }

    #[tokio::test]
    async fn test_signup_extracts_detailed_error_codes() {
        let http = Arc::new(StubHttpClient::returning(
            422,
            json!({"error": {"details": [{"error_type": "required", "parameter": "email"}]}}),
        ));
        let module = module(http);

        let err = module
            .signup(&UserDetails::new("", "secret"))
            .await
            .unwrap_err();

        match err {
            AuthError::SignupRejected { codes } => {
                assert_eq!(codes, vec!["required_email".to_string()]);
            }
            other => panic!("expected SignupRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_transport_failure_yields_empty_code_list() {
        let http = Arc::new(StubHttpClient::failing("dns failure"));
        let module = module(http);

        let err = module
            .signup(&UserDetails::new("a@b.com", "secret"))
            .await
            .unwrap_err();

        match err {
            AuthError::SignupRejected { codes } => assert!(codes.is_empty()),
            other => panic!("expected SignupRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_detailed_error_codes_multiple_entries() {
        let body = serde_json::to_vec(&json!({
            "error": {"details": [
                {"error_type": "required", "parameter": "email"},
                {"error_type": "conflict", "parameter": "username"},
            ]}
        }))
        .unwrap();

        assert_eq!(
            detailed_error_codes(&body),
            vec!["required_email".to_string(), "conflict_username".to_string()]
        );
    }

    #[test]
    fn test_detailed_error_codes_degrade_gracefully() {
        assert!(detailed_error_codes(b"").is_empty());
        assert!(detailed_error_codes(b"not json").is_empty());
        assert!(detailed_error_codes(br#"{"error": "plain string"}"#).is_empty());
        assert!(detailed_error_codes(br#"{"unrelated": true}"#).is_empty());
    }
}
