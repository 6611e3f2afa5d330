//! End-to-end login flows against scripted host capabilities.
//!
//! Exercises the full path: module dispatch, HTTP exchange, browser
//! handshake, token persistence across tiers, event emission, and logout.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, BrowserSurface, HttpClient, HttpRequest, HttpResponse, InAppBrowser, KeyValueStorage,
    PageEvent,
};
use bytes::Bytes;
use core_auth::{
    AuthData, AuthError, AuthModuleKind, AuthService, BasicCredentials, LoginOptions, User,
    UserDetails, UserService,
};
use core_runtime::config::ClientConfig;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const CALLBACK: &str = "https://app.example.com/oauth";

struct StubHttpClient {
    responses: Mutex<VecDeque<HttpResponse>>,
    call_count: AtomicUsize,
}

impl StubHttpClient {
    fn with_responses(responses: Vec<(u16, serde_json::Value)>) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| HttpResponse {
                        status,
                        headers: Default::default(),
                        body: Bytes::from(serde_json::to_vec(&body).unwrap()),
                    })
                    .collect(),
            ),
            call_count: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BridgeError::OperationFailed("no scripted response".to_string()))
    }
}

#[derive(Default)]
struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

struct ScriptedBrowser {
    events: Mutex<Option<Vec<PageEvent>>>,
    close_count: Arc<AtomicUsize>,
}

impl ScriptedBrowser {
    fn with_events(events: Vec<PageEvent>) -> Self {
        Self {
            events: Mutex::new(Some(events)),
            close_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

impl InAppBrowser for ScriptedBrowser {
    fn open(&self, _url: &str, _target: &str, _options: &str) -> BridgeResult<Box<dyn BrowserSurface>> {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in self.events.lock().unwrap().take().unwrap_or_default() {
            tx.send(event).ok();
        }
        Ok(Box::new(ScriptedSurface {
            events: Some(rx),
            close_count: self.close_count.clone(),
        }))
    }
}

struct ScriptedSurface {
    events: Option<mpsc::UnboundedReceiver<PageEvent>>,
    close_count: Arc<AtomicUsize>,
}

impl BrowserSurface for ScriptedSurface {
    fn events(&mut self) -> mpsc::UnboundedReceiver<PageEvent> {
        self.events.take().unwrap_or_else(|| {
            let (_tx, rx) = mpsc::unbounded_channel();
            rx
        })
    }

    fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory stand-in for the host user service.
#[derive(Default)]
struct StubUserService {
    current: Mutex<Option<User>>,
    persisted: Mutex<Option<User>>,
}

#[async_trait]
impl UserService for StubUserService {
    async fn load(&self) -> BridgeResult<()> {
        *self.current.lock().unwrap() = Some(User {
            email: "a@b.com".to_string(),
            ..Default::default()
        });
        Ok(())
    }

    async fn current(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    async fn store(&self) -> BridgeResult<()> {
        *self.persisted.lock().unwrap() = self.current.lock().unwrap().clone();
        Ok(())
    }

    async fn unstore(&self) -> BridgeResult<()> {
        *self.persisted.lock().unwrap() = None;
        Ok(())
    }

    async fn clear(&self) {
        *self.current.lock().unwrap() = None;
    }
}

struct Harness {
    http: Arc<StubHttpClient>,
    durable: Arc<MemoryStorage>,
    session: Arc<MemoryStorage>,
    users: Arc<StubUserService>,
    events: EventBus,
    service: AuthService,
}

fn harness(
    responses: Vec<(u16, serde_json::Value)>,
    browser: Option<Arc<ScriptedBrowser>>,
) -> Harness {
    let http = Arc::new(StubHttpClient::with_responses(responses));
    let durable = Arc::new(MemoryStorage::default());
    let session = Arc::new(MemoryStorage::default());
    let users = Arc::new(StubUserService::default());
    let events = EventBus::new(16);

    let mut builder = ClientConfig::builder()
        .app_id("testapp")
        .api_url("https://api.example.com")
        .auth_callback_url(CALLBACK)
        .http_client(http.clone())
        .durable_storage(durable.clone())
        .session_storage(session.clone());
    if let Some(browser) = browser {
        builder = builder.in_app_browser(browser);
    }
    let config = builder.build().unwrap();

    let service = AuthService::new(&config, events.clone(), users.clone());

    Harness {
        http,
        durable,
        session,
        users,
        events,
        service,
    }
}

#[tokio::test]
async fn password_login_persists_token_and_user() {
    let h = harness(vec![(200, json!({"data": {"token": "abc"}}))], None);
    let mut subscriber = h.events.subscribe();

    let user = h
        .service
        .login(
            AuthModuleKind::Basic,
            AuthData::Basic(BasicCredentials::new("a@b.com", "p")),
            LoginOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(user.email, "a@b.com");
    assert!(h.service.is_authenticated().await.unwrap());
    assert_eq!(
        h.durable.get("auth_testapp").await.unwrap().as_deref(),
        Some("abc")
    );
    assert_eq!(h.session.get("auth_testapp").await.unwrap(), None);
    assert!(h.users.persisted.lock().unwrap().is_some());

    assert_eq!(
        subscriber.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::TokenChanged {
            old: None,
            new: Some("abc".to_string()),
        })
    );
}

#[tokio::test]
async fn browser_login_resolves_redirect_token() {
    let browser = Arc::new(ScriptedBrowser::with_events(vec![PageEvent::LoadStart {
        url: format!("{}?token=xyz", CALLBACK),
    }]));
    let h = harness(
        vec![(
            200,
            json!({"data": {"url": "https://provider.example/authorize"}}),
        )],
        Some(browser.clone()),
    );

    let user = h
        .service
        .login(
            AuthModuleKind::Github,
            AuthData::None,
            LoginOptions { remember: false },
        )
        .await
        .unwrap();

    assert_eq!(user.email, "a@b.com");
    assert_eq!(browser.close_count(), 1);

    // Session-only login leaves the durable tier alone
    assert_eq!(h.durable.get("auth_testapp").await.unwrap(), None);
    assert_eq!(
        h.session.get("auth_testapp").await.unwrap().as_deref(),
        Some("xyz")
    );
}

#[tokio::test]
async fn browser_login_without_capability_fails_before_io() {
    let h = harness(vec![], None);

    let err = h
        .service
        .login(
            AuthModuleKind::Google,
            AuthData::None,
            LoginOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::CapabilityMissing { .. }));
    assert_eq!(h.http.call_count(), 0);
    assert!(!h.service.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn mismatched_redirect_leaves_surface_open() {
    let browser = Arc::new(ScriptedBrowser::with_events(vec![PageEvent::LoadStart {
        url: "https://unrelated.example.com/landing".to_string(),
    }]));
    let h = harness(
        vec![(
            200,
            json!({"data": {"url": "https://provider.example/authorize"}}),
        )],
        Some(browser.clone()),
    );

    let err = h
        .service
        .login(
            AuthModuleKind::Twitter,
            AuthData::None,
            LoginOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        AuthError::FlowAborted(reason) => assert_eq!(reason, "unexpected redirect URL"),
        other => panic!("expected FlowAborted, got {:?}", other),
    }
    assert_eq!(browser.close_count(), 0);
}

#[tokio::test]
async fn signup_reports_structured_error_codes() {
    let h = harness(
        vec![(
            422,
            json!({"error": {"details": [{"error_type": "required", "parameter": "email"}]}}),
        )],
        None,
    );

    let err = h
        .service
        .signup(&UserDetails::new("", "secret"))
        .await
        .unwrap_err();

    match err {
        AuthError::SignupRejected { codes } => assert_eq!(codes, vec!["required_email".to_string()]),
        other => panic!("expected SignupRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn logout_clears_tiers_and_releases_user() {
    let h = harness(vec![(200, json!({"data": {"token": "abc"}}))], None);

    h.service
        .login(
            AuthModuleKind::Basic,
            AuthData::Basic(BasicCredentials::new("a@b.com", "p")),
            LoginOptions::default(),
        )
        .await
        .unwrap();

    h.service.logout().await.unwrap();

    assert!(!h.service.is_authenticated().await.unwrap());
    assert_eq!(h.durable.get("auth_testapp").await.unwrap(), None);
    assert_eq!(h.session.get("auth_testapp").await.unwrap(), None);
    assert!(h.users.current.lock().unwrap().is_none());
    assert!(h.users.persisted.lock().unwrap().is_none());
}

#[tokio::test]
async fn relogin_after_logout_reports_previous_token() {
    let h = harness(
        vec![
            (200, json!({"data": {"token": "first"}})),
            (200, json!({"data": {"token": "second"}})),
        ],
        None,
    );
    let mut subscriber = h.events.subscribe();

    let credentials = AuthData::Basic(BasicCredentials::new("a@b.com", "p"));

    h.service
        .login(
            AuthModuleKind::Basic,
            credentials.clone(),
            LoginOptions::default(),
        )
        .await
        .unwrap();
    h.service.logout().await.unwrap();
    h.service
        .login(AuthModuleKind::Basic, credentials, LoginOptions::default())
        .await
        .unwrap();

    // The cache tracks the last stored token, not the storage state, so the
    // second event still reports the pre-logout value as `old`.
    assert_eq!(
        subscriber.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::TokenChanged {
            old: None,
            new: Some("first".to_string()),
        })
    );
    assert_eq!(
        subscriber.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::TokenChanged {
            old: Some("first".to_string()),
            new: Some("second".to_string()),
        })
    );
}
