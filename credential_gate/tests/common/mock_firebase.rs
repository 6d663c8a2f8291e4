//! Axum-based mock of the Identity Toolkit and Firestore REST endpoints
//!
//! Each test starts its own server on an ephemeral port so tests never share
//! accounts or documents.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{patch, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

pub const MOCK_API_KEY: &str = "test-api-key";
pub const MOCK_PROJECT_ID: &str = "demo-project";

#[derive(Clone, Debug)]
pub struct MockAccount {
    pub uid: String,
    pub email: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, MockAccount>,
    tokens: HashMap<String, String>,
    idp_tokens: HashMap<String, String>,
    documents: HashMap<String, Value>,
    calls: Vec<String>,
    failures: HashMap<String, String>,
    firestore_status: Option<StatusCode>,
    next_id: usize,
}

impl Inner {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn issue_tokens(&mut self, account: &MockAccount) -> Value {
        let id_token = self.next("id-token");
        self.tokens.insert(id_token.clone(), account.uid.clone());
        json!({
            "localId": account.uid,
            "email": account.email,
            "displayName": account.display_name.clone().unwrap_or_default(),
            "idToken": id_token,
            "refreshToken": self.next("refresh-token"),
            "expiresIn": "3600"
        })
    }

    fn account_for_token(&self, id_token: &str) -> Option<MockAccount> {
        let uid = self.tokens.get(id_token)?;
        self.accounts.values().find(|a| &a.uid == uid).cloned()
    }
}

/// Handle to a running mock server and its recorded state
#[derive(Clone)]
pub struct MockFirebase {
    pub base_url: String,
    inner: Arc<Mutex<Inner>>,
}

impl MockFirebase {
    pub async fn start() -> Self {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let app = Router::new()
            .route("/identity/v1/{method}", post(accounts))
            .route(
                "/firestore/v1/projects/{project}/databases/{database}/documents/{collection}/{key}",
                patch(write_document).delete(delete_document),
            )
            .with_state(inner.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            inner,
        }
    }

    pub fn identity_url(&self) -> String {
        format!("{}/identity/v1", self.base_url)
    }

    pub fn firestore_url(&self) -> String {
        format!("{}/firestore/v1", self.base_url)
    }

    pub fn add_account(&self, email: &str, password: &str, display_name: Option<&str>) -> String {
        let mut inner = self.inner.lock().unwrap();
        let uid = inner.next("uid");
        inner.accounts.insert(
            email.to_string(),
            MockAccount {
                uid: uid.clone(),
                email: email.to_string(),
                password: Some(password.to_string()),
                display_name: display_name.map(str::to_string),
            },
        );
        uid
    }

    pub fn add_idp_token(&self, id_token: &str, email: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .idp_tokens
            .insert(id_token.to_string(), email.to_string());
    }

    /// Answer every call to `accounts:{method}` with a REST error `message`
    pub fn fail(&self, method: &str, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .failures
            .insert(method.to_string(), message.to_string());
    }

    /// Answer every Firestore request with `status`
    pub fn fail_firestore(&self, status: StatusCode) {
        self.inner.lock().unwrap().firestore_status = Some(status);
    }

    pub fn account(&self, email: &str) -> Option<MockAccount> {
        self.inner.lock().unwrap().accounts.get(email).cloned()
    }

    pub fn document(&self, collection: &str, key: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap();
        inner.documents.get(&format!("{collection}/{key}")).cloned()
    }

    /// Identity Toolkit methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

fn rest_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "code": 400,
                "message": message,
                "errors": [{"message": message, "domain": "global", "reason": "invalid"}]
            }
        })),
    )
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

// Mirrors the parts of https://cloud.google.com/identity-platform/docs/reference/rest
// that the provider uses.
async fn accounts(
    State(inner): State<Arc<Mutex<Inner>>>,
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(method) = method.strip_prefix("accounts:") else {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    };
    if query.get("key").map(String::as_str) != Some(MOCK_API_KEY) {
        return rest_error("API_KEY_INVALID");
    }

    let mut inner = inner.lock().unwrap();
    inner.calls.push(method.to_string());
    if let Some(message) = inner.failures.get(method) {
        return rest_error(&message.clone());
    }

    match method {
        "signInWithPassword" => {
            let email = str_field(&body, "email");
            let Some(account) = inner.accounts.get(email).cloned() else {
                return rest_error("EMAIL_NOT_FOUND");
            };
            if account.password.as_deref() != Some(str_field(&body, "password")) {
                return rest_error("INVALID_PASSWORD");
            }
            (StatusCode::OK, Json(inner.issue_tokens(&account)))
        }
        "signUp" => {
            let email = str_field(&body, "email").to_string();
            let password = str_field(&body, "password").to_string();
            if !email.contains('@') {
                return rest_error("INVALID_EMAIL");
            }
            if password.len() < 6 {
                return rest_error("WEAK_PASSWORD : Password should be at least 6 characters");
            }
            if inner.accounts.contains_key(&email) {
                return rest_error("EMAIL_EXISTS");
            }
            let account = MockAccount {
                uid: inner.next("uid"),
                email: email.clone(),
                password: Some(password),
                display_name: None,
            };
            inner.accounts.insert(email, account.clone());
            (StatusCode::OK, Json(inner.issue_tokens(&account)))
        }
        "signInWithIdp" => {
            let post_body = str_field(&body, "postBody");
            let id_token = post_body
                .split('&')
                .find_map(|pair| pair.strip_prefix("id_token="))
                .unwrap_or_default()
                .to_string();
            if !post_body.contains("providerId=google.com") || str_field(&body, "requestUri").is_empty() {
                return rest_error("INVALID_IDP_RESPONSE");
            }
            let Some(email) = inner.idp_tokens.get(&id_token).cloned() else {
                return rest_error("INVALID_IDP_RESPONSE : Invalid Idp Response");
            };
            let account = match inner.accounts.get(&email).cloned() {
                Some(account) => account,
                None => {
                    let account = MockAccount {
                        uid: inner.next("uid"),
                        email: email.clone(),
                        password: None,
                        display_name: None,
                    };
                    inner.accounts.insert(email, account.clone());
                    account
                }
            };
            (StatusCode::OK, Json(inner.issue_tokens(&account)))
        }
        "update" => {
            let Some(account) = inner.account_for_token(str_field(&body, "idToken")) else {
                return rest_error("INVALID_ID_TOKEN");
            };
            let display_name = str_field(&body, "displayName").to_string();
            let updated = MockAccount {
                display_name: Some(display_name.clone()),
                ..account
            };
            inner
                .accounts
                .insert(updated.email.clone(), updated.clone());
            (
                StatusCode::OK,
                Json(json!({
                    "localId": updated.uid,
                    "email": updated.email,
                    "displayName": display_name,
                    "providerUserInfo": []
                })),
            )
        }
        "delete" => {
            let Some(account) = inner.account_for_token(str_field(&body, "idToken")) else {
                return rest_error("INVALID_ID_TOKEN");
            };
            inner.accounts.remove(&account.email);
            (
                StatusCode::OK,
                Json(json!({"kind": "identitytoolkit#DeleteAccountResponse"})),
            )
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

fn authorized_uid(inner: &Inner, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    inner.tokens.get(token).cloned()
}

async fn write_document(
    State(inner): State<Arc<Mutex<Inner>>>,
    Path((project, database, collection, key)): Path<(String, String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut inner = inner.lock().unwrap();
    if let Some(status) = inner.firestore_status {
        return (status, Json(json!({"error": {"code": status.as_u16()}})));
    }
    if project != MOCK_PROJECT_ID || database != "(default)" {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    // Security rules: users may only write their own document
    if authorized_uid(&inner, &headers).as_deref() != Some(key.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "status": "PERMISSION_DENIED"}})),
        );
    }
    inner
        .documents
        .insert(format!("{collection}/{key}"), body.clone());
    (StatusCode::OK, Json(body))
}

async fn delete_document(
    State(inner): State<Arc<Mutex<Inner>>>,
    Path((_project, _database, collection, key)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut inner = inner.lock().unwrap();
    if let Some(status) = inner.firestore_status {
        return (status, Json(json!({"error": {"code": status.as_u16()}})));
    }
    if authorized_uid(&inner, &headers).as_deref() != Some(key.as_str()) {
        return (StatusCode::FORBIDDEN, Json(json!({})));
    }
    inner.documents.remove(&format!("{collection}/{key}"));
    (StatusCode::OK, Json(json!({})))
}
