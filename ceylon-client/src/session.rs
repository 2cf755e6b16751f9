//! Session context
//!
//! One object owns the auth token, the role and the preferred language.
//! "Remember me" logins persist to the local store (a JSON file); other
//! logins live in the in-memory session store and end with the process.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::models::Role;

use crate::{ClientResult, HttpClient};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ROLE_KEY: &str = "userRole";
pub const PREFERRED_LANGUAGE_KEY: &str = "preferredLanguage";

/// Key/value storage behind the session
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Process-lifetime storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.values().remove(key);
        Ok(())
    }
}

/// Storage persisted as one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file is an empty store
    fn load(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save(&self, values: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut values = self.load();
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Where the app should navigate next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    AdminDashboard,
    CustomerDashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::AdminDashboard => "/admin",
            Route::CustomerDashboard => "/dashboard",
        }
    }

    /// Landing page after a successful login
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::Customer => Route::CustomerDashboard,
        }
    }
}

/// The signed-in state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub role: Role,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Session context shared by the whole app
pub struct Session {
    http: HttpClient,
    local: Box<dyn SessionStore>,
    session: MemoryStore,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.get_session().is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restore any remembered login into the HTTP client
    pub fn new(http: HttpClient, local: Box<dyn SessionStore>) -> Self {
        let session = Self {
            http,
            local,
            session: MemoryStore::new(),
        };
        if let Some(auth) = session.get_session() {
            session.http.set_token(Some(auth.token));
        }
        session
    }

    /// Session backed by memory only
    pub fn in_memory(http: HttpClient) -> Self {
        Self::new(http, Box::new(MemoryStore::new()))
    }

    /// Log in and store the token and role; `remember` persists them locally
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> ClientResult<Route> {
        let request = LoginRequest {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("users/login", &request).await?;

        self.clear_auth()?;
        let store: &dyn SessionStore = if remember {
            self.local.as_ref()
        } else {
            &self.session
        };
        store.set(AUTH_TOKEN_KEY, &response.token)?;
        store.set(USER_ROLE_KEY, response.role.as_str())?;
        self.http.set_token(Some(response.token));

        tracing::info!(user_id = response.user.id, role = %response.role, "Logged in");
        Ok(Route::dashboard_for(response.role))
    }

    /// Clear both stores and return to the home page
    pub fn logout(&self) -> ClientResult<Route> {
        self.clear_auth()?;
        self.http.set_token(None);
        Ok(Route::Home)
    }

    /// Current token and role; the in-memory store wins over the local one
    pub fn get_session(&self) -> Option<AuthSession> {
        [&self.session as &dyn SessionStore, self.local.as_ref()]
            .into_iter()
            .find_map(read_auth)
    }

    pub fn is_logged_in(&self) -> bool {
        self.get_session().is_some()
    }

    /// Profile of the signed-in user
    pub async fn current_user(&self) -> ClientResult<UserInfo> {
        let user: shared::models::User = self.http.get("users/me").await?;
        Ok(user.into())
    }

    pub fn preferred_language(&self) -> Option<String> {
        self.local.get(PREFERRED_LANGUAGE_KEY)
    }

    /// Language survives logout
    pub fn set_preferred_language(&self, language: &str) -> ClientResult<()> {
        self.local.set(PREFERRED_LANGUAGE_KEY, language.trim())
    }

    fn clear_auth(&self) -> ClientResult<()> {
        for store in [&self.session as &dyn SessionStore, self.local.as_ref()] {
            store.remove(AUTH_TOKEN_KEY)?;
            store.remove(USER_ROLE_KEY)?;
        }
        Ok(())
    }
}

/// Both keys present and the role recognized
fn read_auth(store: &dyn SessionStore) -> Option<AuthSession> {
    let token = store.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())?;
    let role = store.get(USER_ROLE_KEY)?.parse().ok()?;
    Some(AuthSession { token, role })
}
