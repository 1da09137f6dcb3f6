use leptos::prelude::*;
use leptos::task::spawn_local;
use shared_types::{AuthStatus, TokenPair, User};

use crate::server::{current_user, obtain_token};

pub const ACCESS_TOKEN_KEY: &str = "piscinas_access_token";
pub const REFRESH_TOKEN_KEY: &str = "piscinas_refresh_token";

#[cfg(feature = "hydrate")]
mod storage {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = localStorage, js_name = getItem)]
        pub fn get_item(key: &str) -> Option<String>;

        #[wasm_bindgen(js_namespace = localStorage, js_name = setItem)]
        pub fn set_item(key: &str, value: &str);

        #[wasm_bindgen(js_namespace = localStorage, js_name = removeItem)]
        pub fn remove_item(key: &str);
    }
}

/// Access token persisted in the browser, if it is present and not expired.
/// Always `None` during server rendering.
pub fn stored_access_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let token = storage::get_item(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let now = chrono::Utc::now().timestamp();
        // Tokens we cannot decode are still sent; the API has the final say.
        match shared_types::auth::decode_claims(&token) {
            Some(claims) if claims.is_expired(now) => {
                leptos::logging::log!("Stored access token expired, discarding it");
                clear_tokens();
                None
            }
            _ => Some(token),
        }
    }

    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn store_tokens(tokens: &TokenPair) {
    #[cfg(feature = "hydrate")]
    {
        storage::set_item(ACCESS_TOKEN_KEY, &tokens.access);
        storage::set_item(REFRESH_TOKEN_KEY, &tokens.refresh);
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = tokens;
    }
}

pub fn clear_tokens() {
    #[cfg(feature = "hydrate")]
    {
        storage::remove_item(ACCESS_TOKEN_KEY);
        storage::remove_item(REFRESH_TOKEN_KEY);
    }
}

/// Session state shared through context. Created once in `App`, hydrated
/// from the persisted token on start and torn down by `logout`.
#[derive(Clone, Copy)]
pub struct AuthSession {
    status: RwSignal<AuthStatus>,
}

impl AuthSession {
    fn new() -> Self {
        Self {
            status: RwSignal::new(AuthStatus::Loading),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.status.with(|status| status.user().cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.status.with(AuthStatus::is_loading)
    }

    pub fn can_manage_pools(&self) -> bool {
        self.status
            .with(|status| status.user().is_some_and(User::can_manage_pools))
    }

    pub async fn login(self, email: String, password: String) -> Result<(), String> {
        self.status.set(AuthStatus::Loading);
        match obtain_token(email, password).await {
            Ok(tokens) => {
                store_tokens(&tokens);
                self.refresh().await;
                match self.status.get_untracked() {
                    AuthStatus::Authenticated(_) => Ok(()),
                    _ => Err("Could not load your account. Please try again.".to_string()),
                }
            }
            Err(err) => {
                self.status.set(AuthStatus::Anonymous);
                Err(server_error_message(&err))
            }
        }
    }

    pub fn logout(&self) {
        clear_tokens();
        self.status.set(AuthStatus::Anonymous);
    }

    /// Re-reads the current user with the persisted token. A rejected token
    /// is dropped so the session falls back to anonymous.
    pub async fn refresh(self) {
        let Some(token) = stored_access_token() else {
            self.status.set(AuthStatus::Anonymous);
            return;
        };

        self.status.set(AuthStatus::Loading);
        match current_user(token).await {
            Ok(user) => self.status.set(AuthStatus::Authenticated(user)),
            Err(err) => {
                leptos::logging::warn!("Session refresh failed: {}", err);
                clear_tokens();
                self.status.set(AuthStatus::Anonymous);
            }
        }
    }
}

pub fn provide_auth_session() -> AuthSession {
    let session = AuthSession::new();
    provide_context(session);

    Effect::new(move |_| {
        spawn_local(session.refresh());
    });

    session
}

pub fn use_auth_session() -> AuthSession {
    expect_context::<AuthSession>()
}

/// Server function errors carry a prefix that is noise for users.
pub fn server_error_message(err: &ServerFnError) -> String {
    match err {
        ServerFnError::ServerError(message) => message.clone(),
        other => other.to_string(),
    }
}
