use std::sync::OnceLock;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_types::auth::signup_error_message;
use shared_types::{extract_pools, Pool, PoolDraft, PoolId, SignupRequest, TokenPair, User};

use super::config::ApiConfig;
use super::error::ApiError;

static API_CLIENT: OnceLock<ApiClient> = OnceLock::new();

pub fn init_client(config: ApiConfig) -> Result<(), ApiError> {
    let client = ApiClient::new(config)?;
    API_CLIENT
        .set(client)
        .map_err(|_| ApiError::Client("API client already initialized".to_string()))
}

pub fn get_client() -> Result<&'static ApiClient, ApiError> {
    API_CLIENT.get().ok_or(ApiError::NotInitialized)
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // A missing or empty token means the request goes out anonymously; the
    // API decides what an anonymous caller may see.
    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.config.endpoint(path));
        match token.filter(|t| !t.is_empty()) {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                self.config.authorization(token),
            ),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body_excerpt(&body), "pool API error");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    pub async fn list_pools(&self, token: Option<&str>) -> Result<Vec<Pool>, ApiError> {
        let payload: Value =
            Self::send_json(self.request(Method::GET, "pool/all/", token)).await?;
        let pools = extract_pools(payload);
        tracing::debug!(count = pools.len(), "fetched pools");
        Ok(pools)
    }

    pub async fn get_pool(&self, id: PoolId, token: Option<&str>) -> Result<Pool, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("pool/all/{id}/"), token)).await
    }

    pub async fn create_pool(
        &self,
        draft: &PoolDraft,
        token: Option<&str>,
    ) -> Result<Pool, ApiError> {
        Self::send_json(
            self.request(Method::POST, "pool/create/", token)
                .json(draft),
        )
        .await
    }

    pub async fn update_pool(
        &self,
        id: PoolId,
        draft: &PoolDraft,
        token: Option<&str>,
    ) -> Result<Pool, ApiError> {
        Self::send_json(
            self.request(Method::PATCH, &format!("pool/all/{id}/"), token)
                .json(draft),
        )
        .await
    }

    pub async fn set_pool_active(
        &self,
        id: PoolId,
        is_active: bool,
        token: Option<&str>,
    ) -> Result<Pool, ApiError> {
        Self::send_json(
            self.request(Method::PATCH, &format!("pool/all/{id}/"), token)
                .json(&json!({ "is_active": is_active })),
        )
        .await
    }

    pub async fn obtain_token(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let builder = self
            .request(Method::POST, "auth/jwt/create/", None)
            .json(&json!({ "email": email, "password": password }));
        match Self::send_json(builder).await {
            Err(ApiError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::BAD_REQUEST.as_u16() =>
            {
                Err(ApiError::Rejected("Invalid email or password.".to_string()))
            }
            other => other,
        }
    }

    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        Self::send_json(self.request(Method::GET, "auth/users/me/", Some(token))).await
    }

    pub async fn register(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "auth/users/", None)
            .json(request)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ApiError::Rejected(signup_error_message(&body)));
        }
        Self::check(response).await.map(|_| ())
    }
}

// Error bodies from the API are JSON detail objects; keep logs to one line.
fn body_excerpt(body: &str) -> String {
    body.chars()
        .take(200)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}
