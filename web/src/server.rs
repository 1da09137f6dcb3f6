use leptos::prelude::*;
use leptos::server;
use leptos::server_fn::codec::Json;
use shared_types::{Pool, PoolDraft, SignupRequest, TokenPair, User};

#[cfg(feature = "ssr")]
use crate::api::{client::get_client, error::ApiError};
#[cfg(feature = "ssr")]
use shared_types::PoolId;

#[cfg(feature = "ssr")]
fn to_server_error(context: &str, err: ApiError) -> ServerFnError {
    tracing::error!(error = %err, "{context}");
    ServerFnError::new(err.user_message())
}

#[server]
pub async fn fetch_pools(token: Option<String>) -> Result<Vec<Pool>, ServerFnError> {
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    client
        .list_pools(token.as_deref())
        .await
        .map_err(|e| to_server_error("failed to fetch pools", e))
}

#[server]
pub async fn fetch_pool(id: i64, token: Option<String>) -> Result<Pool, ServerFnError> {
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    client
        .get_pool(PoolId(id), token.as_deref())
        .await
        .map_err(|e| to_server_error("failed to fetch pool", e))
}

#[server(input = Json)]
pub async fn create_pool(draft: PoolDraft, token: Option<String>) -> Result<Pool, ServerFnError> {
    draft
        .validate()
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    let pool = client
        .create_pool(&draft, token.as_deref())
        .await
        .map_err(|e| to_server_error("failed to create pool", e))?;
    tracing::info!(pool_id = %pool.id, "pool created");
    Ok(pool)
}

#[server(input = Json)]
pub async fn update_pool(
    id: i64,
    draft: PoolDraft,
    token: Option<String>,
) -> Result<Pool, ServerFnError> {
    draft
        .validate()
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    let pool = client
        .update_pool(PoolId(id), &draft, token.as_deref())
        .await
        .map_err(|e| to_server_error("failed to update pool", e))?;
    tracing::info!(pool_id = %pool.id, "pool updated");
    Ok(pool)
}

#[server]
pub async fn set_pool_active(
    id: i64,
    is_active: bool,
    token: Option<String>,
) -> Result<Pool, ServerFnError> {
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    let pool = client
        .set_pool_active(PoolId(id), is_active, token.as_deref())
        .await
        .map_err(|e| to_server_error("failed to toggle pool", e))?;
    tracing::info!(pool_id = %pool.id, is_active, "pool activity changed");
    Ok(pool)
}

#[server]
pub async fn obtain_token(email: String, password: String) -> Result<TokenPair, ServerFnError> {
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    client
        .obtain_token(&email, &password)
        .await
        .map_err(|e| to_server_error("login failed", e))
}

#[server]
pub async fn current_user(token: String) -> Result<User, ServerFnError> {
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    client
        .current_user(&token)
        .await
        .map_err(|e| to_server_error("failed to load current user", e))
}

#[server(input = Json)]
pub async fn register_user(request: SignupRequest) -> Result<(), ServerFnError> {
    if request.password != request.re_password {
        return Err(ServerFnError::new("Passwords do not match."));
    }
    let client = get_client().map_err(|e| to_server_error("pool API unavailable", e))?;
    client
        .register(&request)
        .await
        .map_err(|e| to_server_error("signup failed", e))
}
