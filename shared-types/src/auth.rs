use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Inspector,
    #[default]
    Citizen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Admins and inspectors may create and edit pools.
    pub fn can_manage_pools(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Inspector)
    }

    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Loading,
    Authenticated(User),
}

impl AuthStatus {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthStatus::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
}

/// Turns the field errors of a rejected signup into one readable sentence.
pub fn signup_error_message(body: &Value) -> String {
    let mut messages: Vec<String> = Vec::new();
    if body.get("email").is_some() {
        messages.push("This email is already registered.".to_string());
    }
    if body.get("username").is_some() {
        messages.push("This username is already taken.".to_string());
    }
    if body.get("password").is_some() {
        messages.push("The password does not meet the requirements.".to_string());
    }
    if let Some(Value::Array(errors)) = body.get("non_field_errors") {
        messages.extend(errors.iter().filter_map(Value::as_str).map(str::to_string));
    }

    if messages.is_empty() {
        "Signup failed. Please try again.".to_string()
    } else {
        messages.join(" ")
    }
}

/// Payload of an access token as issued by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.exp <= now_unix
    }
}

/// Reads the claims of a JWT without verifying its signature. Only used to
/// drop tokens that have obviously expired; the API still decides access.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    // user_id is a UUID string upstream, but tolerate numeric ids too.
    let user_id = match claims.get("user_id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };

    Some(Claims {
        exp: claims.get("exp")?.as_i64()?,
        user_id,
        token_type: claims
            .get("token_type")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with(payload: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn decodes_access_token_claims() {
        let token = token_with(json!({
            "token_type": "access",
            "exp": 1_900_000_000,
            "user_id": "4f0c2b4e-1d2a-4a43-9a55-0c0d8f1d7c11"
        }));
        let claims = decode_claims(&token).unwrap();

        assert_eq!(claims.exp, 1_900_000_000);
        assert_eq!(claims.token_type.as_deref(), Some("access"));
        assert!(!claims.is_expired(1_800_000_000));
        assert!(claims.is_expired(1_900_000_000));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("a.b").is_none());
        assert!(decode_claims("a.b.c.d").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
        assert!(decode_claims(&token_with(json!({ "user_id": 1 }))).is_none());
    }

    #[test]
    fn signup_errors_are_friendly() {
        let body = json!({
            "email": ["user account with this email already exists."],
            "non_field_errors": ["Passwords do not match."]
        });
        assert_eq!(
            signup_error_message(&body),
            "This email is already registered. Passwords do not match."
        );
        assert_eq!(
            signup_error_message(&json!({})),
            "Signup failed. Please try again."
        );
    }

    #[test]
    fn pool_managers() {
        let mut user = User {
            id: "1".to_string(),
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Citizen,
        };
        assert!(!user.can_manage_pools());
        assert_eq!(user.full_name(), "ana");

        user.role = Role::Inspector;
        user.first_name = "Ana".to_string();
        assert!(user.can_manage_pools());
        assert_eq!(user.full_name(), "Ana");
    }
}
