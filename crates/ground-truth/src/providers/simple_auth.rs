//! Development auth provider with a fixed account table
//!
//! Passwords are compared in plaintext. Not for production use.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::types::{Claims, RegisterRequest, TokenResponse, User};

use super::auth::AuthProvider;

const DEFAULT_ROLE: &str = "contributor";

struct Account {
    user: User,
    /// Short login alias accepted in place of the email
    username: Option<String>,
    password: String,
}

impl Account {
    fn matches_login(&self, login: &str) -> bool {
        self.user.email == login || self.username.as_deref() == Some(login)
    }
}

fn demo_accounts() -> Vec<Account> {
    vec![
        Account {
            user: User {
                id: "user_1".to_string(),
                name: "Demo User".to_string(),
                email: "demo@example.com".to_string(),
                roles: vec![DEFAULT_ROLE.to_string()],
            },
            username: Some("demo".to_string()),
            password: "password".to_string(),
        },
        Account {
            user: User {
                id: "user_2".to_string(),
                name: "Admin User".to_string(),
                email: "admin@example.com".to_string(),
                roles: vec![DEFAULT_ROLE.to_string(), "admin".to_string()],
            },
            username: Some("admin".to_string()),
            password: "admin123".to_string(),
        },
    ]
}

/// Auth provider over an in-memory account table
pub struct SimpleAuthProvider {
    config: AuthConfig,
    accounts: RwLock<Vec<Account>>,
}

impl SimpleAuthProvider {
    /// Create a provider seeded with the demo and admin accounts
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            accounts: RwLock::new(demo_accounts()),
        }
    }

    fn token_lifetime(&self) -> Result<Duration> {
        Duration::try_minutes(self.config.token_expire_minutes).ok_or_else(|| {
            Error::Config(format!(
                "Token lifetime out of range: {} minutes",
                self.config.token_expire_minutes
            ))
        })
    }

    /// Sign an access token for a user
    pub fn create_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.token_lifetime()?)
            .ok_or_else(|| Error::Config("Token expiry overflows the calendar".to_string()))?;

        let claims = Claims {
            sub: user.email.clone(),
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.config.secret_key.as_bytes());

        Ok(encode(&header, &claims, &key)?)
    }

    /// Verify a token signature and expiry and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let key = DecodingKey::from_secret(self.config.secret_key.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                Error::unauthorized("Could not validate credentials")
            })
    }
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn authenticate(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let user = {
            let accounts = self.accounts.read();
            accounts
                .iter()
                .find(|account| account.matches_login(username))
                .filter(|account| account.password == password)
                .map(|account| account.user.clone())
        };

        let Some(user) = user else {
            tracing::warn!("Failed login attempt for '{}'", username);
            return Err(Error::unauthorized("Incorrect username or password"));
        };

        let access_token = self.create_token(&user)?;
        let expires_in = self.token_lifetime()?.num_seconds();
        tracing::info!("User {} logged in", user.email);

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
            user,
        })
    }

    async fn register(&self, request: RegisterRequest) -> Result<User> {
        let email = request.email.trim().to_string();
        if email.is_empty() || request.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let mut accounts = self.accounts.write();
        let taken = accounts.iter().any(|account| {
            account.matches_login(&email)
                || request
                    .username
                    .as_deref()
                    .is_some_and(|username| account.matches_login(username))
        });
        if taken {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let user = User {
            id: format!("user_{}", accounts.len() + 1),
            name,
            email,
            roles: vec![DEFAULT_ROLE.to_string()],
        };

        accounts.push(Account {
            user: user.clone(),
            username: request.username,
            password: request.password,
        });
        tracing::info!("Registered user {} ({})", user.id, user.email);

        Ok(user)
    }

    async fn validate_token(&self, token: &str) -> Result<User> {
        let claims = self.verify_token(token)?;

        self.accounts
            .read()
            .iter()
            .find(|account| account.user.email == claims.sub)
            .map(|account| account.user.clone())
            .ok_or_else(|| Error::unauthorized("User not found"))
    }

    fn name(&self) -> &str {
        "simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SimpleAuthProvider {
        SimpleAuthProvider::new(AuthConfig::default())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "pw".to_string(),
            name: None,
            username: None,
        }
    }

    #[tokio::test]
    async fn test_login_with_email_or_alias() {
        let auth = provider();

        let by_alias = auth.authenticate("demo", "password").await.unwrap();
        assert_eq!(by_alias.token_type, "bearer");
        assert_eq!(by_alias.expires_in, 1800);
        assert_eq!(by_alias.user.id, "user_1");

        let by_email = auth.authenticate("admin@example.com", "admin123").await.unwrap();
        assert!(by_email.user.has_role("admin"));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let auth = provider();

        let wrong_password = auth.authenticate("demo", "nope").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), "Incorrect username or password");

        let unknown = auth.authenticate("ghost", "password").await;
        assert!(matches!(unknown, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let auth = provider();
        let token = auth.authenticate("admin", "admin123").await.unwrap().access_token;

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.exp - claims.iat, 30 * 60);

        let user = auth.validate_token(&token).await.unwrap();
        assert_eq!(user.name, "Admin User");
    }

    #[tokio::test]
    async fn test_invalid_tokens() {
        let auth = provider();

        let garbage = auth.validate_token("not.a.token").await.unwrap_err();
        assert_eq!(garbage.to_string(), "Could not validate credentials");

        let other = SimpleAuthProvider::new(AuthConfig {
            secret_key: "another-secret".to_string(),
            ..AuthConfig::default()
        });
        let foreign = other.authenticate("demo", "password").await.unwrap().access_token;
        assert!(auth.validate_token(&foreign).await.is_err());

        let expired = SimpleAuthProvider::new(AuthConfig {
            token_expire_minutes: -10,
            ..AuthConfig::default()
        });
        let stale = expired.authenticate("demo", "password").await.unwrap().access_token;
        assert!(matches!(
            expired.validate_token(&stale).await,
            Err(Error::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_config_error() {
        let auth = SimpleAuthProvider::new(AuthConfig {
            token_expire_minutes: i64::MAX / 2,
            ..AuthConfig::default()
        });

        let result = auth.authenticate("demo", "password").await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_register() {
        let auth = provider();

        let user = auth.register(register_request("new@example.com")).await.unwrap();
        assert_eq!(user.id, "user_3");
        assert_eq!(user.name, "new");
        assert_eq!(user.roles, vec!["contributor"]);

        let token = auth.authenticate("new@example.com", "pw").await.unwrap();
        assert_eq!(token.user, user);

        let duplicate = auth.register(register_request("demo@example.com")).await.unwrap_err();
        assert_eq!(duplicate.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_token_for_unknown_user() {
        let auth = provider();
        let ghost = User {
            id: "user_9".to_string(),
            name: "Ghost".to_string(),
            email: "ghost@example.com".to_string(),
            roles: vec![],
        };
        let token = auth.create_token(&ghost).unwrap();

        let err = auth.validate_token(&token).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
