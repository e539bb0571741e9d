//! Authentication provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RegisterRequest, TokenResponse, User};

/// Trait for authentication
///
/// Implementations:
/// - `SimpleAuthProvider`: fixed demo accounts with HS256 tokens
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Check credentials and issue an access token
    async fn authenticate(&self, username: &str, password: &str) -> Result<TokenResponse>;

    /// Create a new account
    async fn register(&self, request: RegisterRequest) -> Result<User>;

    /// Resolve an access token to its user
    async fn validate_token(&self, token: &str) -> Result<User>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
