use sha2::{Digest, Sha256};

/// Authenticated state for a single run. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub user_id: String,
    /// Hex SHA-256 of `user_id`, sent as `Account-Id`
    pub account_id: String,
    /// Base URL after any login redirect
    pub base_url: String,
}

impl SessionData {
    pub fn new(token: String, user_id: String, base_url: String) -> Self {
        let account_id = account_id_for(&user_id);
        Self {
            token,
            user_id,
            account_id,
            base_url,
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// The API requires the lowercase hex SHA-256 of the user id on every
/// authenticated request.
pub fn account_id_for(user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hex::encode(hasher.finalize())
}
