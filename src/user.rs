//! User record of the document store
//!
//! Declared for the persistent store that `MONGO_URI` points at. Nothing in
//! this crate reads, writes or authenticates users; the store enforces
//! uniqueness of `email`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// Unique across users
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Asset symbol -> quantity held
    #[serde(default)]
    pub portfolio: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_defaults_to_empty() {
        let json = r#"{"name":"Ana","email":"ana@example.com","password":"$2b$10$hash"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.portfolio.is_empty());
        assert_eq!(user.password_hash, "$2b$10$hash");
    }
}
