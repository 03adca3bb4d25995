use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request token issued by the provider, pending user authorization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Per-user storage for the request token between the authorization
/// redirect and the provider's callback.
///
/// Implement this over whatever session layer the web framework provides.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<&RequestToken>;

    fn insert(&mut self, key: &str, token: RequestToken);

    fn remove(&mut self, key: &str) -> Option<RequestToken>;
}

impl SessionStore for HashMap<String, RequestToken> {
    fn get(&self, key: &str) -> Option<&RequestToken> {
        HashMap::get(self, key)
    }

    fn insert(&mut self, key: &str, token: RequestToken) {
        HashMap::insert(self, key.to_string(), token);
    }

    fn remove(&mut self, key: &str) -> Option<RequestToken> {
        HashMap::remove(self, key)
    }
}
