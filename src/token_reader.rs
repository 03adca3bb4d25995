use async_trait::async_trait;
use reqwest::Response;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Result, TokenReaderError, TokenReaderResult, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// Represents response of token acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Every other field of the response, as a JSON object of strings
    pub params: Value,
}

/// Add parse_oauth_token feature to reqwest::Response.
// this trait is sealed
#[async_trait]
pub trait TokenReader: private::Sealed {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;
}

#[async_trait]
impl TokenReader for Response {
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        let status = self.status();
        let text = self.text().await?;
        debug!(status = status.as_u16(), "token endpoint responded");
        if !status.is_success() {
            return Err(TokenReaderError::UnexpectedStatus(status.as_u16(), text).into());
        }
        Ok(read_oauth_token(text)?)
    }
}

pub(crate) fn read_oauth_token(text: String) -> TokenReaderResult<TokenResponse> {
    let mut params = url::form_urlencoded::parse(text.trim().as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect::<Map<String, Value>>();
    let oauth_token = take_string(&mut params, OAUTH_TOKEN_KEY);
    let oauth_token_secret = take_string(&mut params, OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            params: Value::Object(params),
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

fn take_string(params: &mut Map<String, Value>, key: &str) -> Option<String> {
    match params.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

mod private {
    use reqwest::Response;

    pub trait Sealed {}
    impl Sealed for Response {}
}
