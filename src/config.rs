use std::convert::TryFrom;

use serde::Deserialize;
use url::Url;

use crate::{ConfigError, ConfigResult};

/// Options accepted by a strategy constructor.
///
/// Every field is optional; providers fill in their endpoints and session
/// key through [`StrategyOptions::with_defaults`], and the remaining checks
/// happen when the options are turned into an [`OAuthConfig`].
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StrategyOptions {
    #[serde(default, alias = "consumerKey")]
    pub consumer_key: Option<String>,
    #[serde(default, alias = "consumerSecret")]
    pub consumer_secret: Option<String>,
    #[serde(default, alias = "callbackURL")]
    pub callback_url: Option<String>,
    #[serde(default, alias = "requestTokenURL")]
    pub request_token_url: Option<String>,
    #[serde(default, alias = "accessTokenURL")]
    pub access_token_url: Option<String>,
    #[serde(default, alias = "userAuthorizationURL")]
    pub user_authorization_url: Option<String>,
    #[serde(default, alias = "sessionKey")]
    pub session_key: Option<String>,
}

impl StrategyOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the consumer key and consumer secret
    pub fn consumer<TKey, TSecret>(self, consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        StrategyOptions {
            consumer_key: Some(consumer_key.into()),
            consumer_secret: Some(consumer_secret.into()),
            ..self
        }
    }

    /// set the URL the provider redirects back to after authorization
    pub fn callback_url<T: Into<String>>(self, callback_url: T) -> Self {
        StrategyOptions {
            callback_url: Some(callback_url.into()),
            ..self
        }
    }

    pub fn request_token_url<T: Into<String>>(self, url: T) -> Self {
        StrategyOptions {
            request_token_url: Some(url.into()),
            ..self
        }
    }

    pub fn access_token_url<T: Into<String>>(self, url: T) -> Self {
        StrategyOptions {
            access_token_url: Some(url.into()),
            ..self
        }
    }

    pub fn user_authorization_url<T: Into<String>>(self, url: T) -> Self {
        StrategyOptions {
            user_authorization_url: Some(url.into()),
            ..self
        }
    }

    pub fn session_key<T: Into<String>>(self, session_key: T) -> Self {
        StrategyOptions {
            session_key: Some(session_key.into()),
            ..self
        }
    }

    /// Fills the endpoint URLs and the session key from `defaults` where
    /// they are unset or empty. Other values are left untouched.
    pub fn with_defaults(self, defaults: &ProviderDefaults) -> Self {
        StrategyOptions {
            request_token_url: or_default(self.request_token_url, defaults.request_token_url),
            access_token_url: or_default(self.access_token_url, defaults.access_token_url),
            user_authorization_url: or_default(
                self.user_authorization_url,
                defaults.user_authorization_url,
            ),
            session_key: or_default(self.session_key, defaults.session_key),
            ..self
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .or_else(|| Some(default.to_string()))
}

/// Endpoint URLs and session key a provider falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub request_token_url: &'static str,
    pub access_token_url: &'static str,
    pub user_authorization_url: &'static str,
    pub session_key: &'static str,
}

/// Validated, immutable strategy configuration.
#[derive(Clone, PartialEq)]
pub struct OAuthConfig {
    consumer_key: String,
    consumer_secret: String,
    callback_url: Option<Url>,
    request_token_url: Url,
    access_token_url: Url,
    user_authorization_url: Url,
    session_key: String,
}

impl OAuthConfig {
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn callback_url(&self) -> Option<&Url> {
        self.callback_url.as_ref()
    }

    pub fn request_token_url(&self) -> &Url {
        &self.request_token_url
    }

    pub fn access_token_url(&self) -> &Url {
        &self.access_token_url
    }

    pub fn user_authorization_url(&self) -> &Url {
        &self.user_authorization_url
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }
}

// consumer_secret is left out on purpose
impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("consumer_key", &self.consumer_key)
            .field("callback_url", &self.callback_url)
            .field("request_token_url", &self.request_token_url)
            .field("access_token_url", &self.access_token_url)
            .field("user_authorization_url", &self.user_authorization_url)
            .field("session_key", &self.session_key)
            .finish()
    }
}

impl TryFrom<StrategyOptions> for OAuthConfig {
    type Error = ConfigError;

    fn try_from(options: StrategyOptions) -> ConfigResult<Self> {
        let consumer_key = match options.consumer_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigError::MissingConsumerKey),
        };
        // an empty secret is legal, a missing one is not
        let consumer_secret = options
            .consumer_secret
            .ok_or(ConfigError::MissingConsumerSecret)?;
        let callback_url = match options.callback_url {
            Some(url) => Some(parse_url("callback_url", &url)?),
            None => None,
        };

        Ok(OAuthConfig {
            consumer_key,
            consumer_secret,
            callback_url,
            request_token_url: required_url("request_token_url", options.request_token_url)?,
            access_token_url: required_url("access_token_url", options.access_token_url)?,
            user_authorization_url: required_url(
                "user_authorization_url",
                options.user_authorization_url,
            )?,
            session_key: options
                .session_key
                .ok_or(ConfigError::MissingOption("session_key"))?,
        })
    }
}

fn required_url(name: &'static str, value: Option<String>) -> ConfigResult<Url> {
    match value {
        Some(url) => parse_url(name, &url),
        None => Err(ConfigError::MissingOption(name)),
    }
}

fn parse_url(name: &'static str, value: &str) -> ConfigResult<Url> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(name, e))
}
