//! Withings authentication strategy.
//!
//! Withings authenticates users through OAuth 1.0a and reports the user's
//! numeric id as `userid` in the access token response. Applications supply
//! a verify hook which receives the token, its secret and the normalized
//! [`Profile`] and returns the matching application user, or `None` when
//! the credentials are not valid.

use serde_json::Value;

use crate::{
    ConfigResult, OAuthStrategy, OAuthStrategyBuilder, Profile, ProfileError, ProfileResult,
    Provider, ProviderDefaults, StrategyOptions, Verify,
};

/// Name the strategy is registered under, also used as `Profile::provider`.
pub const STRATEGY_NAME: &str = "withings";
pub const DEFAULT_REQUEST_TOKEN_URL: &str = "https://oauth.withings.com/account/request_token";
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "https://oauth.withings.com/account/access_token";
pub const DEFAULT_USER_AUTHORIZATION_URL: &str = "https://oauth.withings.com/account/authorize";
pub const DEFAULT_SESSION_KEY: &str = "oauth:withings";

pub const DEFAULTS: ProviderDefaults = ProviderDefaults {
    request_token_url: DEFAULT_REQUEST_TOKEN_URL,
    access_token_url: DEFAULT_ACCESS_TOKEN_URL,
    user_authorization_url: DEFAULT_USER_AUTHORIZATION_URL,
    session_key: DEFAULT_SESSION_KEY,
};

const USER_ID_KEY: &str = "userid";

/// Withings profile mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Withings;

impl Provider for Withings {
    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn user_profile(
        &self,
        _token: &str,
        _token_secret: &str,
        params: &Value,
    ) -> ProfileResult<Profile> {
        // only null has no fields at all, any other value just lacks userid
        if params.is_null() {
            return Err(ProfileError::NotAMapping("null"));
        }
        // copied as is, a missing userid yields a profile without id
        Ok(Profile::new(STRATEGY_NAME).id(params.get(USER_ID_KEY).cloned()))
    }
}

/// OAuth 1.0a strategy preconfigured for Withings.
///
/// ```ignore
/// use withings_oauth1::{verify_fn, StrategyOptions, WithingsStrategy};
///
/// let strategy = WithingsStrategy::new(
///     StrategyOptions::new()
///         .consumer("128-bit-consumer-key", "128-bit-consumer-secret")
///         .callback_url("https://www.example.net/auth/withings/callback"),
///     verify_fn(|_token: &str, _secret: &str, profile| Ok(profile.id)),
/// )?;
/// ```
pub type WithingsStrategy<U> = OAuthStrategy<Withings, U>;

impl<U> OAuthStrategy<Withings, U>
where
    U: Send + 'static,
{
    /// Builds a Withings strategy, falling back to the Withings endpoints
    /// and session key for every option the caller left unset.
    pub fn new<V>(options: StrategyOptions, verify: V) -> ConfigResult<Self>
    where
        V: Verify<User = U> + 'static,
    {
        Self::builder(options).verify(verify).build()
    }

    pub fn builder(options: StrategyOptions) -> OAuthStrategyBuilder<Withings, U> {
        OAuthStrategyBuilder::new(options.with_defaults(&DEFAULTS), Withings)
    }
}
