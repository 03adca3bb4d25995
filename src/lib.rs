/*!
withings-oauth1: authenticate users with Withings over OAuth 1.0a.

# Overview

This library provides a Withings authentication strategy on top of a small,
generic OAuth 1.0a strategy built with [reqwest](https://crates.io/crates/reqwest)
and [oauth1-request](https://crates.io/crates/oauth1-request).

The Withings part only knows the default endpoints, the session key, its
name (`withings`) and how to turn the access token response into a
[`Profile`]: the `userid` field becomes `Profile::id`, untouched.

# How to use

## Basic usecase 1 - constructing and registering the strategy

```ignore
use withings_oauth1::{verify_fn, StrategyOptions, StrategyRegistry, WithingsStrategy};

let strategy = WithingsStrategy::new(
    StrategyOptions::new()
        .consumer("128-bit-consumer-key", "128-bit-consumer-secret")
        .callback_url("https://www.example.net/auth/withings/callback"),
    verify_fn(|token: &str, token_secret: &str, profile| {
        // look up or create the application user here
        Ok(Some(User::find_or_create(profile.id)?))
    }),
)?;

let mut registry = StrategyRegistry::new();
registry.register(strategy);
```

## Basic usecase 2 - handling requests

```ignore
use withings_oauth1::{AuthOutcome, CallbackParams};

// `query` is the raw query string of the incoming request, `session` any
// `SessionStore` implementation tied to the user agent.
let callback = CallbackParams::from_query(query)?;
match registry.authenticate("withings", &callback, &mut session).await? {
    AuthOutcome::Redirect(url) => redirect_to(url),
    AuthOutcome::Success(user) => log_in(user),
    AuthOutcome::Fail(message) => reject(message),
}
```

The first request carries no `oauth_token`, so the strategy fetches a
request token, stores it in the session and answers with a redirect to the
Withings authorization page. Withings then calls back with `oauth_token` and
`oauth_verifier`; the strategy exchanges them for an access token, builds the
profile and hands it to the verify hook.
*/
mod config;
mod error;
mod oauth;
mod profile;
mod registry;
mod secrets;
mod session;
mod signer;
mod token_reader;
pub mod withings;

// exposed to external program
pub use config::{OAuthConfig, ProviderDefaults, StrategyOptions};
pub use error::{
    BoxError, ConfigError, ConfigResult, Error, ProfileError, ProfileResult, Result,
    TokenReaderError, TokenReaderResult,
};
pub use oauth::{
    verify_fn, AuthOutcome, CallbackParams, OAuthStrategy, OAuthStrategyBuilder, Provider,
    Verify, VerifyFn, VerifyResult,
};
pub use profile::Profile;
pub use registry::{Authenticator, StrategyRegistry};
pub use secrets::{Secrets, SecretsProvider};
pub use session::{RequestToken, SessionStore};
pub use signer::{OAuthParameters, Signer};
pub use token_reader::{TokenReader, TokenResponse};
pub use withings::{Withings, WithingsStrategy};

// exposed constant variables
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Callback sent with the request token when no callback URL is configured.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";
