use std::{convert::TryFrom, fmt, marker::PhantomData};

use async_trait::async_trait;
use http::{header::AUTHORIZATION, Method};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    BoxError, ConfigError, ConfigResult, Error, OAuthConfig, OAuthParameters, Profile,
    ProfileResult, RequestToken, Result, Secrets, SessionStore, Signer, StrategyOptions,
    TokenReader, TokenResponse, OAUTH_TOKEN_KEY, OUT_OF_BAND_CALLBACK,
};

/// Provider-specific half of a strategy: its name and how its token
/// exchange response maps onto a [`Profile`].
pub trait Provider: Send + Sync {
    /// Name the strategy is registered and dispatched under.
    fn name(&self) -> &'static str;

    /// Builds the normalized profile from the access token response.
    ///
    /// `params` holds every field of that response other than the token
    /// and its secret. This is called once per successful exchange and
    /// must not perform I/O.
    fn user_profile(&self, token: &str, token_secret: &str, params: &Value)
        -> ProfileResult<Profile>;
}

pub type VerifyResult<T> = std::result::Result<T, BoxError>;

/// Application hook deciding which user a verified profile belongs to.
///
/// `Ok(Some(user))` authenticates, `Ok(None)` rejects the credentials and
/// `Err(_)` reports an application failure.
#[async_trait]
pub trait Verify: Send + Sync {
    type User: Send;

    async fn verify(
        &self,
        token: &str,
        token_secret: &str,
        profile: Profile,
    ) -> VerifyResult<Option<Self::User>>;
}

/// [`Verify`] implementation backed by a plain closure.
pub struct VerifyFn<F, U> {
    f: F,
    _user: PhantomData<fn() -> U>,
}

/// Wraps a closure as a [`Verify`] hook.
pub fn verify_fn<F, U>(f: F) -> VerifyFn<F, U>
where
    F: Fn(&str, &str, Profile) -> VerifyResult<Option<U>> + Send + Sync,
{
    VerifyFn {
        f,
        _user: PhantomData,
    }
}

#[async_trait]
impl<F, U> Verify for VerifyFn<F, U>
where
    F: Fn(&str, &str, Profile) -> VerifyResult<Option<U>> + Send + Sync,
    U: Send,
{
    type User = U;

    async fn verify(
        &self,
        token: &str,
        token_secret: &str,
        profile: Profile,
    ) -> VerifyResult<Option<U>> {
        (self.f)(token, token_secret, profile)
    }
}

/// Query parameters the provider appends to the callback URL.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    pub denied: Option<String>,
}

impl CallbackParams {
    pub fn from_query(query: &str) -> Result<Self> {
        Ok(serde_urlencoded::from_str(query)?)
    }
}

/// Result of a single authentication step.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<U> {
    /// Send the user agent to the provider's authorization page.
    Redirect(Url),
    /// The verify hook accepted the user.
    Success(U),
    /// The attempt was rejected.
    Fail(String),
}

/// Generic OAuth 1.0a strategy.
///
/// Runs the request token, authorization and access token steps against
/// the configured endpoints, then hands the exchange result to the
/// [`Provider`] and the [`Verify`] hook.
pub struct OAuthStrategy<P, U: Send> {
    config: OAuthConfig,
    client: ReqwestClient,
    provider: P,
    verify: Box<dyn Verify<User = U>>,
}

impl<P, U> fmt::Debug for OAuthStrategy<P, U>
where
    P: Provider,
    U: Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthStrategy")
            .field("name", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

pub struct OAuthStrategyBuilder<P, U: Send> {
    options: StrategyOptions,
    provider: P,
    verify: Option<Box<dyn Verify<User = U>>>,
    client: Option<ReqwestClient>,
}

impl<P, U> OAuthStrategyBuilder<P, U>
where
    P: Provider,
    U: Send + 'static,
{
    pub fn new(options: StrategyOptions, provider: P) -> Self {
        OAuthStrategyBuilder {
            options,
            provider,
            verify: None,
            client: None,
        }
    }

    /// Set the hook that turns a verified profile into an application user.
    pub fn verify<V>(self, verify: V) -> Self
    where
        V: Verify<User = U> + 'static,
    {
        OAuthStrategyBuilder {
            verify: Some(Box::new(verify)),
            ..self
        }
    }

    /// Use `client` for token endpoint calls instead of a default one.
    pub fn client(self, client: ReqwestClient) -> Self {
        OAuthStrategyBuilder {
            client: Some(client),
            ..self
        }
    }

    pub fn build(self) -> ConfigResult<OAuthStrategy<P, U>> {
        let verify = self.verify.ok_or(ConfigError::MissingVerify)?;
        let config = OAuthConfig::try_from(self.options)?;
        Ok(OAuthStrategy {
            config,
            client: self.client.unwrap_or_default(),
            provider: self.provider,
            verify,
        })
    }
}

impl<P, U> OAuthStrategy<P, U>
where
    P: Provider,
    U: Send + 'static,
{
    pub fn name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Runs the step matching `callback`: a denial fails, a returned token
    /// completes the exchange, anything else starts a new authorization.
    pub async fn authenticate(
        &self,
        callback: &CallbackParams,
        session: &mut dyn SessionStore,
    ) -> Result<AuthOutcome<U>> {
        if callback.denied.is_some() {
            warn!(strategy = self.name(), "user denied authorization");
            session.remove(self.config.session_key());
            return Ok(AuthOutcome::Fail("User denied authorization".to_string()));
        }
        match callback.oauth_token {
            Some(ref token) => {
                self.complete(token, callback.oauth_verifier.as_deref(), session)
                    .await
            }
            None => Ok(AuthOutcome::Redirect(self.begin(session).await?)),
        }
    }

    /// Obtains a request token, keeps it in `session` and returns the URL
    /// the user has to visit to authorize it.
    pub async fn begin(&self, session: &mut dyn SessionStore) -> Result<Url> {
        let token = self.request_token().await?;
        let url = self.authorization_url(&token.oauth_token);
        session.insert(
            self.config.session_key(),
            RequestToken {
                oauth_token: token.oauth_token,
                oauth_token_secret: token.oauth_token_secret,
            },
        );
        Ok(url)
    }

    /// Exchanges the authorized request token stored in `session` and runs
    /// the profile mapping and verify hook on the result.
    pub async fn complete(
        &self,
        oauth_token: &str,
        oauth_verifier: Option<&str>,
        session: &mut dyn SessionStore,
    ) -> Result<AuthOutcome<U>> {
        let pending = match session.remove(self.config.session_key()) {
            Some(pending) => pending,
            None => {
                warn!(strategy = self.name(), "no request token in session");
                return Ok(AuthOutcome::Fail(
                    "Unable to verify authorization request".to_string(),
                ));
            }
        };
        if pending.oauth_token != oauth_token {
            warn!(strategy = self.name(), "request token mismatch");
            return Ok(AuthOutcome::Fail(
                "Request token does not match".to_string(),
            ));
        }

        let access = self
            .access_token(oauth_token, &pending.oauth_token_secret, oauth_verifier)
            .await?;
        let profile = self.provider.user_profile(
            &access.oauth_token,
            &access.oauth_token_secret,
            &access.params,
        )?;
        let user = self
            .verify
            .verify(&access.oauth_token, &access.oauth_token_secret, profile)
            .await
            .map_err(Error::Verify)?;

        match user {
            Some(user) => {
                info!(strategy = self.name(), "authentication succeeded");
                Ok(AuthOutcome::Success(user))
            }
            None => {
                warn!(strategy = self.name(), "verify callback rejected user");
                Ok(AuthOutcome::Fail("Invalid credentials".to_string()))
            }
        }
    }

    pub async fn request_token(&self) -> Result<TokenResponse> {
        let callback = self
            .config
            .callback_url()
            .map(Url::as_str)
            .unwrap_or(OUT_OF_BAND_CALLBACK);
        let secrets = Secrets::new(self.config.consumer_key(), self.config.consumer_secret());
        let params = OAuthParameters::new().callback(callback);
        self.fetch_token(self.config.request_token_url(), &secrets, params)
            .await
    }

    pub async fn access_token(
        &self,
        oauth_token: &str,
        oauth_token_secret: &str,
        oauth_verifier: Option<&str>,
    ) -> Result<TokenResponse> {
        let secrets = Secrets::new(self.config.consumer_key(), self.config.consumer_secret())
            .token(oauth_token, oauth_token_secret);
        let mut params = OAuthParameters::new();
        if let Some(verifier) = oauth_verifier {
            params = params.verifier(verifier);
        }
        self.fetch_token(self.config.access_token_url(), &secrets, params)
            .await
    }

    pub fn authorization_url(&self, oauth_token: &str) -> Url {
        let mut url = self.config.user_authorization_url().clone();
        url.query_pairs_mut().append_pair(OAUTH_TOKEN_KEY, oauth_token);
        url
    }

    async fn fetch_token(
        &self,
        url: &Url,
        secrets: &Secrets<'_>,
        params: OAuthParameters<'_>,
    ) -> Result<TokenResponse> {
        debug!(strategy = self.name(), %url, "requesting token");
        let authorization = Signer::new(secrets, params).authorization(&Method::POST, url.clone());
        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;
        response.parse_oauth_token().await
    }
}
