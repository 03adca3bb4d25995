use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use crate::{AuthOutcome, CallbackParams, Error, OAuthStrategy, Provider, Result, SessionStore};

/// Object-safe view of a strategy, used for dispatch by name.
#[async_trait]
pub trait Authenticator: Send + Sync {
    type User: Send;

    fn name(&self) -> &str;

    async fn authenticate(
        &self,
        callback: &CallbackParams,
        session: &mut dyn SessionStore,
    ) -> Result<AuthOutcome<Self::User>>;
}

#[async_trait]
impl<P, U> Authenticator for OAuthStrategy<P, U>
where
    P: Provider,
    U: Send + 'static,
{
    type User = U;

    fn name(&self) -> &str {
        OAuthStrategy::name(self)
    }

    async fn authenticate(
        &self,
        callback: &CallbackParams,
        session: &mut dyn SessionStore,
    ) -> Result<AuthOutcome<U>> {
        OAuthStrategy::authenticate(self, callback, session).await
    }
}

/// Strategies keyed by name.
pub struct StrategyRegistry<U: Send> {
    strategies: BTreeMap<String, Box<dyn Authenticator<User = U>>>,
}

impl<U: Send> Default for StrategyRegistry<U> {
    fn default() -> Self {
        StrategyRegistry {
            strategies: BTreeMap::new(),
        }
    }
}

impl<U: Send> StrategyRegistry<U> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `strategy` under its own name, replacing any strategy
    /// previously registered under that name.
    pub fn register<A>(&mut self, strategy: A) -> &mut Self
    where
        A: Authenticator<User = U> + 'static,
    {
        let name = strategy.name().to_string();
        self.register_as(name, strategy)
    }

    /// Registers `strategy` under `name` instead of its own name.
    pub fn register_as<N, A>(&mut self, name: N, strategy: A) -> &mut Self
    where
        N: Into<String>,
        A: Authenticator<User = U> + 'static,
    {
        let name = name.into();
        info!(strategy = %name, "registered authentication strategy");
        self.strategies.insert(name, Box::new(strategy));
        self
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.strategies.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Authenticator<User = U>> {
        self.strategies.get(name).map(|s| s.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Runs the strategy registered under `name`.
    pub async fn authenticate(
        &self,
        name: &str,
        callback: &CallbackParams,
        session: &mut dyn SessionStore,
    ) -> Result<AuthOutcome<U>> {
        let strategy = self
            .get(name)
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))?;
        strategy.authenticate(callback, session).await
    }
}
