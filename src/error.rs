use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

/// Error type returned by application-supplied verify hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid strategy configuration : {0}")]
    Config(#[from] ConfigError),
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("failed to fetch user profile : {0}")]
    Profile(#[from] ProfileError),
    #[error("verify callback failed : {0}")]
    Verify(BoxError),
    #[error("malformed callback query : {0}")]
    Query(#[from] serde_urlencoded::de::Error),
    #[error("unknown authentication strategy : {0}")]
    UnknownStrategy(String),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("a verify callback is required")]
    MissingVerify,
    #[error("consumer_key is required")]
    MissingConsumerKey,
    #[error("consumer_secret is required")]
    MissingConsumerSecret,
    #[error("{0} is required")]
    MissingOption(&'static str),
    #[error("{0} is not a valid url : {1}")]
    InvalidUrl(&'static str, url::ParseError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("token response params cannot be read, got {0}")]
    NotAMapping(&'static str),
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("token endpoint answered with status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
