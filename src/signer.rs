use std::borrow::Cow;

use http::Method;
use oauth1_request::signer::Signer as OAuthSigner;
use oauth1_request::{HmacSha1, Options};
use url::Url;

use crate::SecretsProvider;

const OAUTH_IDENTIFIER: &str = "oauth_";

/// Produces the `Authorization` header value for a token endpoint call.
///
/// Query parameters already present on the endpoint URL take part in the
/// signature; the `oauth_*` parameters themselves only go into the header.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    pub fn authorization(self, method: &Method, url: Url) -> String {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();
        let options = self.parameters.build_options(token);

        // oauth1-request signs against the bare URI, query pairs are fed
        // in as parameters instead
        let query = url.query().filter(|q| !q.is_empty()).map(str::to_string);
        let mut pure_url = url;
        pure_url.set_query(None);

        // oauth_* pairs on the URL would clash with the generated ones
        let mut pairs: Vec<(Cow<str>, Cow<str>)> = query
            .as_deref()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).collect())
            .unwrap_or_default();
        pairs.retain(|(k, _)| !k.starts_with(OAUTH_IDENTIFIER));
        pairs.sort();
        // keys sorting before "oauth_" precede the oauth_* parameters
        let split = pairs
            .iter()
            .position(|(k, _)| &**k > OAUTH_IDENTIFIER)
            .unwrap_or(pairs.len());
        let (before_oauth, after_oauth) = pairs.split_at(split);

        let mut signer = if query.is_some() {
            OAuthSigner::with_signature_method(
                HmacSha1,
                method.as_str(),
                pure_url,
                consumer_secret,
                token_secret,
            )
        } else {
            OAuthSigner::form_with_signature_method(
                HmacSha1,
                method.as_str(),
                pure_url,
                consumer_secret,
                token_secret,
            )
        };

        for (key, value) in before_oauth {
            signer.parameter(key, value);
        }
        let mut signer = signer.oauth_parameters(consumer_key, &options);
        for (key, value) in after_oauth {
            signer.parameter(key, value);
        }

        signer.finish().authorization
    }
}

#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    // fixed nonce and timestamp make signatures reproducible
    #[cfg(test)]
    fn nonce(self, nonce: &'a str) -> Self {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    #[cfg(test)]
    fn timestamp(self, timestamp: u64) -> Self {
        OAuthParameters {
            timestamp: Some(timestamp),
            ..self
        }
    }

    fn build_options<'b>(&'b self, token: Option<&'b str>) -> Options<'b> {
        let mut opt = Options::new();

        // NOTE: items must be added by alphabetical order

        if let Some(ref callback) = self.callback {
            opt.callback(callback.as_ref());
        }
        if let Some(ref nonce) = self.nonce {
            opt.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            opt.timestamp(timestamp);
        }
        if let Some(token) = token {
            opt.token(token);
        }
        if let Some(ref verifier) = self.verifier {
            opt.verifier(verifier.as_ref());
        }

        opt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Secrets;

    fn extract_param(auth_header: &str, key: &str) -> Option<String> {
        let content = auth_header.strip_prefix("OAuth ").unwrap();
        content
            .split(',')
            .filter_map(|item| {
                let mut kv = item.splitn(2, '=');
                Some((kv.next()?, kv.next()?))
            })
            .find(|(k, _)| *k == key)
            .map(|(_, v)| {
                percent_encoding::percent_decode_str(v.trim_matches('"'))
                    .decode_utf8_lossy()
                    .to_string()
            })
    }

    #[test]
    fn sign_request_token() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let endpoint = Url::parse("https://photos.example.net/initiate").unwrap();
        let secrets = Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
        let params = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64)
            .callback("http://printer.example.com/ready");

        let header = Signer::new(&secrets, params).authorization(&Method::POST, endpoint);

        assert_eq!(
            extract_param(&header, "oauth_signature").unwrap(),
            "74KNZJeDHnMBp0EMJ9ZHt/XKycU="
        );
        assert_eq!(
            extract_param(&header, "oauth_callback").unwrap(),
            "http://printer.example.com/ready"
        );
        assert_eq!(extract_param(&header, "oauth_token"), None);
    }

    #[test]
    fn sign_access_token() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let endpoint = Url::parse("https://photos.example.net/token").unwrap();
        let secrets = Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
            .token("hh5s93j4hdidpola", "hdhd0244k9j7ao03");
        let params = OAuthParameters::new()
            .nonce("walatlh")
            .timestamp(137_131_201u64)
            .verifier("hfdp7dh39dks9884");

        let header = Signer::new(&secrets, params).authorization(&Method::POST, endpoint);

        assert_eq!(
            extract_param(&header, "oauth_signature").unwrap(),
            "gKgrFCywp7rO0OXSjdot/IHF7IU="
        );
        assert_eq!(
            extract_param(&header, "oauth_token").unwrap(),
            "hh5s93j4hdidpola"
        );
        assert_eq!(
            extract_param(&header, "oauth_verifier").unwrap(),
            "hfdp7dh39dks9884"
        );
    }

    #[test]
    fn sign_url_with_query() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let endpoint =
            Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
                .unwrap();
        let secrets = Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
            .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let params = OAuthParameters::new()
            .nonce("chapoH")
            .timestamp(137_131_202u64);

        let header = Signer::new(&secrets, params).authorization(&Method::GET, endpoint);

        assert_eq!(
            extract_param(&header, "oauth_signature").unwrap(),
            "MdpQcU8iPSUjWoN/UDMsK2sui9I="
        );
        // query pairs are signed but stay out of the header
        assert_eq!(extract_param(&header, "file"), None);
    }

    #[test]
    fn query_pairs_around_oauth_parameters() {
        let secrets = Secrets::new("key", "secret");
        let sign = |url: &str| {
            let params = OAuthParameters::new().nonce("n").timestamp(1u64);
            let header = Signer::new(&secrets, params)
                .authorization(&Method::POST, Url::parse(url).unwrap());
            extract_param(&header, "oauth_signature").unwrap()
        };

        let ordered = sign("https://example.com/rt?action=get&zone=eu");
        let reversed = sign("https://example.com/rt?zone=eu&action=get");
        assert_eq!(ordered, reversed);
        assert_ne!(ordered, sign("https://example.com/rt"));
        // oauth_* pairs on the URL are dropped, an empty query is no query
        assert_eq!(
            sign("https://example.com/rt?oauth_token=x&action=get&zone=eu"),
            ordered
        );
        assert_eq!(sign("https://example.com/rt?"), sign("https://example.com/rt"));
    }
}
