//! Shareable links: the configuration as URL query parameters keyed by the
//! camel-case field names.

use crate::form::{Configuration, FieldValue};
use crate::schema::FieldKey;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://lsp.local/launch";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("link query segment `{segment}` is not valid percent-encoded UTF-8")]
    Encoding { segment: String },
}

/// Every set field in declaration order, rendered in canonical text form.
pub fn to_query(configuration: &Configuration) -> Vec<(&'static str, String)> {
    configuration
        .iter()
        .map(|(key, value)| (key.as_str(), value.canonical_text()))
        .collect()
}

/// Lenient inverse of [`to_query`]: unknown keys and values that do not
/// parse as their field's type are skipped. The result still has to be
/// validated before it is trusted.
pub fn from_query<I, K, V>(params: I) -> Configuration
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut configuration = Configuration::new();
    for (name, raw) in params {
        let Ok(key) = FieldKey::parse(name.as_ref()) else {
            continue;
        };
        if let Ok(value) = FieldValue::parse_canonical(key.definition().value_type, raw.as_ref()) {
            configuration.set(key, value);
        }
    }
    configuration
}

pub fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn to_link(base_url: &str, configuration: &Configuration) -> String {
    let query = encode_query(&to_query(configuration));
    if query.is_empty() {
        return base_url.to_string();
    }
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}{query}")
}

/// Splits the query string of `link` into decoded pairs. A bare query string
/// without `?` is accepted too.
pub fn parse_query(link: &str) -> Result<Vec<(String, String)>, LinkError> {
    let without_fragment = link.split_once('#').map_or(link, |(head, _)| head);
    let query = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(_, query)| query);

    let mut pairs = Vec::new();
    for segment in query.split('&').filter(|segment| !segment.is_empty()) {
        let (name, raw) = segment.split_once('=').unwrap_or((segment, ""));
        pairs.push((decode_component(name)?, decode_component(raw)?));
    }
    Ok(pairs)
}

fn decode_component(raw: &str) -> Result<String, LinkError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| LinkError::Encoding {
            segment: raw.to_string(),
        })
}

pub fn from_link(link: &str) -> Result<Configuration, LinkError> {
    Ok(from_query(parse_query(link)?))
}
