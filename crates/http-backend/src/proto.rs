use agent_chat_protocol::ErrorKind;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{Error, HttpBackendConfig};

// ---------
// Endpoints
// ---------

#[inline]
pub fn conversations_url(
    config: &HttpBackendConfig,
    user_id: &str,
) -> Result<Url, Error> {
    endpoint(config, &["api", "conversations"], &[("user_id", user_id)])
}

#[inline]
pub fn messages_url(
    config: &HttpBackendConfig,
    conversation_id: &str,
    user_id: &str,
) -> Result<Url, Error> {
    endpoint(
        config,
        &["api", "conversations", conversation_id, "messages"],
        &[("user_id", user_id)],
    )
}

#[inline]
pub fn chat_url(config: &HttpBackendConfig) -> Result<Url, Error> {
    endpoint(config, &["api", "chat"], &[])
}

#[inline]
pub fn health_url(config: &HttpBackendConfig) -> Result<Url, Error> {
    endpoint(config, &["health"], &[])
}

fn endpoint(
    config: &HttpBackendConfig,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, Error> {
    let mut url = Url::parse(&config.base_url).map_err(|err| {
        Error::new(
            format!("invalid base URL {:?}: {err}", config.base_url),
            ErrorKind::Other,
        )
    })?;
    // Segments are percent-encoded here, so server-issued ids can't
    // escape their path component.
    url.path_segments_mut()
        .map_err(|()| {
            Error::new(
                format!("base URL {:?} cannot have a path", config.base_url),
                ErrorKind::Other,
            )
        })?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

// --------
// Decoding
// --------

#[inline]
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|err| {
        Error::new(format!("malformed response: {err}"), ErrorKind::MalformedBody)
    })
}
