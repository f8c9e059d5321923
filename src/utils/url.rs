//! URL utilities for building inference server endpoints
//!
//! The configured base URL names the server root; endpoint paths such as
//! `v1/models` are appended without producing double slashes.

/// Path of the model-listing endpoint, used for connectivity probes.
pub const MODELS_PATH: &str = "v1/models";
/// Path of the chat completions endpoint.
pub const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use localchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:1234/"), "http://localhost:1234");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and endpoint path
///
/// A base URL that already ends in `/v1` is accepted too, so both
/// `http://host:1234` and `http://host:1234/v1` reach the same endpoint.
///
/// # Examples
///
/// ```
/// use localchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:1234", "v1/chat/completions"),
///     "http://localhost:1234/v1/chat/completions"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:1234/v1/", "v1/models"),
///     "http://localhost:1234/v1/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let mut endpoint = endpoint.trim_start_matches('/');
    if normalized_base.ends_with("/v1") {
        endpoint = endpoint.strip_prefix("v1/").unwrap_or(endpoint);
    }
    format!("{}/{}", normalized_base, endpoint)
}
