//! Request URL construction for the rendering service

use crate::error::{Error, Result};
use crate::qr::{QrReference, RenderParams};
use reqwest::Url;

/// Public endpoint used when no other is configured
pub const DEFAULT_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Query keys owned by the request; endpoint values for these are replaced
const REQUEST_KEYS: [&str; 4] = ["size", "data", "color", "bgcolor"];

/// Parse and check a rendering service endpoint
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| Error::Config(format!("Invalid endpoint '{endpoint}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "Invalid endpoint '{endpoint}': unsupported scheme '{other}', expected http or https"
        ))),
    }
}

/// A single request to the rendering service.
///
/// Built fresh for every generation and never cached; the only identity it has
/// is the text it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    endpoint: &'a Url,
    text: &'a str,
    params: RenderParams,
}

impl<'a> GenerationRequest<'a> {
    /// Describe a request for `text` against `endpoint`
    pub fn new(endpoint: &'a Url, text: &'a str, params: RenderParams) -> Self {
        Self {
            endpoint,
            text,
            params,
        }
    }

    /// Text that will be encoded
    pub fn text(&self) -> &str {
        self.text
    }

    /// Build the reference URL. Deterministic in endpoint, text and params.
    ///
    /// Query pairs already on the endpoint are kept unless they collide with a
    /// request key; any fragment stays after the query.
    pub fn to_reference(&self) -> QrReference {
        let mut url = self.endpoint.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !REQUEST_KEYS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("size", &self.params.size.to_string())
            .append_pair("data", self.text)
            .append_pair("color", &self.params.color.to_string())
            .append_pair("bgcolor", &self.params.bgcolor.to_string());

        QrReference::new(String::from(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{Dimensions, HexColor};

    fn endpoint(raw: &str) -> Url {
        parse_endpoint(raw).unwrap()
    }

    #[test]
    fn test_default_reference_layout() {
        let url = endpoint(DEFAULT_ENDPOINT);
        let request = GenerationRequest::new(&url, "https://example.com", RenderParams::default());
        assert_eq!(
            request.to_reference().as_str(),
            "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=https%3A%2F%2Fexample.com&color=000000&bgcolor=ffffff"
        );
    }

    #[test]
    fn test_payload_round_trip() {
        let url = endpoint(DEFAULT_ENDPOINT);
        for text in [
            "https://example.com/path?q=a b&x=1#frag",
            "  padded  ",
            "สวัสดี",
            "100% & more+plus",
        ] {
            let reference =
                GenerationRequest::new(&url, text, RenderParams::default()).to_reference();
            assert_eq!(reference.payload().unwrap(), text);
        }
    }

    #[test]
    fn test_custom_params_and_endpoint_with_query() {
        let params = RenderParams {
            size: Dimensions::square(120),
            color: HexColor([0x11, 0x22, 0x33]),
            bgcolor: HexColor::WHITE,
        };
        let url = endpoint("http://localhost:8080/qr?format=png");
        let reference = GenerationRequest::new(&url, "hi", params).to_reference();
        assert_eq!(
            reference.as_str(),
            "http://localhost:8080/qr?format=png&size=120x120&data=hi&color=112233&bgcolor=ffffff"
        );
        assert_eq!(reference.query_param("format").as_deref(), Some("png"));
    }

    #[test]
    fn test_endpoint_request_keys_are_replaced() {
        let url = endpoint("http://h/qr?data=preset&size=10x10&keep=1");
        let reference =
            GenerationRequest::new(&url, "https://b.com", RenderParams::default()).to_reference();

        assert_eq!(reference.payload().unwrap(), "https://b.com");
        assert_eq!(reference.query_param("size").as_deref(), Some("300x300"));
        assert_eq!(reference.query_param("keep").as_deref(), Some("1"));

        let parsed = reference.url().unwrap();
        assert_eq!(parsed.query_pairs().filter(|(k, _)| k == "data").count(), 1);
    }

    #[test]
    fn test_endpoint_fragment_stays_after_query() {
        let url = endpoint("http://h/qr/#top");
        let reference =
            GenerationRequest::new(&url, "https://b.com", RenderParams::default()).to_reference();

        let parsed = reference.url().unwrap();
        assert_eq!(parsed.fragment(), Some("top"));
        assert!(parsed.query().is_some_and(|q| q.contains("data=https%3A%2F%2Fb.com")));
        assert_eq!(reference.payload().unwrap(), "https://b.com");
    }

    #[test]
    fn test_parse_endpoint_rejects_bad_input() {
        assert!(matches!(parse_endpoint("not a url"), Err(Error::Config(_))));
        assert!(matches!(
            parse_endpoint("ftp://example.com/qr"),
            Err(Error::Config(_))
        ));
    }
}
