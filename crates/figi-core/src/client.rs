//! OpenFIGI API client.
//!
//! [`FigiClient`] owns a [`ClientConfig`] and a transport. Every top-level
//! call builds a [`Session`]: the transport wrapped in a
//! [`RetryingHttpClient`] that retries HTTP 429 per the configured policy.
//!
//! # Error policy
//!
//! | Failure | `raise_on_error = true` | `raise_on_error = false` |
//! |---------|-------------------------|--------------------------|
//! | Invalid input | `Err(Validation)` | `Err(Validation)` |
//! | 429 after retries | `Err(RateLimited)` | empty result |
//! | 413 | `Err(PayloadTooLarge)` | empty result |
//! | 403 | `Err(Authentication)` | empty result |
//! | Other status >= 400 | `Err(Status)` | empty result |
//! | Connection / timeout | `Err(Transport)` | empty result |
//! | Undecodable body | `Err(Decode)` | empty result |
//!
//! 429 and 413 are always logged at warn level, 403 at error level.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::domain::{MappingProperty, SearchFilter};
use crate::error::FigiError;
use crate::http_client::{HttpAuth, HttpClient, HttpMethod, HttpRequest, ReqwestHttpClient};
use crate::pagination::SearchPages;
use crate::retry::RetryingHttpClient;
use crate::ValidationError;

pub const API_KEY_HEADER: &str = "X-OPENFIGI-APIKEY";
pub const SEARCH_PATH: &str = "/v2/search/";
pub const MAPPING_VALUES_PATH: &str = "/v2/mapping/values/";

/// Client for the OpenFIGI search and mapping-values endpoints.
#[derive(Clone)]
pub struct FigiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpClient>,
}

impl FigiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Client configured from the `OPEN_FIGI_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn with_http_client(config: ClientConfig, transport: Arc<dyn HttpClient>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Lazily pages through `/v2/search/`. No request is sent until the
    /// returned cursor is first pulled.
    pub fn search(&self, query: Option<&str>, filter: Option<&SearchFilter>) -> SearchPages {
        let mut body = filter.map(SearchFilter::as_filter).unwrap_or_default();
        body.insert(
            String::from("query"),
            query.map_or(Value::Null, Value::from),
        );

        let url = format!("{}{}", self.config.api_root(), SEARCH_PATH);
        SearchPages::new(self.session(), url, body)
    }

    /// Lists the legal values of a mapping property.
    pub async fn mapping_values(&self, property: MappingProperty) -> Result<Vec<String>, FigiError> {
        let url = format!(
            "{}{}{}",
            self.config.api_root(),
            MAPPING_VALUES_PATH,
            urlencoding::encode(property.as_str())
        );

        let session = self.session();
        let response = session.request(HttpMethod::Get, &url, None).await?;
        if response.is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_value::<MappingValuesResponse>(Value::Object(response)) {
            Ok(parsed) => Ok(parsed.values),
            Err(err) => session.degrade(FigiError::Decode(err)).map(|()| Vec::new()),
        }
    }

    /// [`mapping_values`](Self::mapping_values) for a property given by its wire name.
    pub async fn mapping_values_named(&self, property: &str) -> Result<Vec<String>, FigiError> {
        let property = property.parse::<MappingProperty>()?;
        self.mapping_values(property).await
    }

    fn session(&self) -> Session {
        Session {
            transport: RetryingHttpClient::new(
                Arc::clone(&self.transport),
                self.config.retry_config(),
            ),
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MappingValuesResponse {
    values: Vec<String>,
}

/// One retrying transport plus the settings that govern it.
pub(crate) struct Session {
    transport: RetryingHttpClient,
    config: Arc<ClientConfig>,
}

impl Session {
    pub(crate) fn raise_on_error(&self) -> bool {
        self.config.raise_on_error
    }

    /// Returns `Err(error)` when raising, `Ok(())` when failures are swallowed.
    pub(crate) fn degrade(&self, error: FigiError) -> Result<(), FigiError> {
        if self.raise_on_error() {
            return Err(error);
        }
        debug!(code = error.code(), %error, "suppressing error, returning empty result");
        Ok(())
    }

    /// Sends one request and returns the decoded JSON object, or an empty
    /// object when the call failed and errors are not raised.
    pub(crate) async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Map<String, Value>>,
    ) -> Result<Map<String, Value>, FigiError> {
        let mut request = HttpRequest::new(method, url)
            .with_header("Content-Type", "application/json")
            .with_auth(&self.auth())
            .with_timeout_ms(self.config.timeout.as_millis() as u64);
        if let Some(body) = body {
            request = request.with_body(Value::Object(body.clone()).to_string());
        }

        debug!(%method, url, "sending OpenFIGI request");
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                error!(%method, url, error = %err, "OpenFIGI transport failure");
                return self.degrade(FigiError::Transport(err)).map(|()| Map::new());
            }
        };

        match response.status {
            429 => {
                warn!(
                    status = response.status,
                    "Your application is being rate-limited, try to perform fewer requests"
                );
                if self.raise_on_error() {
                    return Err(FigiError::RateLimited);
                }
            }
            413 => {
                warn!(
                    status = response.status,
                    "Your application requested too large of a payload, you may want to supply an API key"
                );
                if self.raise_on_error() {
                    return Err(FigiError::PayloadTooLarge);
                }
            }
            403 => {
                error!(
                    status = response.status,
                    "Your API key starting with {} is not valid",
                    self.config.redacted_key()
                );
                if self.raise_on_error() {
                    return Err(FigiError::Authentication);
                }
            }
            _ => {}
        }

        if !response.is_ok() {
            return self
                .degrade(FigiError::Status {
                    status: response.status,
                })
                .map(|()| Map::new());
        }

        let mut object = match serde_json::from_str::<Map<String, Value>>(&response.body) {
            Ok(object) => object,
            Err(err) => {
                warn!(url, error = %err, "OpenFIGI response is not a JSON object");
                return self.degrade(FigiError::Decode(err)).map(|()| Map::new());
            }
        };

        if let Some(Value::String(message)) = object.remove("error") {
            warn!(url, %message, "OpenFIGI reported an error");
            return self.degrade(FigiError::Service(message)).map(|()| Map::new());
        }

        Ok(object)
    }

    fn auth(&self) -> HttpAuth {
        match self.config.api_key() {
            Some(key) => HttpAuth::Header {
                name: String::from(API_KEY_HEADER),
                value: key.to_owned(),
            },
            None => HttpAuth::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn replying(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn config(raise_on_error: bool) -> ClientConfig {
        ClientConfig::default()
            .with_base_url("https://figi.test/")
            .with_raise_on_error(raise_on_error)
            .with_retry_count(0)
    }

    #[tokio::test]
    async fn request_sets_json_content_type_and_api_key() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json("{}")));
        let client =
            FigiClient::with_http_client(config(true).with_api_key("key-123"), transport.clone());

        client
            .session()
            .request(HttpMethod::Get, "https://figi.test/x", None)
            .await
            .expect("request should succeed");

        let requests = transport.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            requests[0].headers.get("x-openfigi-apikey").map(String::as_str),
            Some("key-123")
        );
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn api_key_header_is_omitted_without_a_key() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json("{}")));
        let client = FigiClient::with_http_client(config(true), transport.clone());

        client
            .session()
            .request(HttpMethod::Get, "https://figi.test/x", None)
            .await
            .expect("request should succeed");

        assert!(!transport.recorded_requests()[0]
            .headers
            .contains_key("x-openfigi-apikey"));
    }

    #[tokio::test]
    async fn api_key_header_is_omitted_for_an_empty_key() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json("{}")));
        let client = FigiClient::with_http_client(config(true).with_api_key(""), transport.clone());

        client
            .session()
            .request(HttpMethod::Post, "https://figi.test/x", None)
            .await
            .expect("request should succeed");

        assert_eq!(client.config().redacted_key(), "(not supplied)");
        assert!(!transport.recorded_requests()[0]
            .headers
            .contains_key("x-openfigi-apikey"));
    }

    #[tokio::test]
    async fn mapping_values_hits_property_endpoint() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"{"values": ["US", "LN", "GY"]}"#,
        )));
        let client = FigiClient::with_http_client(config(true), transport.clone());

        let values = client
            .mapping_values(MappingProperty::ExchangeCode)
            .await
            .expect("values should decode");

        assert_eq!(values, ["US", "LN", "GY"]);
        let requests = transport.recorded_requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "https://figi.test/v2/mapping/values/exchCode");
    }

    #[tokio::test]
    async fn mapping_values_named_rejects_missing_property_without_a_request() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json("{}")));
        let client = FigiClient::with_http_client(config(false), transport.clone());

        let err = client
            .mapping_values_named("")
            .await
            .expect_err("must fail even when errors are suppressed");

        assert!(matches!(
            err,
            FigiError::Validation(ValidationError::MissingProperty)
        ));
        assert!(transport.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn in_band_error_is_raised_as_service_error() {
        let transport = RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"{"error": "Invalid idType"}"#,
        )));
        let client = FigiClient::with_http_client(config(true), transport);

        let err = client
            .mapping_values(MappingProperty::IdType)
            .await
            .expect_err("must fail");

        assert!(matches!(err, FigiError::Service(ref message) if message == "Invalid idType"));
    }

    #[tokio::test]
    async fn malformed_body_degrades_when_not_raising() {
        let transport =
            RecordingHttpClient::replying(Ok(HttpResponse::ok_json("<html>oops</html>")));
        let client = FigiClient::with_http_client(config(false), transport);

        let values = client
            .mapping_values(MappingProperty::Currency)
            .await
            .expect("errors are suppressed");

        assert!(values.is_empty());
    }
}
