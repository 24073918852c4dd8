//! # figi-core
//!
//! Typed async client for the [OpenFIGI](https://www.openfigi.com/api) instrument
//! lookup service.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Ranges, search filters, instruments, mapping properties |
//! | [`client`] | [`FigiClient`]: request dispatch and error policy |
//! | [`pagination`] | [`SearchPages`]: lazy cursor over search result pages |
//! | [`config`] | [`ClientConfig`]: explicit or environment-derived settings |
//! | [`http_client`] | Transport abstraction and reqwest implementation |
//! | [`retry`] | Transport-level retry of rate-limited requests |
//! | [`error`] | [`ValidationError`] and [`FigiError`] |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use figi_core::{ClientConfig, FigiClient, NumberRange, SearchFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FigiClient::new(ClientConfig::from_env()?.with_raise_on_error(true));
//!
//!     let filter = SearchFilter::builder()
//!         .security_type_2("Option")
//!         .strike(NumberRange::starting("strike", 100.0)?)
//!         .build()?;
//!
//!     let mut pages = client.search(Some("IBM"), Some(&filter));
//!     while let Some(instrument) = pages.next_item().await {
//!         let instrument = instrument?;
//!         println!("{:?} {:?}", instrument.figi, instrument.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Rate-limit and payload-size warnings are emitted whether or not errors are
//! raised.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pagination;
pub mod retry;

pub use client::FigiClient;
pub use config::ClientConfig;
pub use domain::{
    DateRange, FilterField, Instrument, MappingProperty, NumberRange, Range, RangeKind,
    SearchFilter, SearchFilterBuilder,
};
pub use error::{FigiError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use pagination::SearchPages;
pub use retry::{Backoff, RetryConfig, RetryingHttpClient};
