//! # Domain Models
//!
//! Typed query parameters and results for the OpenFIGI search API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NumberRange`] / [`DateRange`] | Validated, possibly half-open intervals |
//! | [`SearchFilter`] | Optional search properties, validated at build time |
//! | [`Instrument`] | One decoded search result |
//! | [`MappingProperty`] | Properties whose legal values can be listed |
//!
//! Invalid ranges and filters cannot be constructed:
//!
//! ```rust
//! use figi_core::{DateRange, SearchFilter, ValidationError};
//! use time::macros::date;
//!
//! let expiring = DateRange::starting("expiration", date!(2020 - 12 - 11))?;
//!
//! // Expiration only applies to options and warrants.
//! let rejected = SearchFilter::builder().expiration(expiring).build();
//! assert!(matches!(rejected, Err(ValidationError::SubtypeMismatch { .. })));
//!
//! let filter = SearchFilter::builder()
//!     .security_type_2("Option")
//!     .expiration(expiring)
//!     .build()?;
//! assert_eq!(
//!     filter.as_filter()["expiration"],
//!     serde_json::json!(["2020-12-11", "2021-12-10"])
//! );
//! # Ok::<(), ValidationError>(())
//! ```

mod filter;
mod instrument;
mod mapping;
mod range;

pub use filter::{FilterField, SearchFilter, SearchFilterBuilder};
pub use instrument::Instrument;
pub use mapping::MappingProperty;
pub use range::{DateRange, NumberRange, Range, RangeBound, RangeKind, DEFAULT_DATE_SPAN};
