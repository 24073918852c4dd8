use serde::{Serialize, Serializer};
use serde_json::Value;
use time::macros::format_description;
use time::{Date, Duration};

use crate::ValidationError;

/// Span used to fill in a missing date bound: exactly 52 weeks.
pub const DEFAULT_DATE_SPAN: Duration = Duration::days(364);

/// Numeric interval such as a strike or coupon range.
pub type NumberRange = Range<f64>;

/// Calendar interval such as an expiration or maturity window.
pub type DateRange = Range<Date>;

/// Range flavour, which decides how a missing bound is rendered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Missing bounds stay missing and are sent as `null`.
    Numeric,
    /// Missing bounds are synthesized from the other bound.
    Date,
}

/// Bound types a [`Range`] can be built from.
pub trait RangeBound: Copy + PartialOrd {
    const KIND: RangeKind;

    /// Checks a pair that already has at least one bound and is ordered.
    fn check(
        lower: Option<Self>,
        upper: Option<Self>,
        field: &'static str,
    ) -> Result<(), ValidationError>;
}

impl RangeBound for f64 {
    const KIND: RangeKind = RangeKind::Numeric;

    fn check(
        lower: Option<Self>,
        upper: Option<Self>,
        field: &'static str,
    ) -> Result<(), ValidationError> {
        if lower.into_iter().chain(upper).any(|value| !value.is_finite()) {
            return Err(ValidationError::NonFiniteBound { field });
        }
        Ok(())
    }
}

impl RangeBound for Date {
    const KIND: RangeKind = RangeKind::Date;

    fn check(
        lower: Option<Self>,
        upper: Option<Self>,
        field: &'static str,
    ) -> Result<(), ValidationError> {
        let representable = match (lower, upper) {
            (Some(lower), None) => lower.checked_add(DEFAULT_DATE_SPAN).is_some(),
            (None, Some(upper)) => upper.checked_sub(DEFAULT_DATE_SPAN).is_some(),
            _ => true,
        };
        if !representable {
            return Err(ValidationError::DateSpanOverflow { field });
        }
        Ok(())
    }
}

/// A possibly half-open interval. At least one bound is always present and,
/// when both are, `upper >= lower`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    lower: Option<T>,
    upper: Option<T>,
}

impl<T: RangeBound> Range<T> {
    /// Builds a validated range. `field` names the filter property in errors.
    pub fn new(
        field: &'static str,
        lower: Option<T>,
        upper: Option<T>,
    ) -> Result<Self, ValidationError> {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            // `!(upper >= lower)` so NaN comparisons fail too.
            if !(upper >= lower) {
                return Err(ValidationError::InvertedRange { field });
            }
        } else if lower.is_none() && upper.is_none() {
            return Err(ValidationError::EmptyRange { field });
        }

        T::check(lower, upper, field)?;
        Ok(Self { lower, upper })
    }

    pub fn between(field: &'static str, lower: T, upper: T) -> Result<Self, ValidationError> {
        Self::new(field, Some(lower), Some(upper))
    }

    pub fn starting(field: &'static str, lower: T) -> Result<Self, ValidationError> {
        Self::new(field, Some(lower), None)
    }

    pub fn until(field: &'static str, upper: T) -> Result<Self, ValidationError> {
        Self::new(field, None, Some(upper))
    }

    pub fn lower(&self) -> Option<T> {
        self.lower
    }

    pub fn upper(&self) -> Option<T> {
        self.upper
    }

    pub const fn kind(&self) -> RangeKind {
        T::KIND
    }
}

impl Range<f64> {
    /// Numeric ranges go out unchanged; a missing bound becomes `null`.
    pub fn normalize(&self) -> [Option<f64>; 2] {
        [self.lower, self.upper]
    }

    /// Two-element JSON array sent in a search filter.
    pub fn wire_value(&self) -> Value {
        Value::Array(
            self.normalize()
                .into_iter()
                .map(|bound| bound.map_or(Value::Null, Value::from))
                .collect(),
        )
    }
}

impl Range<Date> {
    /// Resolves both bounds, filling a missing one from the other ± 364 days.
    pub fn normalize(&self) -> [Date; 2] {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => [lower, upper],
            (Some(lower), None) => [lower, lower.saturating_add(DEFAULT_DATE_SPAN)],
            (None, Some(upper)) => [upper.saturating_sub(DEFAULT_DATE_SPAN), upper],
            // Unreachable through `Range::new`.
            (None, None) => [Date::MIN, Date::MAX],
        }
    }

    /// `YYYY-MM-DD` rendering of [`normalize`](Self::normalize).
    pub fn to_wire(&self) -> [String; 2] {
        self.normalize().map(format_date)
    }

    /// Two-element JSON array sent in a search filter.
    pub fn wire_value(&self) -> Value {
        Value::Array(self.to_wire().into_iter().map(Value::String).collect())
    }
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| {
            format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        })
}

impl Serialize for Range<f64> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.wire_value().serialize(serializer)
    }
}

impl Serialize for Range<Date> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.wire_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn rejects_range_without_bounds() {
        let err = NumberRange::new("strike", None, None).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyRange { field: "strike" });

        let err = DateRange::new("expiration", None, None).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyRange { field: "expiration" });
    }

    #[test]
    fn accepts_half_open_and_closed_ranges() {
        assert!(NumberRange::between("strike", 3.0, 5.0).is_ok());
        assert!(NumberRange::until("strike", 5.0).is_ok());
        assert!(NumberRange::starting("strike", 2.0).is_ok());
        assert!(DateRange::starting("expiration", date!(2020 - 11 - 12)).is_ok());
        assert!(DateRange::until("expiration", date!(2020 - 11 - 12)).is_ok());
        assert!(DateRange::between("expiration", date!(2020 - 11 - 12), date!(2020 - 11 - 12)).is_ok());
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = DateRange::between("maturity", date!(2020 - 12 - 12), date!(2020 - 11 - 12))
            .expect_err("must fail");
        assert_eq!(err, ValidationError::InvertedRange { field: "maturity" });

        let err = NumberRange::between("coupon", 5.0, 3.0).expect_err("must fail");
        assert_eq!(err, ValidationError::InvertedRange { field: "coupon" });
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let err = NumberRange::starting("strike", f64::NAN).expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteBound { field: "strike" });

        let err = NumberRange::between("strike", 1.0, f64::NAN).expect_err("must fail");
        assert_eq!(err, ValidationError::InvertedRange { field: "strike" });
    }

    #[test]
    fn rejects_date_spans_beyond_the_calendar() {
        let err = DateRange::starting("expiration", Date::MAX).expect_err("must fail");
        assert_eq!(err, ValidationError::DateSpanOverflow { field: "expiration" });
    }

    #[test]
    fn open_ended_start_extends_by_fifty_two_weeks() {
        let range = DateRange::starting("expiration", date!(2020 - 11 - 12)).expect("valid");
        assert_eq!(range.to_wire(), ["2020-11-12", "2021-11-11"]);
    }

    #[test]
    fn open_ended_end_reaches_back_fifty_two_weeks() {
        let range = DateRange::until("expiration", date!(2020 - 11 - 12)).expect("valid");
        assert_eq!(range.to_wire(), ["2019-11-14", "2020-11-12"]);
    }

    #[test]
    fn closed_date_range_is_rendered_as_is() {
        let range = DateRange::between("expiration", date!(2020 - 11 - 12), date!(2020 - 11 - 12))
            .expect("valid");
        assert_eq!(range.to_wire(), ["2020-11-12", "2020-11-12"]);
        assert_eq!(
            serde_json::to_value(range).expect("serializable"),
            range.wire_value()
        );
    }

    #[test]
    fn numeric_range_keeps_missing_bound_as_null() {
        let range = NumberRange::starting("contractSize", 100.0).expect("valid");
        assert_eq!(range.normalize(), [Some(100.0), None]);
        assert_eq!(
            serde_json::to_value(range).expect("serializable"),
            json!([100.0, null])
        );
        assert_eq!(range.kind(), RangeKind::Numeric);
    }

    #[test]
    fn zero_is_a_real_numeric_bound() {
        let range = NumberRange::starting("strike", 0.0).expect("valid");
        assert_eq!(range.normalize(), [Some(0.0), None]);
    }
}
