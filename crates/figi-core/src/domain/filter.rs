use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

use crate::domain::range::{DateRange, NumberRange};
use crate::ValidationError;

const EXPIRATION_SUBTYPES: &[&str] = &["Option", "Warrant"];
const MATURITY_SUBTYPES: &[&str] = &["Pool"];

/// Filterable search property and its OpenFIGI wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    ExchangeCode,
    MicCode,
    Currency,
    MarketSectorDescription,
    SecurityType,
    SecurityType2,
    IncludeUnlistedEquities,
    OptionType,
    Strike,
    ContractSize,
    Coupon,
    Expiration,
    Maturity,
    StateCode,
}

impl FilterField {
    pub const ALL: [Self; 14] = [
        Self::ExchangeCode,
        Self::MicCode,
        Self::Currency,
        Self::MarketSectorDescription,
        Self::SecurityType,
        Self::SecurityType2,
        Self::IncludeUnlistedEquities,
        Self::OptionType,
        Self::Strike,
        Self::ContractSize,
        Self::Coupon,
        Self::Expiration,
        Self::Maturity,
        Self::StateCode,
    ];

    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::ExchangeCode => "exchCode",
            Self::MicCode => "micCode",
            Self::Currency => "currency",
            Self::MarketSectorDescription => "marketSecDes",
            Self::SecurityType => "securityType",
            Self::SecurityType2 => "securityType2",
            Self::IncludeUnlistedEquities => "includeUnlistedEquities",
            Self::OptionType => "optionType",
            Self::Strike => "strike",
            Self::ContractSize => "contractSize",
            Self::Coupon => "coupon",
            Self::Expiration => "expiration",
            Self::Maturity => "maturity",
            Self::StateCode => "stateCode",
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// Validated set of search filters. Build one with [`SearchFilter::builder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    exchange_code: Option<String>,
    mic_code: Option<String>,
    currency: Option<String>,
    market_sector_description: Option<String>,
    security_type: Option<String>,
    security_type_2: Option<String>,
    include_unlisted_equities: Option<bool>,
    option_type: Option<String>,
    strike: Option<NumberRange>,
    contract_size: Option<NumberRange>,
    coupon: Option<NumberRange>,
    expiration: Option<DateRange>,
    maturity: Option<DateRange>,
    state_code: Option<String>,
}

impl SearchFilter {
    pub fn builder() -> SearchFilterBuilder {
        SearchFilterBuilder::default()
    }

    pub fn security_type_2(&self) -> Option<&str> {
        self.security_type_2.as_deref()
    }

    pub fn expiration(&self) -> Option<&DateRange> {
        self.expiration.as_ref()
    }

    pub fn maturity(&self) -> Option<&DateRange> {
        self.maturity.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Wire mapping sent to the search endpoint. Unset properties are omitted;
    /// ranges are rendered as two-element arrays.
    pub fn as_filter(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in FilterField::ALL {
            if let Some(value) = self.wire_value(field) {
                map.insert(field.wire_key().to_owned(), value);
            }
        }
        map
    }

    fn wire_value(&self, field: FilterField) -> Option<Value> {
        let text = |value: &Option<String>| value.clone().map(Value::String);
        let number_range = |range: &Option<NumberRange>| range.map(|range| range.wire_value());
        let date_range = |range: &Option<DateRange>| range.map(|range| range.wire_value());

        match field {
            FilterField::ExchangeCode => text(&self.exchange_code),
            FilterField::MicCode => text(&self.mic_code),
            FilterField::Currency => text(&self.currency),
            FilterField::MarketSectorDescription => text(&self.market_sector_description),
            FilterField::SecurityType => text(&self.security_type),
            FilterField::SecurityType2 => text(&self.security_type_2),
            FilterField::IncludeUnlistedEquities => self.include_unlisted_equities.map(Value::Bool),
            FilterField::OptionType => text(&self.option_type),
            FilterField::Strike => number_range(&self.strike),
            FilterField::ContractSize => number_range(&self.contract_size),
            FilterField::Coupon => number_range(&self.coupon),
            FilterField::Expiration => date_range(&self.expiration),
            FilterField::Maturity => date_range(&self.maturity),
            FilterField::StateCode => text(&self.state_code),
        }
    }
}

/// Collects optional filter properties; [`build`](Self::build) checks that
/// date ranges are paired with the security subtype they apply to.
#[derive(Debug, Clone, Default)]
pub struct SearchFilterBuilder {
    filter: SearchFilter,
}

impl SearchFilterBuilder {
    pub fn exchange_code(mut self, value: impl Into<String>) -> Self {
        self.filter.exchange_code = Some(value.into());
        self
    }

    pub fn mic_code(mut self, value: impl Into<String>) -> Self {
        self.filter.mic_code = Some(value.into());
        self
    }

    pub fn currency(mut self, value: impl Into<String>) -> Self {
        self.filter.currency = Some(value.into());
        self
    }

    pub fn market_sector_description(mut self, value: impl Into<String>) -> Self {
        self.filter.market_sector_description = Some(value.into());
        self
    }

    pub fn security_type(mut self, value: impl Into<String>) -> Self {
        self.filter.security_type = Some(value.into());
        self
    }

    pub fn security_type_2(mut self, value: impl Into<String>) -> Self {
        self.filter.security_type_2 = Some(value.into());
        self
    }

    pub fn include_unlisted_equities(mut self, value: bool) -> Self {
        self.filter.include_unlisted_equities = Some(value);
        self
    }

    pub fn option_type(mut self, value: impl Into<String>) -> Self {
        self.filter.option_type = Some(value.into());
        self
    }

    pub fn strike(mut self, range: NumberRange) -> Self {
        self.filter.strike = Some(range);
        self
    }

    pub fn contract_size(mut self, range: NumberRange) -> Self {
        self.filter.contract_size = Some(range);
        self
    }

    pub fn coupon(mut self, range: NumberRange) -> Self {
        self.filter.coupon = Some(range);
        self
    }

    pub fn expiration(mut self, range: DateRange) -> Self {
        self.filter.expiration = Some(range);
        self
    }

    pub fn maturity(mut self, range: DateRange) -> Self {
        self.filter.maturity = Some(range);
        self
    }

    pub fn state_code(mut self, value: impl Into<String>) -> Self {
        self.filter.state_code = Some(value.into());
        self
    }

    pub fn build(self) -> Result<SearchFilter, ValidationError> {
        let filter = self.filter;
        if filter.expiration.is_some() {
            require_subtype(&filter, FilterField::Expiration, EXPIRATION_SUBTYPES)?;
        }
        if filter.maturity.is_some() {
            require_subtype(&filter, FilterField::Maturity, MATURITY_SUBTYPES)?;
        }
        Ok(filter)
    }
}

fn require_subtype(
    filter: &SearchFilter,
    field: FilterField,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    let actual = filter.security_type_2();
    if actual.is_some_and(|subtype| allowed.contains(&subtype)) {
        return Ok(());
    }
    Err(ValidationError::SubtypeMismatch {
        field: field.wire_key(),
        allowed,
        actual: actual.map(str::to_owned),
    })
}
