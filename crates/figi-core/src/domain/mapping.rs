use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ValidationError;

/// Mapping-job properties whose legal values can be listed through
/// `/v2/mapping/values/{property}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingProperty {
    IdType,
    ExchangeCode,
    MicCode,
    Currency,
    MarketSectorDescription,
    SecurityType,
    SecurityType2,
    StateCode,
}

impl MappingProperty {
    pub const ALL: [Self; 8] = [
        Self::IdType,
        Self::ExchangeCode,
        Self::MicCode,
        Self::Currency,
        Self::MarketSectorDescription,
        Self::SecurityType,
        Self::SecurityType2,
        Self::StateCode,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdType => "idType",
            Self::ExchangeCode => "exchCode",
            Self::MicCode => "micCode",
            Self::Currency => "currency",
            Self::MarketSectorDescription => "marketSecDes",
            Self::SecurityType => "securityType",
            Self::SecurityType2 => "securityType2",
            Self::StateCode => "stateCode",
        }
    }
}

impl Display for MappingProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingProperty {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingProperty);
        }

        Self::ALL
            .into_iter()
            .find(|property| property.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownProperty {
                value: trimmed.to_owned(),
            })
    }
}
