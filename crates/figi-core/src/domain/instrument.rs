use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One matched instrument from a search page.
///
/// Every field is optional: OpenFIGI omits or nulls attributes it does not
/// have, and fields not listed here are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(default)]
    pub figi: Option<String>,
    #[serde(default, rename = "securityType")]
    pub security_type: Option<String>,
    #[serde(default, rename = "securityType2")]
    pub security_type_2: Option<String>,
    #[serde(default, rename = "marketSector", alias = "marketSecDes")]
    pub market_sector: Option<String>,
    #[serde(default, rename = "exchCode")]
    pub exchange_code: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "shareClassFIGI")]
    pub share_class_figi: Option<String>,
    #[serde(default, rename = "compositeFIGI")]
    pub composite_figi: Option<String>,
    #[serde(default, rename = "securityDescription")]
    pub security_description: Option<String>,
    #[serde(default, rename = "uniqueIDFutOpt")]
    pub future_or_option_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Instrument {
    /// Decodes one `data` element. Only JSON objects are accepted; serde
    /// would otherwise fill the struct positionally from an array.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.is_object() {
            return serde_json::from_value(value);
        }

        let unexpected = match &value {
            Value::Object(_) | Value::Array(_) => Unexpected::Seq,
            Value::String(text) => Unexpected::Str(text),
            Value::Bool(flag) => Unexpected::Bool(*flag),
            Value::Number(_) => Unexpected::Other("number"),
            Value::Null => Unexpected::Unit,
        };
        Err(serde_json::Error::invalid_type(unexpected, &"an instrument object"))
    }
}
