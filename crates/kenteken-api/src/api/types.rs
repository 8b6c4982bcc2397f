//! API request types.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// JSON field carrying the registration number.
pub const KENTEKEN_FIELD: &str = "Kenteken";

/// Request body for `POST /storeKenteken`.
///
/// Only JSON objects are accepted. The field name is matched ignoring ASCII
/// case; a missing field or `null` decodes to the empty string and other
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KentekenRequest {
    /// Registration number
    pub kenteken: String,
}

impl<'de> Deserialize<'de> for KentekenRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(KentekenRequestVisitor)
    }
}

struct KentekenRequestVisitor;

impl<'de> Visitor<'de> for KentekenRequestVisitor {
    type Value = KentekenRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a JSON object with a {} field", KENTEKEN_FIELD)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut kenteken = String::new();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(KENTEKEN_FIELD) {
                // null keeps the previous value
                if let Some(value) = map.next_value::<Option<String>>()? {
                    kenteken = value;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(KentekenRequest { kenteken })
    }
}
