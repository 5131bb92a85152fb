//! Serde support for [`Snowflake`].
//!
//! By default a [`Snowflake`] serializes as its compact token string. Use
//! [`as_native`] on a field to store the raw `u64` instead, or
//! [`as_fixed_token`] for the 11 character form.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Snowflake;

struct TokenVisitor;

impl de::Visitor<'_> for TokenVisitor {
    type Value = Snowflake;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("a URL-safe base64 snowflake token")
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Snowflake::from_token(v).map_err(de::Error::custom)
    }
}

impl Serialize for Snowflake {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_token())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(TokenVisitor)
    }
}

pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::Snowflake;

    /// Serialize a snowflake as its packed integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Snowflake, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake from its packed integer. Every `u64` is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<Snowflake, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(Snowflake::from_raw)
    }
}

pub mod as_fixed_token {
    use super::{Deserializer, Serializer, TokenVisitor};
    use crate::Snowflake;

    /// Serialize a snowflake as its fixed-width, 11 character token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Snowflake, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_fixed_token())
    }

    /// Deserialize a snowflake from a token of either width.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a valid token.
    pub fn deserialize<'de, D>(d: D) -> Result<Snowflake, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(TokenVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Discriminator;
    use serde_json::json;

    fn sample() -> Snowflake {
        Snowflake::from_parts(1_000_000, Discriminator::new(5).unwrap()).unwrap()
    }

    #[test]
    fn default_is_compact_token() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            event_id: Snowflake,
        }
        let row = Row {
            event_id: Snowflake::from_raw(0x0102_0304),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"AQIDBA"}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_stores_raw_integer() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_native")]
            event_id: Snowflake,
        }
        let row = Row { event_id: sample() };

        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value, json!({ "event_id": (1_000_000u64 << 6) | 5 }));
        let back: Row = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_accepts_any_u64() {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[serde(with = "as_native")]
            event_id: Snowflake,
        }
        let row: Row = serde_json::from_value(json!({ "event_id": u64::MAX })).unwrap();
        assert_eq!(row.event_id.to_raw(), u64::MAX);
        assert_eq!(row.event_id.discriminator().get(), 63);
    }

    #[test]
    fn fixed_token_is_eleven_chars() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_fixed_token")]
            event_id: Snowflake,
        }
        let row = Row {
            event_id: Snowflake::from_raw(0x0102_0304),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"AAAAAAECAwQ"}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn invalid_token_fails() {
        let err = serde_json::from_value::<Snowflake>(json!("AQ==")).expect_err("should fail");
        assert!(err.to_string().contains("invalid token"), "{err}");

        let err = serde_json::from_value::<Snowflake>(json!("")).expect_err("should fail");
        assert!(err.to_string().contains("length"), "{err}");

        assert!(serde_json::from_value::<Snowflake>(json!(42)).is_err());
    }
}
