//! Common serde helpers
//!
//! 支持两种 RecordId 格式的反序列化：
//! - 字符串格式 "table:id" (来自 API JSON)
//! - SurrealDB 原生格式 (来自数据库)
//!
//! 以及后台表单的数字容错 (数字或数字字符串)。

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// 内部辅助：同时支持字符串和原生 RecordId 格式
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // 委托给 RecordId 原生反序列化
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// Option<RecordId> serialization as "table:id" string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

/// 数字或数字字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        let value = match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
            Numeric::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<f64>()
                    .map_err(|_| E::custom(format!("expected a number, got '{}'", s)))?
            }
        };
        if !value.is_finite() {
            return Err(E::custom("number must be finite"));
        }
        Ok(Some(value))
    }

    fn into_i64<E: serde::de::Error>(self) -> Result<Option<i64>, E> {
        match self {
            Numeric::Int(i) => Ok(Some(i)),
            other => match other.into_f64::<E>()? {
                Some(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
                Some(f) => Err(E::custom(format!("expected a whole number, got {}", f))),
                None => Ok(None),
            },
        }
    }
}

/// Option<f64> that also accepts numeric strings; "" and null map to None
pub mod lenient_option_f64 {
    use super::*;

    pub fn deserialize<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Numeric>::deserialize(d)? {
            Some(n) => n.into_f64(),
            None => Ok(None),
        }
    }
}

/// Option<i64> that also accepts numeric strings; "" and null map to None
pub mod lenient_option_i64 {
    use super::*;

    pub fn deserialize<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Numeric>::deserialize(d)? {
            Some(n) => n.into_i64(),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, with = "super::lenient_option_f64")]
        price: Option<f64>,
        #[serde(default, with = "super::lenient_option_i64")]
        stock: Option<i64>,
        #[serde(default, with = "super::lenient_option_f64")]
        deal: Option<f64>,
    }

    #[test]
    fn test_numbers_and_strings() {
        let f: Form = serde_json::from_str(r#"{"price":"4500","stock":"12","deal":3999.5}"#).unwrap();
        assert_eq!(f.price, Some(4500.0));
        assert_eq!(f.stock, Some(12));
        assert_eq!(f.deal, Some(3999.5));

        let f: Form = serde_json::from_str(r#"{"price":12,"stock":3.0,"deal":""}"#).unwrap();
        assert_eq!(f.price, Some(12.0));
        assert_eq!(f.stock, Some(3));
        assert_eq!(f.deal, None);

        let f: Form = serde_json::from_str(r#"{"price":1}"#).unwrap();
        assert_eq!(f.stock, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Form>(r#"{"price":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"price":1,"stock":2.5}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"price":"1e400"}"#).is_err());
    }

    #[test]
    fn test_record_id_from_string() {
        #[derive(Deserialize)]
        struct WithId {
            #[serde(default, with = "super::option_record_id")]
            id: Option<surrealdb::RecordId>,
        }
        let w: WithId = serde_json::from_str(r#"{"id":"product:abc"}"#).unwrap();
        assert_eq!(w.id.unwrap().to_string(), "product:abc");
        let w: WithId = serde_json::from_str(r#"{}"#).unwrap();
        assert!(w.id.is_none());
    }
}
