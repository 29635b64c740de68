use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::{Number, Value};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (key, item) in obj {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::I32(n) => serializer.serialize_i32(n),
            Self::U32(n) => serializer.serialize_u32(n),
            Self::I64(n) => serializer.serialize_i64(n),
            Self::U64(n) => serializer.serialize_u64(n),
            Self::F64(f) => serializer.serialize_f64(f),
        }
    }
}
