//! Type-tagged envelope for values whose concrete type is only known at runtime

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A JSON-encoded value tagged with the URL of its concrete type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    /// Fully qualified type name, e.g. `/ibc.lightclients.solomachine.v1.ClientState`
    pub type_url: String,
    /// JSON encoding of the concrete value
    #[serde(with = "crate::base64")]
    pub value: Vec<u8>,
}

impl Any {
    /// Wraps `msg` under `type_url`
    /// # Errors
    /// Returns an error if `msg` cannot be serialized
    pub fn pack<T: Serialize>(type_url: impl Into<String>, msg: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            type_url: type_url.into(),
            value: serde_json::to_vec(msg)?,
        })
    }

    /// Decodes the value as `T`. The type URL is not checked.
    /// # Errors
    /// Returns an error if the value does not decode as `T`
    pub fn unpack<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Foo {
        bar: u64,
    }

    #[test]
    fn value_is_base64_json() {
        let any = Any::pack("/test.Foo", &Foo { bar: 7 }).unwrap();
        let json = serde_json::to_value(&any).unwrap();
        assert_eq!(json["type_url"], "/test.Foo");
        // base64 of `{"bar":7}`
        assert_eq!(json["value"], "eyJiYXIiOjd9");

        let back: Any = serde_json::from_value(json).unwrap();
        assert_eq!(back.unpack::<Foo>().unwrap(), Foo { bar: 7 });
    }

    #[test]
    fn rejects_invalid_base64() {
        let res = serde_json::from_str::<Any>(r#"{"type_url":"/x","value":"!!"}"#);
        assert!(res.is_err());
    }
}
