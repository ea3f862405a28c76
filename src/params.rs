//! Sparse parameter sets.
//!
//! A [`ParamSet`] carries only the parameters a caller actually supplied.
//! Leaving a knob out is how the server is told to use its own default, so
//! unset values are dropped rather than sent as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RpcError;

/// Named parameter values for one RPC call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(Map<String, Value>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set from a request struct.
    ///
    /// Request structs mark their optional fields with
    /// `skip_serializing_if = "Option::is_none"`, so the object that comes out
    /// of serde already has the unset fields removed. `None` fields that slip
    /// through as `null` are stripped here as well.
    pub fn from_request<T: Serialize + ?Sized>(request: &T) -> Result<Self, RpcError> {
        match serde_json::to_value(request)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect()),
            Value::Null => Ok(Self::new()),
            other => Err(RpcError::SerializationError {
                message: format!("request must serialize to an object, got {other}"),
            }),
        }
    }

    /// Inserts `value` under `name` if it is present.
    pub fn insert_opt<V: Into<Value>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.0.insert(name.to_string(), value.into());
        }
    }

    /// Builder form of [`ParamSet::insert_opt`].
    #[must_use]
    pub fn with<V: Into<Value>>(mut self, name: &str, value: Option<V>) -> Self {
        self.insert_opt(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl FromIterator<(String, Value)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ParamSet(iter.into_iter().collect())
    }
}

impl From<ParamSet> for Value {
    fn from(params: ParamSet) -> Self {
        Value::Object(params.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Knobs {
        #[serde(skip_serializing_if = "Option::is_none")]
        depth: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fast: Option<bool>,
    }

    #[derive(Serialize)]
    struct Unskipped {
        depth: Option<u32>,
    }

    #[test]
    fn test_insert_opt_skips_none() {
        let mut params = ParamSet::new();
        params.insert_opt("depth", None::<u32>);
        params.insert_opt("fast", Some(true));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("fast"), Some(&json!(true)));
        assert!(!params.contains("depth"));
    }

    #[test]
    fn test_from_request_drops_unset() {
        let params = ParamSet::from_request(&Knobs {
            depth: None,
            fast: Some(false),
        })
        .unwrap();
        assert_eq!(Value::from(params), json!({"fast": false}));
    }

    #[test]
    fn test_from_request_strips_null_fields() {
        let params = ParamSet::from_request(&Unskipped { depth: None }).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_from_request_rejects_scalars() {
        let err = ParamSet::from_request(&5u32).unwrap_err();
        assert!(matches!(err, RpcError::SerializationError { .. }));
    }

    #[test]
    fn test_zero_and_false_are_kept() {
        let params = ParamSet::new()
            .with("depth", Some(0u32))
            .with("fast", Some(false));
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("depth"), Some(&json!(0)));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let params = ParamSet::new().with("qp_size", Some(64u16));
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"qp_size":64}"#);
    }
}
