//! The client call interface.
//!
//! Every facade function funnels through [`RpcClient::call`]. The trait is
//! the only thing the facade knows about the transport, which keeps the
//! facade testable against an in-memory recorder and lets embedders bring
//! their own connection handling.

use std::sync::Arc;

use serde_json::Value;

use crate::error::RpcResult;
use crate::params::ParamSet;

/// A connected handle that can issue one RPC call at a time.
///
/// `params` is `None` for methods that take no parameters at all. A `Some`
/// holding an empty set means "parameters accepted, none supplied".
pub trait RpcClient {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value>;
}

impl<T: RpcClient + ?Sized> RpcClient for &T {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
        (**self).call(method, params)
    }
}

impl<T: RpcClient + ?Sized> RpcClient for Box<T> {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
        (**self).call(method, params)
    }
}

impl<T: RpcClient + ?Sized> RpcClient for Arc<T> {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
        (**self).call(method, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    struct Echo {
        seen: Mutex<Vec<String>>,
    }

    impl RpcClient for Echo {
        fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
            self.seen.lock().push(method.to_string());
            Ok(params.map_or(Value::Null, Value::from))
        }
    }

    fn echo() -> Echo {
        Echo {
            seen: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_call_through_reference() {
        let client = echo();
        let by_ref = &client;
        let out = by_ref
            .call("m", Some(ParamSet::new().with("a", Some(1))))
            .unwrap();
        assert_eq!(out, json!({"a": 1}));
        assert_eq!(client.seen.lock().as_slice(), ["m"]);
    }

    #[test]
    fn test_call_through_trait_object() {
        let client: Arc<dyn RpcClient> = Arc::new(echo());
        assert_eq!(client.call("m", None).unwrap(), Value::Null);

        let boxed: Box<dyn RpcClient> = Box::new(echo());
        let as_dyn: &dyn RpcClient = &boxed;
        assert_eq!(as_dyn.call("m", None).unwrap(), Value::Null);
    }
}
