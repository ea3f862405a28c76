//! By-name method dispatch.
//!
//! Automation and the command line address methods by string. The table
//! maps every canonical name and every legacy name to a route; legacy routes
//! hand their notice to the alias registry before running the same handler
//! as the canonical route.

use std::collections::HashMap;
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::alias::{AliasRegistry, DeprecationNotice, MethodDescriptor, Resolution};
use crate::client::RpcClient;
use crate::error::{InvokeError, RegistryError};

/// Decodes JSON arguments and calls one facade function.
pub type Handler = fn(&dyn RpcClient, Value) -> Result<Value, InvokeError>;

#[derive(Clone, Copy)]
enum Route {
    Canonical,
    Legacy(DeprecationNotice),
}

#[derive(Clone, Copy)]
struct Entry {
    route: Route,
    handler: Handler,
}

/// Dispatch table over canonical and legacy method names.
pub struct MethodTable {
    registry: AliasRegistry,
    routes: HashMap<&'static str, Entry>,
}

impl MethodTable {
    pub fn new(registry: AliasRegistry) -> Self {
        MethodTable {
            registry,
            routes: HashMap::new(),
        }
    }

    /// Adds a canonical route for `descriptor` and one legacy route per
    /// retired name.
    pub fn register(
        &mut self,
        descriptor: &MethodDescriptor,
        handler: Handler,
    ) -> Result<(), RegistryError> {
        self.registry.register(descriptor)?;

        self.routes.insert(
            descriptor.name,
            Entry {
                route: Route::Canonical,
                handler,
            },
        );
        for &legacy in descriptor.legacy {
            self.routes.insert(
                legacy,
                Entry {
                    route: Route::Legacy(descriptor.notice(legacy)),
                    handler,
                },
            );
        }
        Ok(())
    }

    /// Calls the method registered under `name`.
    ///
    /// `args` is the JSON object of parameters, or `null` for none.
    pub fn invoke(
        &self,
        client: &dyn RpcClient,
        name: &str,
        args: Value,
    ) -> Result<Value, InvokeError> {
        let entry = self
            .routes
            .get(name)
            .ok_or_else(|| InvokeError::UnknownMethod {
                name: name.to_string(),
            })?;

        match entry.route {
            Route::Canonical => (entry.handler)(client, args),
            Route::Legacy(notice) => self
                .registry
                .invoke_legacy(notice, || (entry.handler)(client, args)),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Resolution> {
        self.registry.resolve(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Canonical method names, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .routes
            .iter()
            .filter(|(_, e)| matches!(e.route, Route::Canonical))
            .map(|(&name, _)| name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.methods())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Decodes handler arguments into a request struct. `null` counts as `{}`.
pub fn decode<T: DeserializeOwned>(method: &str, args: Value) -> Result<T, InvokeError> {
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(args).map_err(|source| InvokeError::InvalidArguments {
        method: method.to_string(),
        source,
    })
}

/// Checks that a parameterless method was given no arguments.
pub fn no_params(method: &str, args: &Value) -> Result<(), InvokeError> {
    match args {
        Value::Null => Ok(()),
        Value::Object(map) if map.is_empty() => Ok(()),
        _ => Err(InvokeError::InvalidArguments {
            method: method.to_string(),
            source: serde_json::Error::custom(format!("{method} takes no parameters")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcResult;
    use crate::params::ParamSet;
    use serde_json::json;

    const PING: MethodDescriptor = MethodDescriptor::with_legacy("ping", &["old_ping"]);

    struct Fixed;

    impl RpcClient for Fixed {
        fn call(&self, method: &str, _params: Option<ParamSet>) -> RpcResult<Value> {
            Ok(json!({ "method": method }))
        }
    }

    fn ping(client: &dyn RpcClient, args: Value) -> Result<Value, InvokeError> {
        no_params("ping", &args)?;
        Ok(client.call("ping", None)?)
    }

    #[test]
    fn test_canonical_and_legacy_routes() {
        let mut table = MethodTable::new(AliasRegistry::default());
        table.register(&PING, ping).unwrap();

        assert_eq!(table.methods(), ["ping"]);
        assert!(table.contains("old_ping"));

        let out = table.invoke(&Fixed, "old_ping", Value::Null).unwrap();
        assert_eq!(out, json!({"method": "ping"}));
        assert!(table.resolve("old_ping").unwrap().is_legacy());
    }

    #[test]
    fn test_unknown_method() {
        let table = MethodTable::new(AliasRegistry::default());
        let err = table.invoke(&Fixed, "nope", Value::Null).unwrap_err();
        assert!(matches!(err, InvokeError::UnknownMethod { name } if name == "nope"));
    }

    #[test]
    fn test_no_params_rejects_arguments() {
        assert!(no_params("ping", &json!({})).is_ok());
        let err = no_params("ping", &json!({"x": 1})).unwrap_err();
        assert!(err.to_string().contains("ping takes no parameters"));
    }

    #[test]
    fn test_decode_null_as_empty() {
        #[derive(serde::Deserialize)]
        struct Opt {
            level: Option<u8>,
        }
        let opt: Opt = decode("m", Value::Null).unwrap();
        assert!(opt.level.is_none());
    }
}
