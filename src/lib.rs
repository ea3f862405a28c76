//! # spdk-rpc
//!
//! Client-side facade over the SPDK JSON-RPC management plane for the accel
//! (storage acceleration) subsystem.
//!
//! ## Call Path
//!
//! ```text
//! caller
//!     ↓
//! [Alias shim]          → legacy name? emit deprecation notice
//!     ↓
//! [Call facade]         → one function per RPC method
//!     ↓
//! [ParamSet]            → only the parameters the caller supplied
//!     ↓
//! [RpcClient::call]     → transport (JSON-RPC 2.0 over Unix socket / TCP)
//!     ↓
//! response, unchanged
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spdk_rpc::rpc::{self, Mlx5ScanAccelModule};
//! use spdk_rpc::{AliasRegistry, Config, JsonRpcClient};
//!
//! let config = Config::load()?;
//! let client = JsonRpcClient::connect(&config.client)?;
//!
//! // Sends {"enable_crypto": true} and nothing else
//! rpc::mlx5::mlx5_scan_accel_module(
//!     &client,
//!     &Mlx5ScanAccelModule { enable_crypto: Some(true), ..Default::default() },
//! )?;
//!
//! // Old names still work, with a deprecation notice
//! let table = rpc::accel_methods(AliasRegistry::from_config(&config.deprecation))?;
//! table.invoke(&client, "iaa_scan_accel_engine", serde_json::Value::Null)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `rpc` | Call facade, one function per method |
//! | `alias` | Legacy method names and deprecation notices |
//! | `dispatch` | By-name invocation over canonical and legacy names |
//! | `params` | Sparse parameter sets |
//! | `client` | The client call interface trait |
//! | `transport` | Blocking JSON-RPC client |
//! | `config` | Configuration loading |

pub mod alias; // Deprecated-name registry and shim
pub mod client; // Client call interface
pub mod config; // Configuration system
pub mod dispatch; // Name → handler table
pub mod error; // Error types
pub mod logging; // Subscriber assembly
pub mod params; // Sparse parameter sets
pub mod rpc; // Call facade
pub mod transport; // JSON-RPC over Unix socket / TCP

pub use alias::{AliasRegistry, DeprecationNotice, MethodDescriptor, Resolution};
pub use client::RpcClient;
pub use config::{Config, DeprecationPolicy};
pub use dispatch::MethodTable;
pub use error::{InvokeError, RegistryError, RpcError, RpcResult};
pub use params::ParamSet;
pub use transport::JsonRpcClient;
