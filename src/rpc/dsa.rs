//! DSA (Intel Data Streaming Accelerator) module RPCs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::{deprecated_alias, MethodDescriptor};
use crate::client::RpcClient;
use crate::error::RpcResult;
use crate::params::ParamSet;

pub const DSA_SCAN_ACCEL_MODULE: MethodDescriptor =
    MethodDescriptor::with_legacy("dsa_scan_accel_module", &["dsa_scan_accel_engine"]);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DsaScanAccelModule {
    /// Use kernel DSA devices (idxd driver) instead of user-space ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_kernel_mode: Option<bool>,
}

/// Scan and enable the DSA accel module.
pub fn dsa_scan_accel_module<C: RpcClient + ?Sized>(
    client: &C,
    request: &DsaScanAccelModule,
) -> RpcResult<Value> {
    let params = ParamSet::new().with("config_kernel_mode", request.config_kernel_mode);
    client.call(DSA_SCAN_ACCEL_MODULE.name, Some(params))
}

deprecated_alias!(
    DSA_SCAN_ACCEL_MODULE,
    dsa_scan_accel_engine => dsa_scan_accel_module(request: &DsaScanAccelModule)
);
