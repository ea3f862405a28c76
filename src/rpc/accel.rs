//! Generic accel framework RPCs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::{deprecated_alias, MethodDescriptor};
use crate::client::RpcClient;
use crate::error::RpcResult;
use crate::params::ParamSet;

pub const ACCEL_GET_OPC_ASSIGNMENTS: MethodDescriptor =
    MethodDescriptor::new("accel_get_opc_assignments");
pub const ACCEL_GET_MODULE_INFO: MethodDescriptor =
    MethodDescriptor::with_legacy("accel_get_module_info", &["accel_get_engine_info"]);
pub const ACCEL_ASSIGN_OPC: MethodDescriptor = MethodDescriptor::new("accel_assign_opc");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccelAssignOpc {
    /// Operation name, e.g. `copy` or `crc32c`
    pub opname: String,
    /// Module that should execute it
    pub module: String,
}

/// Get the list of opcode name to module assignments.
pub fn accel_get_opc_assignments<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(ACCEL_GET_OPC_ASSIGNMENTS.name, None)
}

/// Get the list of valid module names and their operations.
pub fn accel_get_module_info<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(ACCEL_GET_MODULE_INFO.name, None)
}

deprecated_alias!(ACCEL_GET_MODULE_INFO, accel_get_engine_info => accel_get_module_info());

/// Manually assign an operation to a module.
pub fn accel_assign_opc<C: RpcClient + ?Sized>(
    client: &C,
    request: &AccelAssignOpc,
) -> RpcResult<Value> {
    let params = ParamSet::from_request(request)?;
    client.call(ACCEL_ASSIGN_OPC.name, Some(params))
}
