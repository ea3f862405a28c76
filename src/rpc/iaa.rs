//! IAA (Intel In-Memory Analytics Accelerator) module RPCs.

use serde_json::Value;

use crate::alias::{deprecated_alias, MethodDescriptor};
use crate::client::RpcClient;
use crate::error::RpcResult;

pub const IAA_SCAN_ACCEL_MODULE: MethodDescriptor =
    MethodDescriptor::with_legacy("iaa_scan_accel_module", &["iaa_scan_accel_engine"]);

/// Scan and enable the IAA accel module.
pub fn iaa_scan_accel_module<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(IAA_SCAN_ACCEL_MODULE.name, None)
}

deprecated_alias!(IAA_SCAN_ACCEL_MODULE, iaa_scan_accel_engine => iaa_scan_accel_module());
