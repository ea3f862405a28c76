//! IOAT (Intel I/OAT DMA engine) module RPCs.

use serde_json::Value;

use crate::alias::{deprecated_alias, MethodDescriptor};
use crate::client::RpcClient;
use crate::error::RpcResult;

pub const IOAT_SCAN_ACCEL_MODULE: MethodDescriptor =
    MethodDescriptor::with_legacy("ioat_scan_accel_module", &["ioat_scan_accel_engine"]);

/// Scan and enable the IOAT accel module.
pub fn ioat_scan_accel_module<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(IOAT_SCAN_ACCEL_MODULE.name, None)
}

deprecated_alias!(IOAT_SCAN_ACCEL_MODULE, ioat_scan_accel_engine => ioat_scan_accel_module());
