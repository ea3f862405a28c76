//! DPDK cryptodev accel module RPCs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::MethodDescriptor;
use crate::client::RpcClient;
use crate::error::RpcResult;
use crate::params::ParamSet;

pub const DPDK_CRYPTODEV_SCAN_ACCEL_MODULE: MethodDescriptor =
    MethodDescriptor::new("dpdk_cryptodev_scan_accel_module");
pub const DPDK_CRYPTODEV_SET_DRIVER: MethodDescriptor =
    MethodDescriptor::new("dpdk_cryptodev_set_driver");
pub const DPDK_CRYPTODEV_GET_DRIVER: MethodDescriptor =
    MethodDescriptor::new("dpdk_cryptodev_get_driver");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DpdkCryptodevSetDriver {
    /// Crypto PMD name, e.g. `crypto_aesni_mb`, `crypto_qat` or `mlx5_pci`
    pub driver_name: String,
}

/// Enable the DPDK cryptodev accel module.
pub fn dpdk_cryptodev_scan_accel_module<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(DPDK_CRYPTODEV_SCAN_ACCEL_MODULE.name, None)
}

/// Select the cryptodev driver the module uses.
pub fn dpdk_cryptodev_set_driver<C: RpcClient + ?Sized>(
    client: &C,
    request: &DpdkCryptodevSetDriver,
) -> RpcResult<Value> {
    let params = ParamSet::from_request(request)?;
    client.call(DPDK_CRYPTODEV_SET_DRIVER.name, Some(params))
}

/// Get the cryptodev driver currently in use.
pub fn dpdk_cryptodev_get_driver<C: RpcClient + ?Sized>(client: &C) -> RpcResult<Value> {
    client.call(DPDK_CRYPTODEV_GET_DRIVER.name, None)
}
