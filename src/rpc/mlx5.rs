//! mlx5 accel module RPCs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::MethodDescriptor;
use crate::client::RpcClient;
use crate::error::RpcResult;
use crate::params::ParamSet;

pub const MLX5_SCAN_ACCEL_MODULE: MethodDescriptor =
    MethodDescriptor::new("mlx5_scan_accel_module");

/// Parameters for [`mlx5_scan_accel_module`]. Every field is optional; a
/// `None` leaves the server default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mlx5ScanAccelModule {
    /// Qpair size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qp_size: Option<u16>,
    /// Size of the global requests pool per mlx5 device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_requests: Option<u32>,
    /// Enable crypto operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_crypto: Option<bool>,
    /// Use crypto multi-block operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_crypto_mb: Option<bool>,
    /// Number of data blocks per multi-block operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_mb_blocks: Option<u32>,
}

impl Mlx5ScanAccelModule {
    pub fn params(&self) -> ParamSet {
        ParamSet::new()
            .with("qp_size", self.qp_size)
            .with("num_requests", self.num_requests)
            .with("enable_crypto", self.enable_crypto)
            .with("use_crypto_mb", self.use_crypto_mb)
            .with("split_mb_blocks", self.split_mb_blocks)
    }
}

/// Enable the mlx5 accel module. Scans all mlx5 devices which can perform
/// the needed operations.
pub fn mlx5_scan_accel_module<C: RpcClient + ?Sized>(
    client: &C,
    request: &Mlx5ScanAccelModule,
) -> RpcResult<Value> {
    client.call(MLX5_SCAN_ACCEL_MODULE.name, Some(request.params()))
}
