//! Accel RPC call facade
//!
//! One function per RPC method. Each builds the sparse parameter set for its
//! method and hands it to [`crate::client::RpcClient::call`]; responses and
//! failures come back exactly as the client produced them.
//!
//! | Module | Methods |
//! |--------|---------|
//! | `accel` | `accel_get_opc_assignments`, `accel_get_module_info`, `accel_assign_opc` |
//! | `dpdk_cryptodev` | `dpdk_cryptodev_scan_accel_module`, `dpdk_cryptodev_set_driver`, `dpdk_cryptodev_get_driver` |
//! | `dsa` | `dsa_scan_accel_module` |
//! | `iaa` | `iaa_scan_accel_module` |
//! | `ioat` | `ioat_scan_accel_module` |
//! | `mlx5` | `mlx5_scan_accel_module` |

pub mod accel;
pub mod dpdk_cryptodev;
pub mod dsa;
pub mod iaa;
pub mod ioat;
pub mod mlx5;

pub use accel::{AccelAssignOpc, ACCEL_ASSIGN_OPC, ACCEL_GET_MODULE_INFO, ACCEL_GET_OPC_ASSIGNMENTS};
pub use dpdk_cryptodev::{
    DpdkCryptodevSetDriver, DPDK_CRYPTODEV_GET_DRIVER, DPDK_CRYPTODEV_SCAN_ACCEL_MODULE,
    DPDK_CRYPTODEV_SET_DRIVER,
};
pub use dsa::{DsaScanAccelModule, DSA_SCAN_ACCEL_MODULE};
pub use iaa::IAA_SCAN_ACCEL_MODULE;
pub use ioat::IOAT_SCAN_ACCEL_MODULE;
pub use mlx5::{Mlx5ScanAccelModule, MLX5_SCAN_ACCEL_MODULE};

use crate::alias::{AliasRegistry, MethodDescriptor};
use crate::dispatch::{decode, no_params, MethodTable};
use crate::error::RegistryError;

/// Every method this crate exposes
pub const DESCRIPTORS: &[MethodDescriptor] = &[
    ACCEL_GET_OPC_ASSIGNMENTS,
    ACCEL_GET_MODULE_INFO,
    ACCEL_ASSIGN_OPC,
    DPDK_CRYPTODEV_SCAN_ACCEL_MODULE,
    DPDK_CRYPTODEV_SET_DRIVER,
    DPDK_CRYPTODEV_GET_DRIVER,
    DSA_SCAN_ACCEL_MODULE,
    IAA_SCAN_ACCEL_MODULE,
    IOAT_SCAN_ACCEL_MODULE,
    MLX5_SCAN_ACCEL_MODULE,
];

/// Registers every method's legacy names in `registry`.
pub fn register_aliases(registry: &mut AliasRegistry) -> Result<(), RegistryError> {
    for descriptor in DESCRIPTORS {
        registry.register(descriptor)?;
    }
    Ok(())
}

/// Builds the by-name dispatch table for every method in this module.
pub fn accel_methods(registry: AliasRegistry) -> Result<MethodTable, RegistryError> {
    let mut table = MethodTable::new(registry);

    table.register(&ACCEL_GET_OPC_ASSIGNMENTS, |client, args| {
        no_params(ACCEL_GET_OPC_ASSIGNMENTS.name, &args)?;
        Ok(accel::accel_get_opc_assignments(client)?)
    })?;
    table.register(&ACCEL_GET_MODULE_INFO, |client, args| {
        no_params(ACCEL_GET_MODULE_INFO.name, &args)?;
        Ok(accel::accel_get_module_info(client)?)
    })?;
    table.register(&ACCEL_ASSIGN_OPC, |client, args| {
        let request: AccelAssignOpc = decode(ACCEL_ASSIGN_OPC.name, args)?;
        Ok(accel::accel_assign_opc(client, &request)?)
    })?;

    table.register(&DPDK_CRYPTODEV_SCAN_ACCEL_MODULE, |client, args| {
        no_params(DPDK_CRYPTODEV_SCAN_ACCEL_MODULE.name, &args)?;
        Ok(dpdk_cryptodev::dpdk_cryptodev_scan_accel_module(client)?)
    })?;
    table.register(&DPDK_CRYPTODEV_SET_DRIVER, |client, args| {
        let request: DpdkCryptodevSetDriver = decode(DPDK_CRYPTODEV_SET_DRIVER.name, args)?;
        Ok(dpdk_cryptodev::dpdk_cryptodev_set_driver(client, &request)?)
    })?;
    table.register(&DPDK_CRYPTODEV_GET_DRIVER, |client, args| {
        no_params(DPDK_CRYPTODEV_GET_DRIVER.name, &args)?;
        Ok(dpdk_cryptodev::dpdk_cryptodev_get_driver(client)?)
    })?;

    table.register(&DSA_SCAN_ACCEL_MODULE, |client, args| {
        let request: DsaScanAccelModule = decode(DSA_SCAN_ACCEL_MODULE.name, args)?;
        Ok(dsa::dsa_scan_accel_module(client, &request)?)
    })?;
    table.register(&IAA_SCAN_ACCEL_MODULE, |client, args| {
        no_params(IAA_SCAN_ACCEL_MODULE.name, &args)?;
        Ok(iaa::iaa_scan_accel_module(client)?)
    })?;
    table.register(&IOAT_SCAN_ACCEL_MODULE, |client, args| {
        no_params(IOAT_SCAN_ACCEL_MODULE.name, &args)?;
        Ok(ioat::ioat_scan_accel_module(client)?)
    })?;
    table.register(&MLX5_SCAN_ACCEL_MODULE, |client, args| {
        let request: Mlx5ScanAccelModule = decode(MLX5_SCAN_ACCEL_MODULE.name, args)?;
        Ok(mlx5::mlx5_scan_accel_module(client, &request)?)
    })?;

    Ok(table)
}
