//! Call facade tests: parameter sets, delegated method names, pass-through
//! of responses and failures.

use parking_lot::Mutex;
use serde_json::{json, Value};
use spdk_rpc::rpc::{
    accel, dpdk_cryptodev, dsa, iaa, ioat, mlx5, AccelAssignOpc, DpdkCryptodevSetDriver,
    DsaScanAccelModule, Mlx5ScanAccelModule,
};
use spdk_rpc::{ParamSet, RpcClient, RpcError, RpcResult};

// Test Helpers
type Call = (String, Option<ParamSet>);

/// Records every call and answers with a fixed outcome.
struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    outcome: RpcResult<Value>,
}

impl RecordingClient {
    fn ok(response: Value) -> Self {
        RecordingClient {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(response),
        }
    }

    fn failing(err: RpcError) -> Self {
        RecordingClient {
            calls: Mutex::new(Vec::new()),
            outcome: Err(err),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn only_call(&self) -> Call {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }
}

impl RpcClient for RecordingClient {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
        self.calls.lock().push((method.to_string(), params));
        self.outcome.clone()
    }
}

fn params_json(params: Option<ParamSet>) -> Value {
    params.map_or(Value::Null, Value::from)
}

// mlx5 Tests
#[test]
fn test_mlx5_enable_crypto_only() {
    let client = RecordingClient::ok(json!(true));
    let request = Mlx5ScanAccelModule {
        enable_crypto: Some(true),
        ..Default::default()
    };

    let out = mlx5::mlx5_scan_accel_module(&client, &request).unwrap();
    assert_eq!(out, json!(true));

    let (method, params) = client.only_call();
    assert_eq!(method, "mlx5_scan_accel_module");
    assert_eq!(params_json(params), json!({"enable_crypto": true}));
}

#[test]
fn test_mlx5_no_parameters() {
    let client = RecordingClient::ok(json!(true));
    mlx5::mlx5_scan_accel_module(&client, &Mlx5ScanAccelModule::default()).unwrap();

    let (method, params) = client.only_call();
    assert_eq!(method, "mlx5_scan_accel_module");
    let params = params.expect("mlx5 always sends a parameter object");
    assert!(params.is_empty());
}

#[test]
fn test_mlx5_all_parameters() {
    let client = RecordingClient::ok(json!(true));
    let request = Mlx5ScanAccelModule {
        qp_size: Some(64),
        num_requests: Some(2048),
        enable_crypto: Some(true),
        use_crypto_mb: Some(false),
        split_mb_blocks: Some(8),
    };
    mlx5::mlx5_scan_accel_module(&client, &request).unwrap();

    let (_, params) = client.only_call();
    assert_eq!(
        params_json(params),
        json!({
            "qp_size": 64,
            "num_requests": 2048,
            "enable_crypto": true,
            "use_crypto_mb": false,
            "split_mb_blocks": 8,
        })
    );
}

#[test]
fn test_mlx5_same_request_same_params() {
    let client = RecordingClient::ok(json!(true));
    let request = Mlx5ScanAccelModule {
        qp_size: Some(32),
        use_crypto_mb: Some(true),
        ..Default::default()
    };
    mlx5::mlx5_scan_accel_module(&client, &request).unwrap();
    mlx5::mlx5_scan_accel_module(&client, &request).unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

// Parameterless Methods
#[test]
fn test_parameterless_methods_send_no_params() {
    let client = RecordingClient::ok(json!(true));
    iaa::iaa_scan_accel_module(&client).unwrap();
    ioat::ioat_scan_accel_module(&client).unwrap();
    dpdk_cryptodev::dpdk_cryptodev_scan_accel_module(&client).unwrap();
    dpdk_cryptodev::dpdk_cryptodev_get_driver(&client).unwrap();
    accel::accel_get_opc_assignments(&client).unwrap();
    accel::accel_get_module_info(&client).unwrap();

    let calls = client.calls();
    let methods: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(
        methods,
        [
            "iaa_scan_accel_module",
            "ioat_scan_accel_module",
            "dpdk_cryptodev_scan_accel_module",
            "dpdk_cryptodev_get_driver",
            "accel_get_opc_assignments",
            "accel_get_module_info",
        ]
    );
    assert!(calls.iter().all(|(_, p)| p.is_none()));
}

// Methods with Parameters
#[test]
fn test_dsa_kernel_mode() {
    let client = RecordingClient::ok(json!(true));
    dsa::dsa_scan_accel_module(&client, &DsaScanAccelModule::default()).unwrap();
    dsa::dsa_scan_accel_module(
        &client,
        &DsaScanAccelModule {
            config_kernel_mode: Some(true),
        },
    )
    .unwrap();

    let calls = client.calls();
    assert_eq!(params_json(calls[0].1.clone()), json!({}));
    assert_eq!(params_json(calls[1].1.clone()), json!({"config_kernel_mode": true}));
}

#[test]
fn test_required_parameters() {
    let client = RecordingClient::ok(json!(true));
    dpdk_cryptodev::dpdk_cryptodev_set_driver(
        &client,
        &DpdkCryptodevSetDriver {
            driver_name: "crypto_aesni_mb".to_string(),
        },
    )
    .unwrap();
    accel::accel_assign_opc(
        &client,
        &AccelAssignOpc {
            opname: "copy".to_string(),
            module: "software".to_string(),
        },
    )
    .unwrap();

    let calls = client.calls();
    assert_eq!(calls[0].0, "dpdk_cryptodev_set_driver");
    assert_eq!(
        params_json(calls[0].1.clone()),
        json!({"driver_name": "crypto_aesni_mb"})
    );
    assert_eq!(calls[1].0, "accel_assign_opc");
    assert_eq!(
        params_json(calls[1].1.clone()),
        json!({"opname": "copy", "module": "software"})
    );
}

// Response and Failure Pass-through
#[test]
fn test_response_returned_verbatim() {
    let response = json!({"driver_name": "mlx5_pci", "extra": [1, 2, 3]});
    let client = RecordingClient::ok(response.clone());
    let out = dpdk_cryptodev::dpdk_cryptodev_get_driver(&client).unwrap();
    assert_eq!(out, response);
}

#[test]
fn test_server_error_propagates_unchanged() {
    let err = RpcError::Server {
        method: "mlx5_scan_accel_module".to_string(),
        code: -32603,
        message: "mlx5 module is already enabled".to_string(),
        data: Some(json!({"hint": "restart"})),
    };
    let client = RecordingClient::failing(err.clone());

    let got = mlx5::mlx5_scan_accel_module(&client, &Mlx5ScanAccelModule::default()).unwrap_err();
    match got {
        RpcError::Server {
            code,
            message,
            data,
            ..
        } => {
            assert_eq!(code, -32603);
            assert_eq!(message, "mlx5 module is already enabled");
            assert_eq!(data, Some(json!({"hint": "restart"})));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn test_transport_error_propagates_unchanged() {
    let client = RecordingClient::failing(RpcError::ConnectionLost {
        reason: "broken pipe".to_string(),
    });
    let got = iaa::iaa_scan_accel_module(&client).unwrap_err();
    assert!(got.is_transport());
    assert_eq!(got.to_string(), "Connection lost: broken pipe");
    // Exactly one attempt, no retry at this layer
    assert_eq!(client.calls().len(), 1);
}

#[test]
fn test_facade_accepts_trait_object() {
    let client = RecordingClient::ok(json!(true));
    let dyn_client: &dyn RpcClient = &client;
    ioat::ioat_scan_accel_module(dyn_client).unwrap();
    assert_eq!(client.only_call().0, "ioat_scan_accel_module");
}
