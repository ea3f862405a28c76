//! Blocking JSON-RPC 2.0 transport.
//!
//! Talks to an SPDK application over its RPC listener, either a Unix domain
//! socket (the default `/var/tmp/spdk.sock`) or a TCP address. One request is
//! in flight per client; concurrent callers queue on the connection lock.
//!
//! A failed write or read leaves the stream at an unknown position, so the
//! connection is dropped and every later call fails with
//! [`RpcError::ConnectionLost`]. Reconnect to recover.
//!
//! ```text
//! -> {"jsonrpc":"2.0","method":"iaa_scan_accel_module","id":1}
//! <- {"jsonrpc":"2.0","id":1,"result":true}
//! ```

use std::io::{self, BufReader, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::RpcClient;
use crate::config::ClientConfig;
use crate::error::{RpcError, RpcResult};
use crate::params::ParamSet;

/// JSON-RPC protocol version sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Delay between connection attempts
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(200);

enum Stream {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Stream {
    fn open(address: &str, port: u16) -> io::Result<Self> {
        if address.starts_with('/') {
            #[cfg(unix)]
            return UnixStream::connect(address).map(Stream::Unix);
            #[cfg(not(unix))]
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "unix domain sockets are not available on this platform",
            ));
        }
        TcpStream::connect((address, port)).map(Stream::Tcp)
    }

    fn set_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => {
                s.set_read_timeout(timeout)?;
                s.set_write_timeout(timeout)
            }
            Stream::Tcp(s) => {
                s.set_read_timeout(timeout)?;
                s.set_write_timeout(timeout)
            }
        }
    }

    fn try_clone(&self) -> io::Result<Self> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.try_clone().map(Stream::Unix),
            Stream::Tcp(s) => s.try_clone().map(Stream::Tcp),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.read(buf),
            Stream::Tcp(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.write(buf),
            Stream::Tcp(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.flush(),
            Stream::Tcp(s) => s.flush(),
        }
    }
}

struct Connection {
    writer: Stream,
    // Kept across calls: bytes buffered past one response belong to the next.
    reader: BufReader<Stream>,
}

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<ParamSet>,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

// Distinguishes `"result": null` from a missing `result` member.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Blocking JSON-RPC client for an SPDK RPC listener.
pub struct JsonRpcClient {
    address: String,
    timeout: Option<Duration>,
    next_id: AtomicU64,
    // None once a call has failed mid-exchange
    conn: Mutex<Option<Connection>>,
}

impl JsonRpcClient {
    /// Connects to the listener described by `config`.
    ///
    /// Failed attempts are retried `conn_retries` times before giving up.
    pub fn connect(config: &ClientConfig) -> RpcResult<Self> {
        let address = config.endpoint();
        let timeout = config.timeout();

        let mut attempt = 0;
        let stream = loop {
            match Stream::open(&config.address, config.port) {
                Ok(stream) => break stream,
                Err(e) if attempt < config.conn_retries => {
                    attempt += 1;
                    tracing::debug!(%address, attempt, error = %e, "connect failed, retrying");
                    std::thread::sleep(CONNECT_RETRY_DELAY);
                }
                Err(e) => {
                    return Err(RpcError::ConnectionFailed {
                        address,
                        reason: e.to_string(),
                    })
                }
            }
        };

        let setup = |e: io::Error| RpcError::ConnectionFailed {
            address: address.clone(),
            reason: e.to_string(),
        };
        stream.set_timeout(timeout).map_err(setup)?;
        let reader = BufReader::new(stream.try_clone().map_err(setup)?);

        tracing::debug!(%address, "connected to rpc listener");

        Ok(JsonRpcClient {
            address,
            timeout,
            next_id: AtomicU64::new(1),
            conn: Mutex::new(Some(Connection {
                writer: stream,
                reader,
            })),
        })
    }

    /// Address this client is connected to
    pub fn address(&self) -> &str {
        &self.address
    }

    /// False once a call has broken the connection.
    pub fn is_connected(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Sends one request and reads its response, with the lock held.
    fn exchange(
        &self,
        conn: &mut Connection,
        method: &str,
        id: u64,
        payload: &[u8],
    ) -> RpcResult<Response> {
        conn.writer
            .write_all(payload)
            .and_then(|()| conn.writer.flush())
            .map_err(|e| self.io_error(method, &e))?;

        let response = {
            let mut de = serde_json::Deserializer::from_reader(&mut conn.reader);
            Response::deserialize(&mut de)
        }
        .map_err(|e| self.decode_error(method, &e))?;

        let expected = Value::from(id);
        if let Some(got) = response
            .id
            .as_ref()
            .filter(|got| !got.is_null() && **got != expected)
        {
            return Err(RpcError::MalformedResponse {
                message: format!("response id {got} does not match request id {id}"),
            });
        }
        Ok(response)
    }

    fn io_error(&self, method: &str, e: &io::Error) -> RpcError {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => RpcError::Timeout {
                method: method.to_string(),
                timeout_ms: self.timeout.map_or(0, |t| t.as_millis() as u64),
            },
            _ => RpcError::ConnectionLost {
                reason: e.to_string(),
            },
        }
    }

    fn decode_error(&self, method: &str, e: &serde_json::Error) -> RpcError {
        if let Some(kind) = e.io_error_kind() {
            return self.io_error(method, &io::Error::new(kind, e.to_string()));
        }
        if e.is_eof() {
            return RpcError::ConnectionLost {
                reason: "connection closed by server".to_string(),
            };
        }
        RpcError::MalformedResponse {
            message: e.to_string(),
        }
    }
}

impl RpcClient for JsonRpcClient {
    fn call(&self, method: &str, params: Option<ParamSet>) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            method,
            id,
            params: params.filter(|p| !p.is_empty()),
        };
        let payload = serde_json::to_vec(&request)?;

        tracing::debug!(method, id, "sending rpc request");

        let response = {
            let mut slot = self.conn.lock();
            let Some(conn) = slot.as_mut() else {
                return Err(RpcError::ConnectionLost {
                    reason: format!(
                        "connection to {} was dropped after an earlier failure",
                        self.address
                    ),
                });
            };
            match self.exchange(conn, method, id, &payload) {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(method, id, error = %e, "dropping rpc connection");
                    *slot = None;
                    return Err(e);
                }
            }
        };

        if let Some(err) = response.error {
            tracing::debug!(method, id, code = err.code, "rpc returned error");
            return Err(RpcError::Server {
                method: method.to_string(),
                code: err.code,
                message: err.message,
                data: err.data,
            });
        }

        response.result.ok_or_else(|| RpcError::MalformedResponse {
            message: "response carries neither result nor error".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_params() {
        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            method: "iaa_scan_accel_module",
            id: 7,
            params: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"jsonrpc": "2.0", "method": "iaa_scan_accel_module", "id": 7})
        );
    }

    #[test]
    fn test_request_carries_params() {
        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            method: "mlx5_scan_accel_module",
            id: 1,
            params: Some(ParamSet::new().with("enable_crypto", Some(true))),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["params"], json!({"enable_crypto": true}));
    }

    #[test]
    fn test_response_null_result_is_present() {
        let response: Response =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert_eq!(response.result, Some(Value::Null));
    }

    #[test]
    fn test_response_missing_result() {
        let response: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(response.result.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_connect_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            address: dir.path().join("missing.sock").display().to_string(),
            ..ClientConfig::default()
        };
        match JsonRpcClient::connect(&config) {
            Err(RpcError::ConnectionFailed { address, .. }) => {
                assert!(address.ends_with("missing.sock"));
            }
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("connect should fail"),
        }
    }
}
