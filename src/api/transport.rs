//! XML-RPC transport.
//!
//! Wraps the `xmlrpc` crate behind [`ApiClient`] and bridges between
//! wire values and the `serde_json` values the rest of the shell works
//! in. The api key is injected as the first argument of every call, the
//! way the remote endpoint expects it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use tracing::debug;
use xmlrpc::{Request, Value as Wire};

use crate::api::ApiClient;
use crate::config::Settings;
use crate::error::RemoteError;

pub struct XmlRpcApi {
    endpoint: String,
    apikey: String,
}

impl XmlRpcApi {
    pub fn new(settings: &Settings) -> XmlRpcApi {
        XmlRpcApi {
            endpoint: settings.endpoint.clone(),
            apikey: settings.apikey.clone(),
        }
    }
}

impl ApiClient for XmlRpcApi {
    fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
        debug!(method, "remote call");
        let mut request = Request::new(method).arg(self.apikey.clone());
        for arg in &args {
            request = request.arg(to_wire(arg));
        }
        let value = request.call_url(&self.endpoint).map_err(classify)?;
        Ok(from_wire(value))
    }
}

fn classify(err: xmlrpc::Error) -> RemoteError {
    match err.fault() {
        Some(fault) => RemoteError::Fault {
            code: fault.fault_code,
            message: fault.fault_string.clone(),
        },
        None => RemoteError::Transport(err.to_string()),
    }
}

// ===== VALUE BRIDGE =====

fn to_wire(value: &Value) -> Wire {
    match value {
        Value::Null => Wire::Nil,
        Value::Bool(flag) => Wire::Bool(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                match i32::try_from(int) {
                    Ok(small) => Wire::Int(small),
                    Err(_) => Wire::Int64(int),
                }
            } else {
                Wire::Double(number.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(text) => Wire::String(text.clone()),
        Value::Array(items) => Wire::Array(items.iter().map(to_wire).collect()),
        Value::Object(map) => Wire::Struct(
            map.iter()
                .map(|(key, item)| (key.clone(), to_wire(item)))
                .collect(),
        ),
    }
}

fn from_wire(value: Wire) -> Value {
    match value {
        Wire::Int(int) => Value::from(int),
        Wire::Int64(int) => Value::from(int),
        Wire::Bool(flag) => Value::from(flag),
        Wire::String(text) => Value::from(text),
        Wire::Double(real) => Value::from(real),
        // Timestamps and blobs become strings; records only display them.
        Wire::DateTime(stamp) => Value::from(stamp.to_string()),
        Wire::Base64(bytes) => Value::from(BASE64.encode(bytes)),
        Wire::Struct(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, from_wire(item)))
                .collect(),
        ),
        Wire::Array(items) => Value::Array(items.into_iter().map(from_wire).collect()),
        Wire::Nil => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_wire_picks_int_width() {
        assert_eq!(to_wire(&json!(42)), Wire::Int(42));
        assert_eq!(to_wire(&json!(-7)), Wire::Int(-7));
        assert_eq!(to_wire(&json!(5_000_000_000_i64)), Wire::Int64(5_000_000_000));
        assert_eq!(to_wire(&json!(2.5)), Wire::Double(2.5));
    }

    #[test]
    fn test_to_wire_nested_struct() {
        let wire = to_wire(&json!({"name": "sys", "sizes": [1, 2], "extra": null}));
        let Wire::Struct(map) = wire else {
            panic!("expected a struct");
        };
        assert_eq!(map["name"], Wire::String("sys".into()));
        assert_eq!(map["sizes"], Wire::Array(vec![Wire::Int(1), Wire::Int(2)]));
        assert_eq!(map["extra"], Wire::Nil);
    }

    #[test]
    fn test_from_wire_scalars() {
        assert_eq!(from_wire(Wire::Int(3)), json!(3));
        assert_eq!(from_wire(Wire::Int64(5_000_000_000)), json!(5_000_000_000_i64));
        assert_eq!(from_wire(Wire::Bool(true)), json!(true));
        assert_eq!(from_wire(Wire::String("x".into())), json!("x"));
        assert_eq!(from_wire(Wire::Nil), Value::Null);
    }

    #[test]
    fn test_from_wire_base64_is_encoded_text() {
        assert_eq!(from_wire(Wire::Base64(b"ok".to_vec())), json!("b2s="));
    }

    #[test]
    fn test_wire_round_trip_for_plain_data() {
        let original = json!({
            "id": 3,
            "hostname": "web1",
            "ifaces": [{"ips": [{"ip": "10.0.0.1"}]}],
            "running": true,
        });
        assert_eq!(from_wire(to_wire(&original)), original);
    }
}
