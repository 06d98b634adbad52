//! Remote API access.
//!
//! Handlers never talk to the network directly; they go through the
//! [`ApiClient`] seam. The production implementation is
//! [`transport::XmlRpcApi`]; tests drive the same handlers with
//! [`FnApi`] closures.

pub mod transport;

use serde_json::Value;

use crate::error::RemoteError;

/// One synchronous remote call. `method` is the full dotted method name
/// (`hosting.vm.list`); `args` are the call arguments, the api key is
/// prepended by the transport.
pub trait ApiClient {
    fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError>;
}

/// Closure-backed [`ApiClient`], used to script responses in tests.
pub struct FnApi<F>(pub F);

impl<F> ApiClient for FnApi<F>
where
    F: Fn(&str, &[Value]) -> Result<Value, RemoteError>,
{
    fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
        (self.0)(method, &args)
    }
}
