//! Runtime settings.

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://rpc.gandi.net/xmlrpc/";

/// Everything the transport needs to reach the remote API.
#[derive(Debug, Clone)]
pub struct Settings {
    /// XML-RPC endpoint URL.
    pub endpoint: String,
    /// Api key sent as the first argument of every remote call.
    pub apikey: String,
}
