//! hostshell - Interactive shell for a hosting account
//!
//! This crate drives a hosting platform's XML-RPC API from a line
//! editor. Commands address remote objects by type and id in a compact
//! dotted form:
//!
//! `vm.list`, `vm(3).delete`, `vm(1).disk_attach(12)`, `account.info(refresh)`
//!
//! The grammar and its diagnostics live in the `cmd-lang` crate; this
//! crate supplies the vocabulary, the transport, the instance caches
//! and the interactive flows on top of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hostshell::api::transport::XmlRpcApi;
//! use hostshell::config::Settings;
//! use hostshell::registry::Registry;
//! use hostshell::shell::Shell;
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings {
//!     endpoint: "https://rpc.example.net/xmlrpc/".into(),
//!     apikey: "here-be-the-key".into(),
//! };
//! let api = XmlRpcApi::new(&settings);
//! let mut shell = Shell::new(&api, Registry::standard())?;
//! shell.run()?;
//! # Ok(())
//! # }
//! ```

// Transport and its trait seam
pub mod api;

// Runtime settings
pub mod config;

// Core error types
pub mod error;

// Remote objects as displayable records
pub mod record;

// Vocabulary table, execution and the instance caches
pub mod dispatch;
pub mod registry;

// Per-kind command surfaces
pub mod resources;

// Interactive machinery
pub mod output;
pub mod prompt;
pub mod select;
pub mod shell;

// Public re-exports for the common path
pub use api::ApiClient;
pub use config::{Settings, DEFAULT_ENDPOINT};
pub use dispatch::{Dispatcher, Outcome};
pub use error::{Fault, RemoteError};
pub use record::{Listing, Record};
pub use registry::Registry;
pub use shell::Shell;
