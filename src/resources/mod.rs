//! Per-kind command surfaces over the remote API.
//!
//! Each module owns one object kind: its registry entry, its listing
//! wrapper, and its action handlers. The shared handler bodies live
//! here; the kind modules mostly declare vocabulary and delegate.
//!
//! Method naming quirk, faithful to the endpoint: every kind is rooted
//! under `hosting.` except operations, which live at `operation.`.

pub mod account;
pub mod datacenter;
pub mod disk;
pub mod iface;
pub mod image;
pub mod ip;
pub mod operation;
pub mod vm;

use cmd_lang::TypeName;
use serde_json::Value;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::output;
use crate::record::{listing_from_value, Listing, Record};
use crate::registry::{Args, Ctx};

/// Full dotted method name for one operation on one kind.
pub(crate) fn method(kind: TypeName, op: &str) -> String {
    match kind {
        TypeName::Operation => format!("operation.{op}"),
        other => format!("hosting.{other}.{op}"),
    }
}

/// Counts come back as a bare integer.
pub(crate) fn count_value(value: &Value) -> Result<i64, RemoteError> {
    value
        .as_i64()
        .ok_or_else(|| RemoteError::Protocol(format!("count is not an integer: {value}")))
}

/// Cached records always carry their id; losing it is a wire defect.
pub(crate) fn record_id(record: &Record) -> Result<u64, Fault> {
    record.id().ok_or_else(|| {
        Fault::Remote(RemoteError::Protocol(format!(
            "{} record has no id",
            record.kind()
        )))
    })
}

pub(crate) fn fetch_listing(api: &dyn ApiClient, kind: TypeName) -> Result<Listing, RemoteError> {
    let value = api.call(&method(kind, "list"), vec![])?;
    listing_from_value(kind, value)
}

pub(crate) fn fetch_info(api: &dyn ApiClient, kind: TypeName, id: u64) -> Result<Record, Fault> {
    let value = api.call(&method(kind, "info"), vec![Value::from(id)])?;
    Ok(Record::from_value(kind, value)?)
}

// ===== SHARED HANDLER BODIES =====

pub(crate) fn count_handler(ctx: &mut Ctx<'_>, kind: TypeName, args: &Args<'_>) -> Result<Outcome, Fault> {
    args.none()?;
    output::info(&format!("Counting {}", kind.display_name()));
    let value = ctx.api.call(&method(kind, "count"), vec![])?;
    Ok(Outcome::Message(format!(
        "{} count: {}",
        kind.display_name(),
        count_value(&value)?
    )))
}

pub(crate) fn list_handler(ctx: &mut Ctx<'_>, kind: TypeName, args: &Args<'_>) -> Result<Outcome, Fault> {
    args.none()?;
    Ok(Outcome::Listing(fetch_listing(ctx.api, kind)?))
}

pub(crate) fn info_handler(
    ctx: &mut Ctx<'_>,
    kind: TypeName,
    record: &Record,
    args: &Args<'_>,
) -> Result<Outcome, Fault> {
    args.none()?;
    let id = record_id(record)?;
    output::info(&format!("Info about {} {id}", kind.display_name()));
    Ok(Outcome::Record(fetch_info(ctx.api, kind, id)?))
}

/// Body of the fire-an-operation actions (delete, start, stop, reboot).
/// The server acknowledges with an operation struct.
pub(crate) fn operation_handler(
    ctx: &mut Ctx<'_>,
    kind: TypeName,
    record: &Record,
    args: &Args<'_>,
    verb: &'static str,
    doing: &'static str,
) -> Result<Outcome, Fault> {
    args.none()?;
    let id = record_id(record)?;
    output::info(&format!("{doing} {} {id}", kind.display_name()));
    let value = ctx.api.call(&method(kind, verb), vec![Value::from(id)])?;
    Ok(Outcome::Record(Record::from_value(TypeName::Operation, value)?))
}
