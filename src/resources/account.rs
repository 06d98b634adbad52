//! The account: a singleton snapshot, not a cached listing.
//!
//! Fetched once at startup for the welcome banner, then served from the
//! session. `account.info(refresh)` re-fetches on demand.

use cmd_lang::TypeName;
use tracing::debug;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::record::Record;
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::method;

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Account).class_action(
        "info",
        &["refresh"],
        "show account data, optionally re-fetched",
        info,
    )
}

/// Fresh account data from the remote end.
pub fn fetch(api: &dyn ApiClient) -> Result<Record, RemoteError> {
    let value = api.call(&method(TypeName::Account, "info"), vec![])?;
    Record::from_value(TypeName::Account, value)
}

fn info(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    match args.at_most_one("refresh")? {
        None => {}
        Some("refresh") => {
            debug!("refreshing account info");
            ctx.session.account = fetch(ctx.api)?;
        }
        Some(other) => {
            return Err(Fault::Argument(format!(
                "'info' accepts only the parameter 'refresh', got '{other}'"
            )))
        }
    }
    Ok(Outcome::Record(ctx.session.account.clone()))
}
