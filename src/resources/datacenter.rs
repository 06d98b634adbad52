//! Datacenters: list-only, no instances to address.

use cmd_lang::TypeName;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::record::Listing;
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::{fetch_listing, list_handler};

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Datacenter).class_action(
        "list",
        &[],
        "list the available datacenters",
        list_cmd,
    )
}

/// Raw listing, also used by the vm creation flow.
pub fn list(api: &dyn ApiClient) -> Result<Listing, RemoteError> {
    fetch_listing(api, TypeName::Datacenter)
}

fn list_cmd(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    list_handler(ctx, TypeName::Datacenter, args)
}
