//! Network interfaces: read-only from the shell.

use cmd_lang::TypeName;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::record::{Listing, Record};
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::{count_handler, fetch_listing, info_handler, list_handler};

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Iface)
        .with_lister(list)
        .class_action("count", &[], "number of network interfaces", count)
        .class_action("list", &[], "list every network interface", list_cmd)
        .instance_action("info", &[], "fresh details about this interface", info)
}

pub fn list(api: &dyn ApiClient) -> Result<Listing, RemoteError> {
    fetch_listing(api, TypeName::Iface)
}

fn count(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    count_handler(ctx, TypeName::Iface, args)
}

fn list_cmd(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    list_handler(ctx, TypeName::Iface, args)
}

fn info(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    info_handler(ctx, TypeName::Iface, record, args)
}
