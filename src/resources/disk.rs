//! Disks: countable, listable, and individually deletable.

use cmd_lang::TypeName;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::record::{Listing, Record};
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::{count_handler, fetch_listing, info_handler, list_handler, operation_handler};

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Disk)
        .with_lister(list)
        .class_action("count", &[], "number of existing disks", count)
        .class_action("list", &[], "list every disk", list_cmd)
        .instance_action("delete", &[], "destroy this disk", delete)
        .instance_action("info", &[], "fresh details about this disk", info)
}

pub fn list(api: &dyn ApiClient) -> Result<Listing, RemoteError> {
    fetch_listing(api, TypeName::Disk)
}

fn count(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    count_handler(ctx, TypeName::Disk, args)
}

fn list_cmd(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    list_handler(ctx, TypeName::Disk, args)
}

fn delete(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    operation_handler(ctx, TypeName::Disk, record, args, "delete", "Deleting")
}

fn info(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    info_handler(ctx, TypeName::Disk, record, args)
}
