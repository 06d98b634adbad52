//! Disk images, plus the narrowing flow that picks a base image for a
//! new virtual machine.

use cmd_lang::TypeName;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::record::{Listing, Record};
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::{fetch_listing, info_handler, list_handler};
use crate::select;

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Image)
        .with_lister(list)
        .class_action("list", &[], "list the available disk images", list_cmd)
        .instance_action("info", &[], "fresh details about this image", info)
}

pub fn list(api: &dyn ApiClient) -> Result<Listing, RemoteError> {
    fetch_listing(api, TypeName::Image)
}

fn list_cmd(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    list_handler(ctx, TypeName::Image, args)
}

fn info(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    info_handler(ctx, TypeName::Image, record, args)
}

/// Lets the operator choose a base image available in `datacenter_id`
/// and returns the underlying disk id to clone from.
pub fn pick_base_image(ctx: &mut Ctx<'_>, datacenter_id: i64) -> Result<u64, Fault> {
    let all = list(ctx.api)?;
    let candidates: Listing = all
        .into_iter()
        .filter(|(_, image)| image.get_i64("datacenter_id") == Some(datacenter_id))
        .collect();
    let image = select::narrow(
        ctx.io,
        candidates,
        "label",
        &format!("disk images in datacenter {datacenter_id}"),
    )?;
    ctx.io.show("Image selected:");
    ctx.io.show(&image.to_string());
    image.get_u64("disk_id").ok_or_else(|| {
        Fault::Remote(RemoteError::Protocol("image record has no disk_id".into()))
    })
}
