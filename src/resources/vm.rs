//! Virtual machines: lifecycle, disk attachment, ssh access and the
//! interactive creation flow.

use std::process::Command as SshCommand;

use cmd_lang::TypeName;
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::output;
use crate::record::{Listing, Record};
use crate::registry::{Args, Ctx, TypeEntry};
use crate::resources::{
    count_handler, datacenter, fetch_info, fetch_listing, image, info_handler, list_handler,
    method, operation_handler, record_id,
};

pub fn entry() -> TypeEntry {
    TypeEntry::new(TypeName::Vm)
        .with_lister(list)
        .class_action("count", &[], "number of virtual machines", count)
        .class_action("list", &[], "list every virtual machine", list_cmd)
        .class_action("create", &[], "create a machine, interactively", create)
        .instance_action("connect", &[], "open an ssh session on this machine", connect)
        .instance_action("delete", &[], "destroy this machine", delete)
        .instance_action("info", &[], "fresh details about this machine", info)
        .instance_action("start", &[], "boot this machine", start)
        .instance_action("stop", &[], "shut this machine down", stop)
        .instance_action("reboot", &[], "restart this machine", reboot)
        .instance_action("disk_attach", &["disk_id"], "attach a disk to this machine", disk_attach)
        .instance_action("disk_detach", &["disk_id"], "detach a disk from this machine", disk_detach)
}

pub fn list(api: &dyn ApiClient) -> Result<Listing, RemoteError> {
    fetch_listing(api, TypeName::Vm)
}

// ===== CLASS ACTIONS =====

fn count(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    count_handler(ctx, TypeName::Vm, args)
}

fn list_cmd(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    list_handler(ctx, TypeName::Vm, args)
}

/// `create_from` wire payload, machine half.
#[derive(Debug, Serialize)]
struct VmSpec {
    datacenter_id: i64,
    hostname: String,
    memory: i64,
    cores: i64,
    bandwidth: i64,
    ip_version: i64,
    password: String,
}

/// `create_from` wire payload, system disk half.
#[derive(Debug, Serialize)]
struct DiskSpec {
    datacenter_id: i64,
    name: String,
}

/// Asks for the whole machine configuration, picks a base image, then
/// fires one `create_from` call. The server answers with the tracking
/// operation.
fn create(ctx: &mut Ctx<'_>, args: &Args<'_>) -> Result<Outcome, Fault> {
    args.none()?;
    for record in datacenter::list(ctx.api)?.values() {
        ctx.io.show(&record.to_string());
    }
    let datacenter_id = ctx.io.ask_int("datacenter id", 1)?;
    let disk_name = ctx.io.ask_string("system disk name")?;
    let hostname = ctx.io.ask_string("hostname")?;
    let memory = ctx.io.ask_int_where(
        "memory",
        256,
        &|m| m >= 256 && m % 64 == 0,
        "at least 256 and a multiple of 64",
    )?;
    let cores = ctx.io.ask_int("core number", 1)?;
    let bandwidth = ctx.io.ask_int("bandwidth", 10240)?;
    let ip_version = ctx.io.ask_int_where("ip version", 4, &|v| v == 4 || v == 6, "4 or 6")?;
    let mut password = ctx.io.ask_secret("a password (not echoed)")?;
    while password.chars().count() < 8 {
        password = ctx.io.ask_secret("a password of at least 8 characters")?;
    }
    let src_disk_id = image::pick_base_image(ctx, datacenter_id)?;

    let vm_spec = VmSpec {
        datacenter_id,
        hostname,
        memory,
        cores,
        bandwidth,
        ip_version,
        password,
    };
    let disk_spec = DiskSpec {
        datacenter_id,
        name: disk_name,
    };
    let value = ctx.api.call(
        &method(TypeName::Vm, "create_from"),
        vec![
            serde_json::to_value(&vm_spec)?,
            serde_json::to_value(&disk_spec)?,
            Value::from(src_disk_id),
        ],
    )?;
    Ok(Outcome::Record(Record::from_value(TypeName::Operation, value)?))
}

// ===== INSTANCE ACTIONS =====

fn info(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    info_handler(ctx, TypeName::Vm, record, args)
}

fn delete(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    operation_handler(ctx, TypeName::Vm, record, args, "delete", "Deleting")
}

fn start(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    operation_handler(ctx, TypeName::Vm, record, args, "start", "Starting")
}

fn stop(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    operation_handler(ctx, TypeName::Vm, record, args, "stop", "Stopping")
}

fn reboot(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    operation_handler(ctx, TypeName::Vm, record, args, "reboot", "Rebooting")
}

fn disk_attach(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    let disk_id = args.one_u64("disk_id")?;
    move_disk(ctx, record, disk_id, "disk_attach")
}

fn disk_detach(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    let disk_id = args.one_u64("disk_id")?;
    move_disk(ctx, record, disk_id, "disk_detach")
}

/// Shared attach/detach body: verify the disk exists first, then fire
/// the operation with the id the server itself reported.
fn move_disk(
    ctx: &mut Ctx<'_>,
    record: &Record,
    disk_id: u64,
    verb: &'static str,
) -> Result<Outcome, Fault> {
    let vm_id = record_id(record)?;
    let disk = fetch_info(ctx.api, TypeName::Disk, disk_id)?;
    output::info(&format!("Disk({disk_id}) found"));
    let target = record_id(&disk)?;
    let value = ctx.api.call(
        &method(TypeName::Vm, verb),
        vec![Value::from(vm_id), Value::from(target)],
    )?;
    Ok(Outcome::Record(Record::from_value(TypeName::Operation, value)?))
}

/// Fetches fresh machine details, picks one of its addresses and execs
/// `ssh login@address`, blocking until the session ends.
fn connect(ctx: &mut Ctx<'_>, record: &Record, args: &Args<'_>) -> Result<Outcome, Fault> {
    args.none()?;
    let id = record_id(record)?;
    output::info("Starting SSH session...");
    let fresh = fetch_info(ctx.api, TypeName::Vm, id)?;
    let ips = collect_ips(&fresh);
    let addr = match ips.as_slice() {
        [] => {
            output::error("No IP address on this machine");
            return Ok(Outcome::Done);
        }
        [single] => single.clone(),
        many => {
            ctx.io.show(&format!("We have {} possible IPs:", many.len()));
            for (index, addr) in many.iter().enumerate() {
                ctx.io.show(&format!("#{index} : {addr}"));
            }
            let top = many.len() as i64 - 1;
            let pick = ctx.io.ask_int_where(
                "an ip index",
                0,
                &|i| (0..=top).contains(&i),
                &format!("between 0 and {top}"),
            )?;
            many[pick as usize].clone()
        }
    };
    let login = ctx.io.ask_string("login")?;
    output::info(&format!("Running 'ssh {login}@{addr}'"));
    let status = SshCommand::new("ssh")
        .arg(format!("{login}@{addr}"))
        .status()
        .map_err(|err| RemoteError::Transport(format!("could not run ssh: {err}")))?;
    if !status.success() {
        output::warn(&format!("ssh exited with {status}"));
    }
    Ok(Outcome::Done)
}

/// Every address of every interface, in listing order.
fn collect_ips(vm: &Record) -> Vec<String> {
    let mut addrs = Vec::new();
    let Some(ifaces) = vm.get("ifaces").and_then(Value::as_array) else {
        return addrs;
    };
    for iface in ifaces {
        let Some(ips) = iface.get("ips").and_then(Value::as_array) else {
            continue;
        };
        for ip in ips {
            if let Some(addr) = ip.get("ip").and_then(Value::as_str) {
                addrs.push(addr.to_string());
            }
        }
    }
    addrs
}
