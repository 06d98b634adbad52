//! Parsed representation of shell commands.
//!
//! Two shapes exist: type-level commands (`vm.list`) and instance-level
//! commands (`vm(3).delete`). Both carry the action keyword lowercased
//! and the raw parameter words in source order. [`Command`] implements
//! [`std::fmt::Display`] as the canonical rendition, so for any parsed
//! command `parse(cmd.to_string())` yields the command back.

use std::fmt;

// ===== OBJECT TYPES =====

/// The fixed set of remote object kinds the shell can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeName {
    Account,
    Datacenter,
    Disk,
    Iface,
    Image,
    Ip,
    Operation,
    Vm,
}

impl TypeName {
    /// Every kind, in grammar order.
    pub const ALL: [TypeName; 8] = [
        TypeName::Account,
        TypeName::Datacenter,
        TypeName::Disk,
        TypeName::Iface,
        TypeName::Image,
        TypeName::Ip,
        TypeName::Operation,
        TypeName::Vm,
    ];

    /// The keyword as it appears in commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Account => "account",
            TypeName::Datacenter => "datacenter",
            TypeName::Disk => "disk",
            TypeName::Iface => "iface",
            TypeName::Image => "image",
            TypeName::Ip => "ip",
            TypeName::Operation => "operation",
            TypeName::Vm => "vm",
        }
    }

    /// Human-facing name used when printing records.
    pub fn display_name(&self) -> &'static str {
        match self {
            TypeName::Account => "Account",
            TypeName::Datacenter => "Datacenter",
            TypeName::Disk => "Disk",
            TypeName::Iface => "Iface",
            TypeName::Image => "Image",
            TypeName::Ip => "Ip",
            TypeName::Operation => "Operation",
            TypeName::Vm => "VirtualMachine",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn from_keyword(word: &str) -> Option<TypeName> {
        TypeName::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== COMMANDS =====

/// A type-level command: `disk.count`, `vm.list(detached)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCommand {
    pub kind: TypeName,
    pub action: String,
    pub params: Vec<String>,
}

/// An instance-level command: `vm(3).delete`, `vm(1).disk_attach(12)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCommand {
    pub kind: TypeName,
    pub id: u64,
    pub action: String,
    pub params: Vec<String>,
}

/// One fully parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Class(ClassCommand),
    Instance(InstanceCommand),
}

impl Command {
    pub fn kind(&self) -> TypeName {
        match self {
            Command::Class(c) => c.kind,
            Command::Instance(c) => c.kind,
        }
    }

    pub fn action(&self) -> &str {
        match self {
            Command::Class(c) => &c.action,
            Command::Instance(c) => &c.action,
        }
    }

    pub fn params(&self) -> &[String] {
        match self {
            Command::Class(c) => &c.params,
            Command::Instance(c) => &c.params,
        }
    }

    /// Instance id, when the command addresses one object.
    pub fn id(&self) -> Option<u64> {
        match self {
            Command::Class(_) => None,
            Command::Instance(c) => Some(c.id),
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[String]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    write!(f, "({})", params.join(","))
}

impl fmt::Display for Command {
    /// Canonical form: lowercase keywords, no whitespace, `,`-joined
    /// parameters, parentheses omitted when the parameter list is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Class(c) => {
                write!(f, "{}.{}", c.kind, c.action)?;
                write_params(f, &c.params)
            }
            Command::Instance(c) => {
                write!(f, "{}({}).{}", c.kind, c.id, c.action)?;
                write_params(f, &c.params)
            }
        }
    }
}
