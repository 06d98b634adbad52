//! Action registry: the declarative table of everything the shell can do.
//!
//! Each object kind registers one [`TypeEntry`]: its listing function,
//! its type-level actions and its instance-level actions, each bound to
//! a handler. The parser's [`Catalog`] is derived from this table, so
//! the grammar and the dispatcher can never disagree about the
//! vocabulary.

use std::collections::BTreeMap;

use cmd_lang::{Catalog, TypeName};

use crate::api::ApiClient;
use crate::dispatch::Outcome;
use crate::error::{Fault, RemoteError};
use crate::prompt::Prompter;
use crate::record::{Listing, Record};
use crate::resources;

/// Mutable state that survives across commands.
#[derive(Debug, Clone)]
pub struct Session {
    /// Snapshot of the account, fetched at startup and on request.
    pub account: Record,
}

/// Everything a handler may touch.
pub struct Ctx<'a> {
    pub api: &'a dyn ApiClient,
    pub io: &'a mut dyn Prompter,
    pub session: &'a mut Session,
}

pub type ClassHandler = fn(&mut Ctx<'_>, &Args<'_>) -> Result<Outcome, Fault>;
pub type InstanceHandler = fn(&mut Ctx<'_>, &Record, &Args<'_>) -> Result<Outcome, Fault>;
pub type ListFn = fn(&dyn ApiClient) -> Result<Listing, RemoteError>;

/// The parameter words of one command, with arity helpers. Handlers
/// validate their own arity; the registry only records parameter names
/// for the help listing.
pub struct Args<'a> {
    action: &'a str,
    params: &'a [String],
}

impl<'a> Args<'a> {
    pub fn new(action: &'a str, params: &'a [String]) -> Args<'a> {
        Args { action, params }
    }

    pub fn none(&self) -> Result<(), Fault> {
        if self.params.is_empty() {
            Ok(())
        } else {
            Err(Fault::Argument(format!(
                "'{}' takes no parameter (got {})",
                self.action,
                self.params.len()
            )))
        }
    }

    pub fn one(&self, name: &str) -> Result<&'a str, Fault> {
        match self.params {
            [single] => Ok(single.as_str()),
            _ => Err(Fault::Argument(format!(
                "'{}' takes exactly one parameter <{name}> (got {})",
                self.action,
                self.params.len()
            ))),
        }
    }

    pub fn one_u64(&self, name: &str) -> Result<u64, Fault> {
        let raw = self.one(name)?;
        raw.parse().map_err(|_| {
            Fault::Argument(format!("<{name}> must be a number, got '{raw}'"))
        })
    }

    pub fn at_most_one(&self, name: &str) -> Result<Option<&'a str>, Fault> {
        match self.params {
            [] => Ok(None),
            [single] => Ok(Some(single.as_str())),
            _ => Err(Fault::Argument(format!(
                "'{}' takes at most one parameter <{name}> (got {})",
                self.action,
                self.params.len()
            ))),
        }
    }
}

// ===== ENTRIES =====

#[derive(Debug, Clone)]
pub struct ClassAction {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub help: &'static str,
    pub run: ClassHandler,
}

#[derive(Debug, Clone)]
pub struct InstanceAction {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub help: &'static str,
    pub run: InstanceHandler,
}

/// One kind's full command surface.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    kind: TypeName,
    lister: Option<ListFn>,
    class: Vec<ClassAction>,
    instance: Vec<InstanceAction>,
}

impl TypeEntry {
    pub fn new(kind: TypeName) -> TypeEntry {
        TypeEntry {
            kind,
            lister: None,
            class: Vec::new(),
            instance: Vec::new(),
        }
    }

    /// Listing call used to preload and refresh the instance cache.
    pub fn with_lister(mut self, lister: ListFn) -> TypeEntry {
        self.lister = Some(lister);
        self
    }

    pub fn class_action(
        mut self,
        name: &'static str,
        params: &'static [&'static str],
        help: &'static str,
        run: ClassHandler,
    ) -> TypeEntry {
        self.class.push(ClassAction {
            name,
            params,
            help,
            run,
        });
        self
    }

    pub fn instance_action(
        mut self,
        name: &'static str,
        params: &'static [&'static str],
        help: &'static str,
        run: InstanceHandler,
    ) -> TypeEntry {
        self.instance.push(InstanceAction {
            name,
            params,
            help,
            run,
        });
        self
    }

    pub fn kind(&self) -> TypeName {
        self.kind
    }

    pub fn lister(&self) -> Option<ListFn> {
        self.lister
    }

    pub fn class_actions(&self) -> &[ClassAction] {
        &self.class
    }

    pub fn instance_actions(&self) -> &[InstanceAction] {
        &self.instance
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassAction> {
        self.class.iter().find(|action| action.name == name)
    }

    pub fn find_instance(&self, name: &str) -> Option<&InstanceAction> {
        self.instance.iter().find(|action| action.name == name)
    }
}

// ===== REGISTRY =====

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<TypeName, TypeEntry>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register(&mut self, entry: TypeEntry) {
        self.entries.insert(entry.kind, entry);
    }

    /// The full shell surface: all eight kinds.
    pub fn standard() -> Registry {
        let mut registry = Registry::new();
        registry.register(resources::account::entry());
        registry.register(resources::datacenter::entry());
        registry.register(resources::disk::entry());
        registry.register(resources::iface::entry());
        registry.register(resources::image::entry());
        registry.register(resources::ip::entry());
        registry.register(resources::operation::entry());
        registry.register(resources::vm::entry());
        registry
    }

    pub fn entry(&self, kind: TypeName) -> Option<&TypeEntry> {
        self.entries.get(&kind)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    /// The vocabulary the parser checks commands against.
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::new();
        for entry in self.entries.values() {
            let class: Vec<&str> = entry.class.iter().map(|action| action.name).collect();
            let instance: Vec<&str> = entry.instance.iter().map(|action| action.name).collect();
            catalog.define(entry.kind, &class, &instance);
        }
        catalog
    }
}
