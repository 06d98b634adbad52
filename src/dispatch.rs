//! Command execution: registry lookup, the instance cache, and the
//! refresh-after-mutation rule.
//!
//! The dispatcher owns the [`InstanceCache`]. Instance commands resolve
//! their target in the cache, never remotely; a miss is an
//! [`Fault::UnknownInstance`] before anything touches the network. After
//! an instance action that is not read-only succeeds, the kind's listing
//! is re-fetched so subsequent commands see the post-mutation world.

use std::collections::BTreeMap;

use cmd_lang::{Command, TypeName};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::{Fault, RemoteError};
use crate::record::{Listing, Record};
use crate::registry::{Args, Ctx, ListFn, Registry};

/// Actions that never change remote state and therefore never trigger
/// a cache refresh.
pub const READ_ONLY_ACTIONS: [&str; 3] = ["count", "info", "list"];

pub fn is_read_only(action: &str) -> bool {
    READ_ONLY_ACTIONS.contains(&action)
}

/// What a successful command hands the printer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Record(Record),
    Listing(Listing),
    Message(String),
    /// Interactive flows that already said everything they had to.
    Done,
}

// ===== INSTANCE CACHE =====

/// Last known listing of every kind, keyed by instance id.
#[derive(Debug, Clone, Default)]
pub struct InstanceCache {
    listings: BTreeMap<TypeName, Listing>,
}

impl InstanceCache {
    pub fn get(&self, kind: TypeName, id: u64) -> Option<&Record> {
        self.listings.get(&kind).and_then(|listing| listing.get(&id))
    }

    pub fn listing(&self, kind: TypeName) -> Option<&Listing> {
        self.listings.get(&kind)
    }

    pub fn replace(&mut self, kind: TypeName, listing: Listing) {
        self.listings.insert(kind, listing);
    }

    pub fn ids(&self, kind: TypeName) -> Vec<u64> {
        self.listings
            .get(&kind)
            .map_or_else(Vec::new, |listing| listing.keys().copied().collect())
    }

    /// Snapshot of all known ids, the completer's view.
    pub fn id_view(&self) -> BTreeMap<TypeName, Vec<u64>> {
        self.listings
            .iter()
            .map(|(kind, listing)| (*kind, listing.keys().copied().collect()))
            .collect()
    }
}

// ===== DISPATCHER =====

pub struct Dispatcher {
    registry: Registry,
    cache: InstanceCache,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Dispatcher {
        Dispatcher {
            registry,
            cache: InstanceCache::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Fetches the initial listing of every kind that has both a lister
    /// and instance actions, in kind order. One kind failing to list
    /// does not stop the others; the report says what happened to each.
    pub fn preload(&mut self, api: &dyn ApiClient) -> Vec<(TypeName, Result<(), RemoteError>)> {
        let listers: Vec<(TypeName, ListFn)> = self
            .registry
            .entries()
            .filter(|entry| !entry.instance_actions().is_empty())
            .filter_map(|entry| entry.lister().map(|lister| (entry.kind(), lister)))
            .collect();
        listers
            .into_iter()
            .map(|(kind, lister)| {
                let result = lister(api).map(|listing| self.cache.replace(kind, listing));
                (kind, result)
            })
            .collect()
    }

    /// Runs one parsed command to completion.
    pub fn execute(&mut self, ctx: &mut Ctx<'_>, command: &Command) -> Result<Outcome, Fault> {
        let kind = command.kind();
        let entry = self
            .registry
            .entry(kind)
            .ok_or_else(|| Fault::Argument(format!("no handlers for type '{kind}'")))?;
        match command {
            Command::Class(class) => {
                let action = entry.find_class(&class.action).ok_or_else(|| {
                    Fault::Argument(format!("'{}' is not a type action of '{kind}'", class.action))
                })?;
                debug!(kind = %kind, action = %class.action, "class action");
                let args = Args::new(&class.action, &class.params);
                (action.run)(ctx, &args)
            }
            Command::Instance(inst) => {
                let record = self
                    .cache
                    .get(kind, inst.id)
                    .cloned()
                    .ok_or(Fault::UnknownInstance { kind, id: inst.id })?;
                let action = entry.find_instance(&inst.action).ok_or_else(|| {
                    Fault::Argument(format!(
                        "'{}' is not an instance action of '{kind}'",
                        inst.action
                    ))
                })?;
                debug!(kind = %kind, action = %inst.action, id = inst.id, "instance action");
                let args = Args::new(&inst.action, &inst.params);
                let outcome = (action.run)(ctx, &record, &args)?;
                if !is_read_only(&inst.action) {
                    self.refresh(ctx.api, kind);
                }
                Ok(outcome)
            }
        }
    }

    /// Re-fetches one kind's listing after a mutation. A refresh failure
    /// keeps the stale listing; the action itself already succeeded.
    fn refresh(&mut self, api: &dyn ApiClient, kind: TypeName) {
        let Some(lister) = self.registry.entry(kind).and_then(|entry| entry.lister()) else {
            return;
        };
        debug!("refreshing {kind}");
        match lister(api) {
            Ok(listing) => self.cache.replace(kind, listing),
            Err(err) => warn!("could not refresh {kind} listing: {err}"),
        }
    }
}
