//! Tab completion over the command grammar.
//!
//! Completion is position aware: at the start of a line it offers the
//! type keywords, after `kind.` the kind's class actions, after
//! `kind(id).` its instance actions, and inside `kind(` the instance
//! ids currently cached for that kind.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use cmd_lang::{Catalog, TypeName};
use colored::Colorize;
use regex::Regex;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Line text just before the word under the cursor, for `kind(id).`.
fn instance_dot() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*\(\s*\d+\s*\)\s*\.\s*$").unwrap())
}

/// Same, for `kind.`.
fn class_dot() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*\.\s*$").unwrap())
}

/// Same, for `kind(` with the id still being typed.
fn open_paren() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*\(\s*$").unwrap())
}

pub struct ShellHelper {
    catalog: Catalog,
    ids: BTreeMap<TypeName, Vec<u64>>,
}

impl ShellHelper {
    pub fn new(catalog: Catalog) -> ShellHelper {
        ShellHelper {
            catalog,
            ids: BTreeMap::new(),
        }
    }

    /// Replaces the id candidates after the cache changed.
    pub fn set_ids(&mut self, ids: BTreeMap<TypeName, Vec<u64>>) {
        self.ids = ids;
    }

    /// Completion position and candidates for `line` with the cursor at
    /// byte `pos`.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let start = line[..pos]
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
            .last()
            .map_or(pos, |(index, _)| index);
        let word = &line[start..pos];
        let before = &line[..start];

        if let Some(kind) = captured_kind(instance_dot(), before) {
            let names = self.catalog.instance_actions(kind).iter().map(String::as_str);
            return (start, matching(names, word));
        }
        if let Some(kind) = captured_kind(class_dot(), before) {
            let names = self.catalog.class_actions(kind).iter().map(String::as_str);
            return (start, matching(names, word));
        }
        if let Some(kind) = captured_kind(open_paren(), before) {
            return (start, self.matching_ids(kind, word));
        }
        if before.trim().is_empty() {
            let names = self
                .catalog
                .kinds()
                .map(|kind| kind.as_str())
                .chain(std::iter::once("help"));
            return (start, matching(names, word));
        }
        (start, Vec::new())
    }

    /// Cached ids of `kind` starting with `prefix`, closing the paren in
    /// the replacement.
    fn matching_ids(&self, kind: TypeName, prefix: &str) -> Vec<Pair> {
        let Some(ids) = self.ids.get(&kind) else {
            return Vec::new();
        };
        ids.iter()
            .map(u64::to_string)
            .filter(|id| id.starts_with(prefix))
            .map(|id| Pair {
                display: id.clone(),
                replacement: format!("{id})"),
            })
            .collect()
    }
}

fn captured_kind(re: &Regex, before: &str) -> Option<TypeName> {
    let caps = re.captures(before)?;
    TypeName::from_keyword(&caps[1])
}

/// Names starting with `prefix`, case-insensitively. Vocabulary names
/// are stored lowercase, so lowercasing the prefix is enough.
fn matching<'a>(names: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
    let prefix = prefix.to_ascii_lowercase();
    names
        .filter(|name| name.starts_with(&prefix))
        .map(|name| Pair {
            display: name.to_string(),
            replacement: name.to_string(),
        })
        .collect()
}

impl Helper for ShellHelper {}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(prompt.bold().to_string())
        } else {
            Cow::Borrowed(prompt)
        }
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Validator for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> ShellHelper {
        let mut catalog = Catalog::new();
        catalog.define(TypeName::Disk, &["count", "list"], &["delete", "info"]);
        catalog.define(
            TypeName::Vm,
            &["count", "list", "create"],
            &["connect", "delete", "info", "start", "stop", "reboot"],
        );
        let mut helper = ShellHelper::new(catalog);
        helper.set_ids(BTreeMap::from([
            (TypeName::Vm, vec![3, 17]),
            (TypeName::Disk, vec![12]),
        ]));
        helper
    }

    fn displays(pairs: &[Pair]) -> Vec<&str> {
        pairs.iter().map(|pair| pair.display.as_str()).collect()
    }

    #[test]
    fn test_line_start_offers_keywords_and_help() {
        let (start, pairs) = helper().candidates("", 0);
        assert_eq!(start, 0);
        assert_eq!(displays(&pairs), ["disk", "vm", "help"]);

        let (start, pairs) = helper().candidates("v", 1);
        assert_eq!(start, 0);
        assert_eq!(displays(&pairs), ["vm"]);
    }

    #[test]
    fn test_after_dot_offers_class_actions() {
        let (start, pairs) = helper().candidates("vm.", 3);
        assert_eq!(start, 3);
        assert_eq!(displays(&pairs), ["count", "list", "create"]);

        let (start, pairs) = helper().candidates("vm.c", 4);
        assert_eq!(start, 3);
        assert_eq!(displays(&pairs), ["count", "create"]);
    }

    #[test]
    fn test_after_instance_dot_offers_instance_actions() {
        let line = "vm(3).st";
        let (start, pairs) = helper().candidates(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(displays(&pairs), ["start", "stop"]);
    }

    #[test]
    fn test_open_paren_offers_cached_ids_with_closing_paren() {
        let (start, pairs) = helper().candidates("vm(", 3);
        assert_eq!(start, 3);
        assert_eq!(displays(&pairs), ["3", "17"]);
        assert_eq!(pairs[0].replacement, "3)");

        let (_, pairs) = helper().candidates("vm(1", 4);
        assert_eq!(displays(&pairs), ["17"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let line = "VM(3).ST";
        let (start, pairs) = helper().candidates(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(displays(&pairs), ["start", "stop"]);
    }

    #[test]
    fn test_unknown_positions_offer_nothing() {
        // Params are free words.
        let line = "vm(1).disk_attach(1";
        let (_, pairs) = helper().candidates(line, line.len());
        assert!(pairs.is_empty());

        // Unknown kind.
        let (_, pairs) = helper().candidates("widget.", 7);
        assert!(pairs.is_empty());

        // Mid-command whitespace before a bare word.
        let line = "vm.list extra";
        let (_, pairs) = helper().candidates(line, line.len());
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_ids_refresh_replaces_candidates() {
        let mut helper = helper();
        helper.set_ids(BTreeMap::from([(TypeName::Vm, vec![99])]));
        let (_, pairs) = helper.candidates("vm(", 3);
        assert_eq!(displays(&pairs), ["99"]);
        let (_, pairs) = helper.candidates("disk(", 5);
        assert!(pairs.is_empty());
    }
}
