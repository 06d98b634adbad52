//! Recursive-descent parser for the command grammar.
//!
//! ```text
//! command  ::= TYPE ws '.' ws ACTION params? ws EOF
//!            | TYPE ws '(' ws ID ws ')' ws '.' ws ACTION params? ws EOF
//! params   ::= ws '(' ws ')' | ws '(' ws WORD (ws ',' ws WORD)* ws ')'
//! TYPE     ::= keyword registered in the catalog (case-insensitive)
//! ACTION   ::= keyword legal for TYPE at that level (case-insensitive)
//! ID       ::= decimal digits, non-negative
//! WORD     ::= [A-Za-z0-9_]+
//! ```
//!
//! The two command shapes share the `TYPE` prefix; the first character
//! after it commits to one of them, so no backtracking is needed beyond
//! that choice. Legality of the `(type, action)` pair is checked during
//! the parse against the [`Catalog`], and every rejection carries the
//! byte position of the token that caused it.

use nom::bytes::complete::take_while1;
use nom::character::complete::{digit1, multispace0};
use nom::IResult;

use crate::ast::{ClassCommand, Command, InstanceCommand, TypeName};
use crate::catalog::Catalog;
use crate::diagnostics::{self, SyntaxError};

// ===== LEXEMES =====

type Lex<'a> = IResult<&'a str, &'a str, ()>;

/// Identifier-ish word: action names, parameter words.
fn lex_word(input: &str) -> Lex<'_> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn lex_digits(input: &str) -> Lex<'_> {
    digit1(input)
}

fn skip_ws(input: &str) -> &str {
    let blanks: Lex<'_> = multispace0(input);
    match blanks {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

// ===== CURSOR =====

/// Tracks the unconsumed tail of the line so every error can report the
/// byte offset it occurred at.
struct Cursor<'a> {
    line: &'a str,
    rest: &'a str,
    catalog: &'a Catalog,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, catalog: &'a Catalog) -> Cursor<'a> {
        Cursor {
            line,
            rest: line,
            catalog,
        }
    }

    fn pos(&self) -> usize {
        self.line.len() - self.rest.len()
    }

    fn ws(&mut self) {
        self.rest = skip_ws(self.rest);
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self, expected: char) -> bool {
        if self.rest.starts_with(expected) {
            self.rest = &self.rest[expected.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> Option<&'a str> {
        match lex_word(self.rest) {
            Ok((rest, word)) => {
                self.rest = rest;
                Some(word)
            }
            Err(_) => None,
        }
    }

    fn digits(&mut self) -> Option<&'a str> {
        match lex_digits(self.rest) {
            Ok((rest, digits)) => {
                self.rest = rest;
                Some(digits)
            }
            Err(_) => None,
        }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn fail<T>(&self, message: impl Into<String>) -> Result<T, SyntaxError> {
        Err(SyntaxError::new(self.pos(), message))
    }
}

// ===== PRODUCTIONS =====

/// Parses one input line into a [`Command`], or explains why not.
pub fn parse(line: &str, catalog: &Catalog) -> Result<Command, SyntaxError> {
    let mut cur = Cursor::new(line, catalog);
    cur.ws();
    if cur.at_end() {
        return cur.fail("empty command");
    }
    let kind = type_keyword(&mut cur)?;
    cur.ws();
    match cur.peek() {
        Some('(') => instance_command(&mut cur, kind),
        Some('.') => class_command(&mut cur, kind),
        _ => cur.fail(format!("expected '.' or '(<id>)' after '{kind}'")),
    }
}

fn type_keyword(cur: &mut Cursor<'_>) -> Result<TypeName, SyntaxError> {
    let at = cur.pos();
    let Some(word) = cur.word() else {
        return cur.fail("expected an object type");
    };
    match TypeName::from_keyword(word) {
        Some(kind) if cur.catalog.contains(kind) => Ok(kind),
        Some(kind) => Err(SyntaxError::new(
            at,
            format!("type '{kind}' is not available"),
        )),
        None => {
            let known = cur.catalog.kinds().map(|kind| kind.as_str());
            let message =
                diagnostics::with_suggestion(format!("unknown object type '{word}'"), word, known);
            Err(SyntaxError::new(at, message))
        }
    }
}

fn class_command(cur: &mut Cursor<'_>, kind: TypeName) -> Result<Command, SyntaxError> {
    cur.bump('.');
    cur.ws();
    let action = action_keyword(cur, kind, Level::Class)?;
    let params = params(cur)?;
    finish(cur)?;
    Ok(Command::Class(ClassCommand {
        kind,
        action,
        params,
    }))
}

fn instance_command(cur: &mut Cursor<'_>, kind: TypeName) -> Result<Command, SyntaxError> {
    cur.bump('(');
    cur.ws();
    let at = cur.pos();
    let Some(raw) = cur.digits() else {
        return cur.fail("instance id must be a non-negative integer");
    };
    let id: u64 = raw
        .parse()
        .map_err(|_| SyntaxError::new(at, format!("instance id '{raw}' is out of range")))?;
    cur.ws();
    if !cur.bump(')') {
        return cur.fail("expected ')' after the instance id");
    }
    cur.ws();
    if !cur.bump('.') {
        return cur.fail("expected '.' between instance and action");
    }
    cur.ws();
    let action = action_keyword(cur, kind, Level::Instance)?;
    let params = params(cur)?;
    finish(cur)?;
    Ok(Command::Instance(InstanceCommand {
        kind,
        id,
        action,
        params,
    }))
}

#[derive(Clone, Copy)]
enum Level {
    Class,
    Instance,
}

fn action_keyword(cur: &mut Cursor<'_>, kind: TypeName, level: Level) -> Result<String, SyntaxError> {
    let at = cur.pos();
    let Some(word) = cur.word() else {
        return cur.fail("expected an action name");
    };
    let action = word.to_ascii_lowercase();
    let (here, elsewhere) = match level {
        Level::Class => (
            cur.catalog.has_class_action(kind, &action),
            cur.catalog.has_instance_action(kind, &action),
        ),
        Level::Instance => (
            cur.catalog.has_instance_action(kind, &action),
            cur.catalog.has_class_action(kind, &action),
        ),
    };
    if here {
        return Ok(action);
    }
    // Wrong level gets a pointed hint, a stranger gets a suggestion.
    let message = if elsewhere {
        match level {
            Level::Class => format!("'{action}' needs an instance id: {kind}(<id>).{action}"),
            Level::Instance => format!("'{action}' applies to the whole type: {kind}.{action}"),
        }
    } else {
        diagnostics::with_suggestion(
            format!("unknown action '{action}' for type '{kind}'"),
            &action,
            cur.catalog.actions(kind),
        )
    };
    Err(SyntaxError::new(at, message))
}

fn params(cur: &mut Cursor<'_>) -> Result<Vec<String>, SyntaxError> {
    cur.ws();
    if !cur.bump('(') {
        return Ok(Vec::new());
    }
    cur.ws();
    if cur.bump(')') {
        return Ok(Vec::new());
    }
    let mut words = Vec::new();
    loop {
        cur.ws();
        let Some(word) = cur.word() else {
            return cur.fail("expected a parameter word");
        };
        words.push(word.to_string());
        cur.ws();
        if cur.bump(',') {
            continue;
        }
        if cur.bump(')') {
            return Ok(words);
        }
        return cur.fail("unbalanced parameter list: expected ',' or ')'");
    }
}

fn finish(cur: &mut Cursor<'_>) -> Result<(), SyntaxError> {
    cur.ws();
    if cur.at_end() {
        Ok(())
    } else {
        cur.fail("unexpected trailing input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The vocabulary the application registers, reproduced here so the
    /// grammar tests read standalone.
    fn catalog() -> Catalog {
        let mut c = Catalog::new();
        c.define(TypeName::Account, &["info"], &[]);
        c.define(TypeName::Datacenter, &["list"], &[]);
        c.define(TypeName::Disk, &["count", "list"], &["delete", "info"]);
        c.define(TypeName::Iface, &["count", "list"], &["info"]);
        c.define(TypeName::Image, &["list"], &["info"]);
        c.define(TypeName::Ip, &["count", "list"], &["info"]);
        c.define(TypeName::Operation, &["count", "list"], &["info"]);
        c.define(
            TypeName::Vm,
            &["count", "list", "create"],
            &[
                "connect",
                "delete",
                "info",
                "start",
                "stop",
                "reboot",
                "disk_attach",
                "disk_detach",
            ],
        );
        c
    }

    fn parse_ok(line: &str) -> Command {
        match parse(line, &catalog()) {
            Ok(cmd) => cmd,
            Err(err) => panic!("'{line}' rejected: {err}"),
        }
    }

    fn parse_err(line: &str) -> SyntaxError {
        match parse(line, &catalog()) {
            Ok(cmd) => panic!("'{line}' accepted as {cmd:?}"),
            Err(err) => err,
        }
    }

    #[test]
    fn test_class_command() {
        assert_eq!(
            parse_ok("disk.count"),
            Command::Class(ClassCommand {
                kind: TypeName::Disk,
                action: "count".into(),
                params: vec![],
            })
        );
    }

    #[test]
    fn test_instance_command() {
        assert_eq!(
            parse_ok("vm(3).delete"),
            Command::Instance(InstanceCommand {
                kind: TypeName::Vm,
                id: 3,
                action: "delete".into(),
                params: vec![],
            })
        );
    }

    #[test]
    fn test_parameter_lists() {
        assert_eq!(parse_ok("vm.list()").params(), &[] as &[String]);
        assert_eq!(parse_ok("account.info(refresh)").params(), ["refresh"]);
        assert_eq!(
            parse_ok("vm(1).disk_attach(12,fast)").params(),
            ["12", "fast"]
        );
    }

    #[test]
    fn test_keywords_fold_case() {
        assert_eq!(parse_ok("VM(3).Info").to_string(), "vm(3).info");
        assert_eq!(parse_ok("Disk.COUNT").to_string(), "disk.count");
        // Parameters are data and keep their case.
        assert_eq!(parse_ok("account.info(Refresh)").params(), ["Refresh"]);
    }

    #[test]
    fn test_whitespace_between_tokens_is_ignored() {
        assert_eq!(parse_ok("  vm ( 3 ) . info  ").to_string(), "vm(3).info");
        assert_eq!(
            parse_ok("vm . list ( a , b )").to_string(),
            "vm.list(a,b)"
        );
    }

    #[test]
    fn test_leading_zeros_normalize() {
        assert_eq!(parse_ok("vm(007).info").to_string(), "vm(7).info");
    }

    #[test]
    fn test_canonical_text_reparses_to_the_same_command() {
        for line in [
            "disk.count",
            "vm(3).delete",
            "account.info(refresh)",
            "vm(1).disk_attach(12)",
            "datacenter.list",
        ] {
            let first = parse_ok(line);
            assert_eq!(parse_ok(&first.to_string()), first);
        }
    }

    // ===== REJECTIONS =====

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(parse_err("").message, "empty command");
        assert_eq!(parse_err("   ").message, "empty command");
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = parse_err("datacentre.list");
        assert_eq!(err.position, 0);
        assert_eq!(
            err.message,
            "unknown object type 'datacentre' (did you mean 'datacenter'?)"
        );
        assert!(parse_err("zzz.list").message.starts_with("unknown object type"));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let err = parse_err("vm(1).unknown_action");
        assert_eq!(err.position, 6);
        assert!(err.message.contains("unknown action 'unknown_action'"));

        let err = parse_err("vm(1).strt");
        assert_eq!(err.message, "unknown action 'strt' for type 'vm' (did you mean 'start'?)");
    }

    #[test]
    fn test_rejects_action_outside_its_type() {
        // count exists for other kinds but not datacenter.
        let err = parse_err("datacenter.count");
        assert!(err.message.contains("unknown action 'count' for type 'datacenter'"));
        // create is vm-only.
        let err = parse_err("disk.create");
        assert!(err.message.contains("unknown action 'create' for type 'disk'"));
    }

    #[test]
    fn test_rejects_action_at_the_wrong_level() {
        let err = parse_err("vm.info");
        assert_eq!(err.message, "'info' needs an instance id: vm(<id>).info");
        let err = parse_err("vm(3).list");
        assert_eq!(err.message, "'list' applies to the whole type: vm.list");
        let err = parse_err("vm(3).create");
        assert_eq!(err.message, "'create' applies to the whole type: vm.create");
    }

    #[test]
    fn test_rejects_bad_instance_id() {
        for line in ["vm(abc).info", "vm().info", "vm(-1).info"] {
            let err = parse_err(line);
            assert_eq!(err.message, "instance id must be a non-negative integer", "{line}");
            assert_eq!(err.position, 3, "{line}");
        }
        let err = parse_err("vm(1.5).info");
        assert_eq!(err.message, "expected ')' after the instance id");
    }

    #[test]
    fn test_rejects_id_overflow() {
        let err = parse_err("vm(99999999999999999999).info");
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn test_rejects_missing_pieces() {
        assert_eq!(parse_err("vm").message, "expected '.' or '(<id>)' after 'vm'");
        assert_eq!(parse_err("vm.").message, "expected an action name");
        assert_eq!(
            parse_err("vm(3)").message,
            "expected '.' between instance and action"
        );
        assert_eq!(parse_err(".list").message, "expected an object type");
    }

    #[test]
    fn test_rejects_unbalanced_params() {
        assert_eq!(
            parse_err("vm.list(a").message,
            "unbalanced parameter list: expected ',' or ')'"
        );
        assert_eq!(parse_err("vm.list(a,").message, "expected a parameter word");
        assert_eq!(parse_err("vm.list(a,)").message, "expected a parameter word");
        assert_eq!(parse_err("vm.list(").message, "expected a parameter word");
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        let err = parse_err("vm.list extra");
        assert_eq!(err.message, "unexpected trailing input");
        assert_eq!(err.position, 8);
        assert_eq!(parse_err("vm.list)").message, "unexpected trailing input");
    }

    #[test]
    fn test_unavailable_type_is_reported() {
        let mut partial = Catalog::new();
        partial.define(TypeName::Vm, &["list"], &[]);
        let err = match parse("disk.list", &partial) {
            Err(err) => err,
            Ok(cmd) => panic!("accepted {cmd:?}"),
        };
        assert_eq!(err.message, "type 'disk' is not available");
    }
}
