//! Dynamic records: the JSON-backed view of every remote object.
//!
//! The API is schemaless from our side. A [`Record`] is whatever struct
//! the server sent, tagged with the [`TypeName`] it was fetched as, and
//! a [`Listing`] is the id-keyed map a `list` call produces. Display
//! follows the shell's one-object template:
//!
//! ```text
//! * VirtualMachine(3):
//! *\thostname: web1
//! *\tstate: running
//! ```

use std::collections::BTreeMap;
use std::fmt;

use cmd_lang::TypeName;
use colored::Colorize;
use serde_json::Value;

use crate::error::RemoteError;

pub type Fields = serde_json::Map<String, Value>;

/// All cached instances of one kind, keyed by instance id.
pub type Listing = BTreeMap<u64, Record>;

/// Keys the display template skips. The id is shown in the header line;
/// the account extras are noise nobody asked to scroll past.
fn hidden_keys(kind: TypeName) -> &'static [&'static str] {
    match kind {
        TypeName::Account => &[
            "id",
            "share_definition",
            "products",
            "resources",
            "rating_enabled",
        ],
        _ => &["id"],
    }
}

/// One remote object, as last seen on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: TypeName,
    fields: Fields,
}

impl Record {
    /// Wraps a wire struct. Anything but a JSON object is a protocol
    /// violation.
    pub fn from_value(kind: TypeName, value: Value) -> Result<Record, RemoteError> {
        match value {
            Value::Object(fields) => Ok(Record { kind, fields }),
            other => Err(RemoteError::Protocol(format!(
                "expected a struct for {kind}, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn kind(&self) -> TypeName {
        self.kind
    }

    pub fn id(&self) -> Option<u64> {
        self.fields.get("id").and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self
            .id()
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        write!(
            f,
            "* {}({}): ",
            self.kind.display_name().red().bold(),
            id.yellow().bold()
        )?;
        let hidden = hidden_keys(self.kind);
        for (key, value) in &self.fields {
            if hidden.contains(&key.as_str()) {
                continue;
            }
            write!(f, "\n*\t{}: {}", key.as_str().bold(), render_value(value))?;
        }
        Ok(())
    }
}

/// Scalar-friendly rendition: strings lose their quotes, everything
/// else prints as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a struct",
    }
}

/// Builds a [`Listing`] from the array-of-structs every `list` call
/// returns. Each element must be a struct carrying a numeric `id`.
pub fn listing_from_value(kind: TypeName, value: Value) -> Result<Listing, RemoteError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(RemoteError::Protocol(format!(
                "expected an array of {kind} structs, got {}",
                json_kind(&other)
            )))
        }
    };
    let mut listing = Listing::new();
    for item in items {
        let record = Record::from_value(kind, item)?;
        let id = record.id().ok_or_else(|| {
            RemoteError::Protocol(format!("{kind} list item has no numeric id"))
        })?;
        listing.insert(id, record);
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::from_value(
            TypeName::Vm,
            json!({"id": 3, "hostname": "web1", "memory": 512, "cost": 1.5}),
        )
        .unwrap();
        assert_eq!(record.kind(), TypeName::Vm);
        assert_eq!(record.id(), Some(3));
        assert_eq!(record.get_str("hostname"), Some("web1"));
        assert_eq!(record.get_i64("memory"), Some(512));
        assert_eq!(record.get_f64("cost"), Some(1.5));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_non_struct_is_a_protocol_error() {
        let err = Record::from_value(TypeName::Disk, json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed response: expected a struct for disk, got an array"
        );
    }

    #[test]
    fn test_display_template() {
        plain();
        let record = Record::from_value(
            TypeName::Vm,
            json!({"id": 3, "hostname": "web1", "state": "running"}),
        )
        .unwrap();
        assert_eq!(
            record.to_string(),
            "* VirtualMachine(3): \n*\thostname: web1\n*\tstate: running"
        );
    }

    #[test]
    fn test_display_hides_account_noise() {
        plain();
        let record = Record::from_value(
            TypeName::Account,
            json!({"id": 1, "handle": "AB123", "products": [1, 2], "resources": {}}),
        )
        .unwrap();
        assert_eq!(record.to_string(), "* Account(1): \n*\thandle: AB123");
    }

    #[test]
    fn test_nested_values_render_as_compact_json() {
        plain();
        let record = Record::from_value(
            TypeName::Iface,
            json!({"id": 9, "ips": [{"ip": "10.0.0.1"}]}),
        )
        .unwrap();
        assert_eq!(
            record.to_string(),
            "* Iface(9): \n*\tips: [{\"ip\":\"10.0.0.1\"}]"
        );
    }

    #[test]
    fn test_listing_is_keyed_by_id() {
        let listing = listing_from_value(
            TypeName::Disk,
            json!([{"id": 7, "name": "sys"}, {"id": 2, "name": "data"}]),
        )
        .unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.keys().copied().collect::<Vec<_>>(), vec![2, 7]);
        assert_eq!(listing[&7].get_str("name"), Some("sys"));
    }

    #[test]
    fn test_listing_rejects_wrong_shapes() {
        let err = listing_from_value(TypeName::Disk, json!({"id": 1})).unwrap_err();
        assert!(err.to_string().contains("expected an array"));

        let err = listing_from_value(TypeName::Disk, json!([{"name": "no-id"}])).unwrap_err();
        assert!(err.to_string().contains("no numeric id"));
    }
}
