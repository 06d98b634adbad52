//! Interactive narrowing of a candidate set down to one record.
//!
//! Used wherever a flow needs the operator to pick an object out of a
//! listing, e.g. the base image during vm creation. The loop always
//! terminates: an empty candidate set fails immediately, a single
//! candidate is taken without asking, and every round either returns,
//! shrinks the set, or warns and re-asks.

use crate::error::Fault;
use crate::prompt::Prompter;
use crate::record::{Listing, Record};

/// Narrows `candidates` to one record.
///
/// The operator answers each round with either an exact id or a keyword
/// matched as a substring of the `label_key` field. A keyword matching
/// exactly one candidate selects it; one matching several shrinks the
/// set and shows it again. `what` names the things being chosen, for
/// messages.
pub fn narrow(
    io: &mut dyn Prompter,
    mut candidates: Listing,
    label_key: &str,
    what: &str,
) -> Result<Record, Fault> {
    if candidates.is_empty() {
        return Err(Fault::Argument(format!("no {what} to select from")));
    }
    for record in candidates.values() {
        io.show(&record.to_string());
    }
    while candidates.len() > 1 {
        let answer = io.ask_string(&format!("an id or a keyword ({} {what} left)", candidates.len()))?;
        if let Ok(id) = answer.parse::<u64>() {
            match candidates.remove(&id) {
                Some(record) => return Ok(record),
                None => {
                    io.warn(&format!("{id} is not a valid id"));
                    continue;
                }
            }
        }
        let filtered: Listing = candidates
            .iter()
            .filter(|(_, record)| {
                record
                    .get_str(label_key)
                    .is_some_and(|label| label.contains(answer.as_str()))
            })
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        match filtered.len() {
            0 => io.warn(&format!("no {label_key} contains \"{answer}\"")),
            1 => {
                if let Some(record) = filtered.into_values().next() {
                    return Ok(record);
                }
            }
            _ => {
                candidates = filtered;
                for record in candidates.values() {
                    io.show(&record.to_string());
                }
            }
        }
    }
    candidates
        .into_values()
        .next()
        .ok_or_else(|| Fault::Argument(format!("no {what} to select from")))
}
