//! Failure taxonomy for command execution.
//!
//! Parse-time rejections are [`cmd_lang::SyntaxError`] and never reach
//! the dispatcher; everything that can go wrong *after* a command parsed
//! funnels into [`Fault`]. The split matters to the shell: faults are
//! printed and the prompt returns, they are never fatal.

use cmd_lang::TypeName;
use thiserror::Error;

use crate::prompt::PromptError;

/// Failure talking to, or understanding, the remote API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// The server answered with a structured XML-RPC fault.
    #[error("remote fault {code}: {message}")]
    Fault { code: i32, message: String },

    /// The call never completed: DNS, TCP, TLS, HTTP, or a response
    /// that was not XML-RPC at all.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call completed but the payload had the wrong shape.
    #[error("malformed response: {0}")]
    Protocol(String),
}

/// Why one command failed to execute.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    /// Wrong number or shape of parameters, an aborted prompt, or
    /// answers that would not encode into a call payload.
    #[error("bad arguments: {0}")]
    Argument(String),

    /// The id does not exist in the instance cache for that kind.
    #[error("unknown {kind} id: {id}")]
    UnknownInstance { kind: TypeName, id: u64 },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl From<PromptError> for Fault {
    fn from(err: PromptError) -> Fault {
        Fault::Argument(format!("prompt aborted: {err}"))
    }
}

impl From<serde_json::Error> for Fault {
    fn from(err: serde_json::Error) -> Fault {
        Fault::Argument(format!("unencodable payload: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_fault_messages() {
        let fault = Fault::UnknownInstance {
            kind: TypeName::Vm,
            id: 42,
        };
        assert_eq!(fault.to_string(), "unknown vm id: 42");

        let fault = Fault::Argument("'delete' takes no parameter (got 2)".into());
        assert_eq!(
            fault.to_string(),
            "bad arguments: 'delete' takes no parameter (got 2)"
        );
    }

    #[test]
    fn test_remote_error_is_transparent() {
        let fault = Fault::from(RemoteError::Fault {
            code: 500,
            message: "no such vm".into(),
        });
        assert_eq!(fault.to_string(), "remote fault 500: no such vm");
    }

    #[test]
    fn test_prompt_abort_becomes_an_argument_fault() {
        let fault = Fault::from(PromptError::Eof);
        assert_eq!(fault.to_string(), "bad arguments: prompt aborted: end of input");
    }

    #[test]
    fn test_unencodable_payload_becomes_an_argument_fault() {
        // Sequence keys cannot become JSON object keys.
        let err = serde_json::to_value(BTreeMap::from([(vec![1u8], 1)])).unwrap_err();
        let fault = Fault::from(err);
        assert!(fault
            .to_string()
            .starts_with("bad arguments: unencodable payload:"));
    }
}
