//! Structured, log-friendly views of error chains.
//!
//! Gated behind the `serde` feature so consumers that only need the
//! rendered string don't pull in serialization dependencies.

#![cfg(feature = "serde")]

use errchain_trace::Frame;
use serde::Serialize;

use super::ErrorChain;

/// Provide a structured view of an error for logging/UI.
pub trait PrettyDebug {
    type Fields<'a>: Serialize + 'a
    where
        Self: 'a;

    fn fields(&self) -> Self::Fields<'_>;

    /// Fields as a JSON value without pretty whitespace.
    fn to_value(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self.fields()).ok()
    }

    /// Fields as a pretty JSON string.
    fn pretty_json(&self) -> Option<String> {
        serde_json::to_string_pretty(&self.fields()).ok()
    }
}

#[derive(Debug, Serialize)]
pub struct ChainFields {
    /// Member messages, outermost first.
    pub messages: Vec<String>,
    pub frames: Vec<Frame>,
}

impl PrettyDebug for ErrorChain {
    type Fields<'a> = ChainFields;

    fn fields(&self) -> Self::Fields<'_> {
        ChainFields {
            messages: self.iter().map(|err| err.to_string()).collect(),
            frames: self.diagnostic().frames(),
        }
    }
}
