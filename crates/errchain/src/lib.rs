//! errchain — error context aggregation
//!
//! An error is either handled where it happens or handed to the layer above
//! together with some context. errchain keeps all of that context in one
//! [`ErrorChain`]: each layer wraps the error it got with its own error or
//! message, and the layer that finally handles it can ask whether a specific
//! cause is in there, by value, by type or by interface.
//!
//! - [`wrap`], [`with_message!`], [`wrap_with_message!`] and [`ResultExt`]
//!   build chains, reusing a chain found among their inputs.
//! - [`fetch`] looks for a sentinel by identity or message.
//! - [`fetch_by_type`] / [`fetch_all_by_type`] (and the typed [`find`],
//!   [`find_all`], [`find_impl`]) look for a concrete type or an interface.
//!
//! A chain renders as its member messages, outermost first, joined with
//! `" : "`. `{:#}` appends the call stack captured when the chain was created.
//!
//! ```rust,ignore
//! use errchain::{Link, Message, fetch, wrap};
//!
//! static ERR_JSON: Message = Message::new_static("json unmarshal error");
//!
//! let err = wrap([Link::from(decode_err), Link::from(ERR_JSON.clone())]).unwrap();
//! assert_eq!(err.to_string(), format!("json unmarshal error : {decode_msg}"));
//! assert!(std::ptr::eq(fetch(&err, &ERR_JSON).unwrap(), &ERR_JSON));
//! ```
//!
//! Features:
//! - `tracing`: trace events when chains are assembled, [`ErrorChain::emit_tracing`].
//! - `serde`: `pretty::PrettyDebug` for structured logging of a chain.

pub mod chain;
pub mod facade;
pub mod link;
pub mod matcher;
pub mod message;
pub mod pretty;
pub mod result_ext;
pub mod specifier;

// public exports
pub use chain::{ErrorChain, SEPARATOR};
pub use errchain_trace::{CaptureConfig, Frame, Snapshot};
pub use facade::{
    fetch, fetch_all_by_type, fetch_by_type, find, find_all, find_impl, new, with_message, wrap,
    wrap_with_message,
};
pub use link::Link;
pub use matcher::Comparison;
pub use message::Message;
pub use result_ext::ResultExt;
pub use specifier::{Interface, Specifier, SpecifierKind};

// common imports for submodules
use std::error::Error as StdError;
use std::sync::Arc;

/// How chain members are held: shared, type-erased, thread-safe.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

pub type Result<T, E = ErrorChain> = std::result::Result<T, E>;
