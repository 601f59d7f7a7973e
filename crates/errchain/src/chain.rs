use std::fmt;
use std::sync::Arc;

use errchain_trace::Snapshot;

use super::{Interface, Link, SharedError, Specifier, StdError, facade};

/// Joins member messages in the form `outer : inner`.
pub const SEPARATOR: &str = " : ";

/// An ordered collection of errors that together describe one failure, from
/// the most specific context down to the root cause.
///
/// Members are stored root cause first; everything observable (iteration,
/// rendering, fetching) goes outermost first. For appends `A`, `B`, `C` the
/// message is `C : B : A`.
///
/// A chain never contains another chain: appending or prepending a chain
/// splices its members in, keeping their relative order.
///
/// The call stack is captured once, when the chain is created, and is shared
/// by every clone and by every chain this one is merged into.
#[derive(Clone)]
pub struct ErrorChain {
    members: Vec<SharedError>,
    diagnostic: Arc<Snapshot>,
}

impl ErrorChain {
    /// An empty chain holding a fresh call-stack snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::capture())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            members: Vec::new(),
            diagnostic: Arc::new(snapshot),
        }
    }

    /// Adds `link` as the outermost context.
    pub fn append(&mut self, link: impl Into<Link>) -> &mut Self {
        match link.into() {
            Link::Chain(other) => self.members.extend(other.members),
            Link::Single(err) => self.members.push(err),
        }
        self
    }

    /// Adds `link` on the root-cause side.
    pub fn prepend(&mut self, link: impl Into<Link>) -> &mut Self {
        match link.into() {
            Link::Chain(other) => {
                self.members.splice(0..0, other.members);
            }
            Link::Single(err) => self.members.insert(0, err),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members, outermost first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &(dyn StdError + Send + Sync + 'static)> + ExactSizeIterator
    {
        self.members.iter().rev().map(|err| &**err)
    }

    pub fn outermost(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.members.last().map(|err| &**err)
    }

    pub fn root_cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.members.first().map(|err| &**err)
    }

    pub fn diagnostic(&self) -> &Snapshot {
        &self.diagnostic
    }

    /// Member messages joined with [`SEPARATOR`], outermost first. Empty
    /// messages still take up a segment.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// [`Self::render`], a newline, then the captured call stack.
    pub fn render_with_diagnostic(&self) -> String {
        format!("{self:#}")
    }

    /// See [`crate::fetch`].
    pub fn fetch<'t, T>(&self, target: &'t T) -> Option<&'t T>
    where
        T: StdError + 'static,
    {
        facade::fetch(self, target)
    }

    /// See [`crate::fetch_by_type`].
    pub fn fetch_by_type(&self, specifier: &Specifier) -> Option<&(dyn StdError + 'static)> {
        facade::fetch_by_type(self, specifier)
    }

    /// See [`crate::fetch_all_by_type`].
    pub fn fetch_all_by_type(&self, specifier: &Specifier) -> Vec<&(dyn StdError + 'static)> {
        facade::fetch_all_by_type(self, specifier)
    }

    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        facade::find(self)
    }

    pub fn find_all<T: StdError + 'static>(&self) -> Vec<&T> {
        facade::find_all(self)
    }

    pub fn find_impl<I: Interface + ?Sized>(&self) -> Option<&I> {
        facade::find_impl(self)
    }

    #[cfg(feature = "tracing")]
    pub fn emit_tracing(&self, level: tracing::Level, message: &str) {
        use tracing::{Level, event};

        match level {
            Level::ERROR => event!(Level::ERROR, error = %self, members = self.len(), "{message}"),
            Level::WARN => event!(Level::WARN, error = %self, members = self.len(), "{message}"),
            Level::INFO => event!(Level::INFO, error = %self, members = self.len(), "{message}"),
            Level::DEBUG => event!(Level::DEBUG, error = %self, members = self.len(), "{message}"),
            _ => event!(Level::TRACE, error = %self, members = self.len(), "{message}"),
        }
    }
}

impl Default for ErrorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(SEPARATOR)?;
            }
            write!(f, "{err}")?;
        }
        if f.alternate() {
            writeln!(f)?;
            write!(f, "{}", self.diagnostic)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChain")
            .field("members", &self.iter().collect::<Vec<_>>())
            .field("diagnostic", &self.diagnostic)
            .finish()
    }
}

// Every member is already part of the rendered message, so there is no
// separate `source()` to report.
impl StdError for ErrorChain {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn msg(text: &'static str) -> Message {
        Message::new_static(text)
    }

    fn chain_of(texts: &[&'static str]) -> ErrorChain {
        let mut chain = ErrorChain::new();
        for text in texts {
            chain.append(msg(text));
        }
        chain
    }

    #[test]
    fn appends_render_outermost_first() {
        let chain = chain_of(&["A", "B", "C"]);
        assert_eq!(chain.render(), "C : B : A");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn prepend_goes_to_the_root_side() {
        let mut chain = chain_of(&["A", "B", "C"]);
        chain.prepend(msg("D"));
        assert_eq!(chain.render(), "C : B : A : D");
        assert_eq!(chain.root_cause().map(|e| e.to_string()).as_deref(), Some("D"));
        assert_eq!(chain.outermost().map(|e| e.to_string()).as_deref(), Some("C"));
    }

    #[test]
    fn appended_chain_is_spliced_in_order() {
        let mut chain = chain_of(&["A"]);
        chain.append(chain_of(&["P", "Q"]));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.render(), "Q : P : A");
        assert!(chain.iter().all(|e| !e.is::<ErrorChain>()));
    }

    #[test]
    fn prepended_chain_is_spliced_in_order() {
        let mut chain = chain_of(&["A"]);
        chain.prepend(chain_of(&["P", "Q"]));
        assert_eq!(chain.render(), "A : Q : P");
        assert!(chain.iter().all(|e| !e.is::<ErrorChain>()));
    }

    #[test]
    fn empty_messages_keep_their_segments() {
        let chain = chain_of(&["", ""]);
        assert_eq!(chain.render(), " : ");
        assert_eq!(chain_of(&["x", "", "y"]).render(), "y :  : x");
    }

    #[test]
    fn empty_chain_renders_empty() {
        assert_eq!(ErrorChain::new().render(), "");
        assert!(ErrorChain::default().is_empty());
    }

    #[test]
    fn merge_keeps_the_receivers_snapshot() {
        let mut chain = chain_of(&["A"]);
        let before = Arc::clone(&chain.diagnostic);
        chain.append(chain_of(&["B"]));
        chain.prepend(chain_of(&["C"]));
        assert!(Arc::ptr_eq(&before, &chain.diagnostic));
    }

    #[test]
    fn clones_are_independent() {
        let original = chain_of(&["A"]);
        let mut copy = original.clone();
        copy.append(msg("B"));
        assert_eq!(original.render(), "A");
        assert_eq!(copy.render(), "B : A");
        assert!(Arc::ptr_eq(&original.diagnostic, &copy.diagnostic));
    }

    #[test]
    fn alternate_display_appends_the_diagnostic() {
        let chain = chain_of(&["A", "B"]);
        let verbose = chain.render_with_diagnostic();
        assert!(verbose.starts_with("B : A\n"));
        assert_eq!(verbose, format!("B : A\n{}", chain.diagnostic()));
        assert_eq!(format!("{chain}"), "B : A");
    }

    #[test]
    fn chain_has_no_source() {
        let chain = chain_of(&["A"]);
        assert!(chain.source().is_none());
    }
}
