use std::sync::Arc;

use super::{ErrorChain, SharedError, StdError};
use crate::specifier::downcast_concrete;

/// One input to [`crate::wrap`]: either a whole chain or a single error.
///
/// Any `Error + Send + Sync + 'static` converts into a `Link`. Chains are
/// recognised even when they arrive boxed, in an `Arc` or type-erased behind a
/// [`SharedError`], so they can be flattened instead of nested.
#[derive(Debug, Clone)]
pub enum Link {
    Chain(ErrorChain),
    Single(SharedError),
}

impl Link {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_shared(Arc::new(err))
    }

    pub fn from_shared(err: SharedError) -> Self {
        if let Some(chain) = downcast_concrete::<ErrorChain>(&*err) {
            return Link::Chain(chain.clone());
        }
        // an `Arc<dyn Error>` passed by value arrives double-wrapped
        if let Some(inner) = err.downcast_ref::<SharedError>() {
            return Self::from_shared(Arc::clone(inner));
        }
        Link::Single(err)
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, Link::Chain(_))
    }
}

impl<E> From<E> for Link
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Link::new(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn plain_error_is_single() {
        assert!(!Link::from(Message::new_static("x")).is_chain());
    }

    #[test]
    fn chain_is_recognised_directly_and_type_erased() {
        let chain = crate::new("boom");
        assert!(Link::from(chain.clone()).is_chain());

        let erased: SharedError = Arc::new(chain);
        assert!(Link::from_shared(Arc::clone(&erased)).is_chain());
        assert!(Link::from(erased).is_chain());
    }

    #[test]
    fn boxed_and_arced_chains_are_recognised() {
        let chain = crate::new("boom");
        assert!(Link::from(Box::new(chain.clone())).is_chain());
        assert!(Link::from(Arc::new(chain.clone())).is_chain());

        let erased: SharedError = Arc::new(Arc::new(chain));
        let Link::Chain(found) = Link::from_shared(erased) else {
            panic!("expected a chain");
        };
        assert_eq!(found.render(), "boom");
    }
}
