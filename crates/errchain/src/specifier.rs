//! Targets for type-based lookups.
//!
//! A [`Specifier`] names what to look for without holding a value: a concrete
//! error type, or an interface (a trait object type) together with the set of
//! concrete types declared to implement it.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use super::StdError;

type Probe = fn(&(dyn StdError + 'static)) -> bool;

/// Capability query for trait object types.
///
/// Rust cannot ask whether an arbitrary `dyn Error` implements some trait, so
/// an interface lists its implementors up front and `cast` tries each of
/// them with a checked downcast. Use [`declare_interface!`](crate::declare_interface)
/// rather than implementing this by hand.
pub trait Interface: 'static {
    fn cast<'a>(candidate: &'a (dyn StdError + 'static)) -> Option<&'a Self>;
}

/// Every error satisfies `dyn Error`.
impl Interface for dyn StdError {
    fn cast<'a>(candidate: &'a (dyn StdError + 'static)) -> Option<&'a Self> {
        Some(candidate)
    }
}

/// Declares which concrete error types implement a trait, so the trait can be
/// used with [`Specifier::implementing`] and [`crate::find_impl`].
///
/// ```rust,ignore
/// trait Retryable { fn attempts(&self) -> u32; }
/// errchain::declare_interface!(dyn Retryable => TimeoutError, BusyError);
/// ```
#[macro_export]
macro_rules! declare_interface {
    ($iface:ty => $($implementor:ty),+ $(,)?) => {
        impl $crate::Interface for $iface {
            fn cast<'a>(
                candidate: &'a (dyn ::std::error::Error + 'static),
            ) -> ::core::option::Option<&'a Self> {
                $(
                    if let ::core::option::Option::Some(found) =
                        $crate::specifier::downcast_concrete::<$implementor>(candidate)
                    {
                        return ::core::option::Option::Some(found as &'a Self);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}

/// Downcasts to `T` whether the member holds a `T`, a `Box<T>` or an `Arc<T>`.
pub fn downcast_concrete<'a, T>(candidate: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    candidate
        .downcast_ref::<T>()
        .or_else(|| candidate.downcast_ref::<Box<T>>().map(|boxed| &**boxed))
        .or_else(|| candidate.downcast_ref::<Arc<T>>().map(|shared| &**shared))
}

fn is_concrete<T: StdError + 'static>(candidate: &(dyn StdError + 'static)) -> bool {
    downcast_concrete::<T>(candidate).is_some()
}

fn satisfies<I: Interface + ?Sized>(candidate: &(dyn StdError + 'static)) -> bool {
    I::cast(candidate).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    Concrete,
    Interface,
    /// Carries no type information and matches nothing.
    Untyped,
}

#[derive(Clone, Copy)]
pub struct Specifier {
    kind: SpecifierKind,
    name: &'static str,
    probe: Option<Probe>,
}

impl Specifier {
    /// Matches members whose concrete type is `T` (held directly, boxed or in an `Arc`).
    pub fn of<T: StdError + 'static>() -> Self {
        Self {
            kind: SpecifierKind::Concrete,
            name: type_name::<T>(),
            probe: Some(is_concrete::<T>),
        }
    }

    /// Matches members of the same concrete type as `value`.
    pub fn type_of<T: StdError + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Matches members that implement the interface `I`, e.g. `dyn Retryable`.
    pub fn implementing<I: Interface + ?Sized>() -> Self {
        Self {
            kind: SpecifierKind::Interface,
            name: type_name::<I>(),
            probe: Some(satisfies::<I>),
        }
    }

    pub fn untyped() -> Self {
        Self {
            kind: SpecifierKind::Untyped,
            name: "<untyped>",
            probe: None,
        }
    }

    pub fn kind(&self) -> SpecifierKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn probe(&self) -> Option<Probe> {
        self.probe
    }
}

impl Default for Specifier {
    fn default() -> Self {
        Self::untyped()
    }
}

impl fmt::Debug for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specifier")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}
