//! Decides whether a single candidate error matches a target.
//!
//! Rules, in order of precedence:
//! 1. identity: the candidate and the target are the same object;
//! 2. message equality: both render the same message (value lookups only,
//!    so a sentinel rebuilt with the same text still matches);
//! 3. interface satisfaction: the specifier names an interface the
//!    candidate's type was declared to implement;
//! 4. concrete type: the specifier names the candidate's type.
//!
//! Nothing here fails. A missing candidate or an untyped specifier is simply
//! "no match".

use std::mem::size_of_val;
use std::ptr;

use super::{Specifier, SpecifierKind, StdError};
use crate::specifier::downcast_concrete;

/// Outcome of comparing two optional errors by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Neither side is present. Equal, but not something a lookup can use.
    BothAbsent,
    OneAbsent,
    Same,
    Distinct,
}

impl Comparison {
    /// Both sides were present.
    pub fn is_valid(self) -> bool {
        matches!(self, Comparison::Same | Comparison::Distinct)
    }

    pub fn is_match(self) -> bool {
        matches!(self, Comparison::Same | Comparison::BothAbsent)
    }
}

pub fn compare<T>(source: Option<&(dyn StdError + 'static)>, target: Option<&T>) -> Comparison
where
    T: StdError + 'static,
{
    match (source, target) {
        (None, None) => Comparison::BothAbsent,
        (None, Some(_)) | (Some(_), None) => Comparison::OneAbsent,
        (Some(source), Some(target)) if matches_value(source, target) => Comparison::Same,
        (Some(_), Some(_)) => Comparison::Distinct,
    }
}

/// Rules 1 and 2.
pub fn matches_value<T>(candidate: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + 'static,
{
    is_identical(candidate, target) || candidate.to_string() == target.to_string()
}

/// Rules 3 and 4.
pub fn matches_type(candidate: Option<&(dyn StdError + 'static)>, specifier: &Specifier) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    match (specifier.kind(), specifier.probe()) {
        (SpecifierKind::Untyped, _) | (_, None) => false,
        (SpecifierKind::Interface | SpecifierKind::Concrete, Some(probe)) => probe(candidate),
    }
}

// Same type and same address. Zero-sized values may share an address without
// being the same object, and a wrapper shares its address with its first field.
fn is_identical<T>(candidate: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + 'static,
{
    size_of_val(target) != 0
        && downcast_concrete::<T>(candidate).is_some_and(|found| ptr::eq(found, target))
}
