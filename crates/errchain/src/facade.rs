use std::borrow::Cow;
use std::fmt;

use itertools::Either;

use super::{ErrorChain, Interface, Link, Message, Specifier, StdError, matcher};
use crate::matcher::Comparison;
use crate::specifier::downcast_concrete;

/// A one-member chain holding `message`.
pub fn new(message: impl Into<Cow<'static, str>>) -> ErrorChain {
    let mut chain = ErrorChain::new();
    chain.append(Message::new(message));
    chain
}

/// Wraps several errors into one chain, outermost last.
///
/// Absent items are skipped; if nothing is left the result is `None`.
///
/// If any item is itself a chain, the right-most one is reused: items after it
/// are appended in order, items before it are prepended right to left, and
/// its snapshot is kept. Every other chain among the items is flattened into
/// it. Without a chain among the items a new one is created.
///
/// ```rust,ignore
/// let err = errchain::wrap([Link::from(io_err), Link::from(ERR_LOAD)]);
/// assert_eq!(err.unwrap().to_string(), "failed to load : permission denied");
/// ```
pub fn wrap<I, L>(links: I) -> Option<ErrorChain>
where
    I: IntoIterator<Item = L>,
    L: Into<Option<Link>>,
{
    let links: Vec<Link> = links.into_iter().filter_map(Into::into).collect();
    if links.is_empty() {
        return None;
    }
    Some(assemble(links))
}

pub(crate) fn assemble(links: Vec<Link>) -> ErrorChain {
    let mut target: Option<ErrorChain> = None;
    let mut before = Vec::new();
    let mut after = Vec::new();

    // right to left: `after` fills reversed, `before` already in prepend order
    for link in links.into_iter().rev() {
        if target.is_some() {
            before.push(link);
            continue;
        }
        match link {
            Link::Chain(chain) => target = Some(chain),
            single => after.push(single),
        }
    }

    #[cfg(feature = "tracing")]
    let reused = target.is_some();
    let mut chain = target.unwrap_or_default();
    for link in before {
        chain.prepend(link);
    }
    for link in after.into_iter().rev() {
        chain.append(link);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "errchain",
        reused,
        members = chain.len(),
        "wrapped errors into chain"
    );
    chain
}

/// Makes a formatted message the outermost context of `err`.
///
/// `None` stands for an empty format string: nothing is attached, but a plain
/// error still comes back as a one-member chain. Usually called through
/// [`with_message!`](crate::with_message), which passes `None` for `""`.
pub fn with_message(err: impl Into<Link>, args: Option<fmt::Arguments<'_>>) -> ErrorChain {
    attach(err.into(), format_message(args))
}

/// `with_message(wrap([err1, err2]), args)`.
///
/// For a third-party error that needs both an application error and some
/// local context. Usually called through [`wrap_with_message!`](crate::wrap_with_message).
pub fn wrap_with_message(
    err1: impl Into<Link>,
    err2: impl Into<Link>,
    args: Option<fmt::Arguments<'_>>,
) -> ErrorChain {
    let wrapped = assemble(vec![err1.into(), err2.into()]);
    attach(Link::Chain(wrapped), format_message(args))
}

fn format_message(args: Option<fmt::Arguments<'_>>) -> Option<Message> {
    args.map(|args| Message::new(args.to_string()))
}

// Decided on the format string: the formatted output of a non-empty format
// may still be empty, and `Arguments::as_str` cannot tell the two apart.
#[doc(hidden)]
pub fn non_empty_format<'a>(
    format: &str,
    args: fmt::Arguments<'a>,
) -> Option<fmt::Arguments<'a>> {
    (!format.is_empty()).then_some(args)
}

pub(crate) fn attach(link: Link, message: Option<Message>) -> ErrorChain {
    let mut chain = match link {
        Link::Chain(chain) => chain,
        single => {
            let mut chain = ErrorChain::new();
            chain.append(single);
            chain
        }
    };
    if let Some(message) = message {
        chain.append(message);
    }
    chain
}

/// Looks for `target` by identity or by message.
///
/// The container itself is checked first, then, if it is a chain, each member
/// outermost first. On a match the target itself is returned, so sentinels can
/// be compared with `ptr::eq` or `==`.
pub fn fetch<'t, T>(container: &(dyn StdError + 'static), target: &'t T) -> Option<&'t T>
where
    T: StdError + 'static,
{
    if matcher::compare(Some(container), Some(target)).is_match() {
        return Some(target);
    }
    let chain = container.downcast_ref::<ErrorChain>()?;
    chain
        .iter()
        .map(|member| matcher::compare(Some(member), Some(target)))
        .any(Comparison::is_match)
        .then_some(target)
}

/// First member, outermost first, matching `specifier`. A container that is
/// not a chain is treated as a chain of one.
pub fn fetch_by_type<'c>(
    container: &'c (dyn StdError + 'static),
    specifier: &Specifier,
) -> Option<&'c (dyn StdError + 'static)> {
    members_of(container).find(|member| matcher::matches_type(Some(*member), specifier))
}

/// Every member matching `specifier`, outermost first.
pub fn fetch_all_by_type<'c>(
    container: &'c (dyn StdError + 'static),
    specifier: &Specifier,
) -> Vec<&'c (dyn StdError + 'static)> {
    members_of(container)
        .filter(|member| matcher::matches_type(Some(*member), specifier))
        .collect()
}

/// Typed form of `fetch_by_type(container, &Specifier::of::<T>())`.
pub fn find<'c, T: StdError + 'static>(container: &'c (dyn StdError + 'static)) -> Option<&'c T> {
    members_of(container).find_map(downcast_concrete::<T>)
}

pub fn find_all<'c, T: StdError + 'static>(container: &'c (dyn StdError + 'static)) -> Vec<&'c T> {
    members_of(container)
        .filter_map(downcast_concrete::<T>)
        .collect()
}

/// First member implementing `I`, as `&I`.
pub fn find_impl<'c, I: Interface + ?Sized>(
    container: &'c (dyn StdError + 'static),
) -> Option<&'c I> {
    members_of(container).find_map(I::cast)
}

fn members_of<'c>(
    container: &'c (dyn StdError + 'static),
) -> impl Iterator<Item = &'c (dyn StdError + 'static)> {
    match container.downcast_ref::<ErrorChain>() {
        Some(chain) => Either::Left(
            chain
                .iter()
                .map(|member| -> &'c (dyn StdError + 'static) { member }),
        ),
        None => Either::Right(std::iter::once(container)),
    }
}

/// Attaches a formatted message to an error. See [`with_message`](fn@crate::with_message).
///
/// ```rust,ignore
/// let err = errchain::with_message!(ERR_TOO_SHORT, "username len is less than 3 chars ({:?})", name);
/// ```
#[macro_export]
macro_rules! with_message {
    ($err:expr, $fmt:literal $($arg:tt)*) => {
        $crate::with_message(
            $err,
            $crate::facade::non_empty_format($fmt, ::core::format_args!($fmt $($arg)*)),
        )
    };
}

/// Wraps two errors and attaches a formatted message. See
/// [`wrap_with_message`](fn@crate::wrap_with_message).
#[macro_export]
macro_rules! wrap_with_message {
    ($err1:expr, $err2:expr, $fmt:literal $($arg:tt)*) => {
        $crate::wrap_with_message(
            $err1,
            $err2,
            $crate::facade::non_empty_format($fmt, ::core::format_args!($fmt $($arg)*)),
        )
    };
}
