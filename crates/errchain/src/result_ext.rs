use std::borrow::Cow;

use super::{ErrorChain, Link, Message, Result, facade};

/// Extension trait for `Result` that turns the error side into an
/// [`ErrorChain`] while adding context. `Ok` values pass through untouched,
/// and the closure forms are only evaluated on error.
///
/// Example
/// ```rust,ignore
/// use errchain::ResultExt;
///
/// fn load(path: &Path) -> errchain::Result<String> {
///     std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
/// }
/// ```
pub trait ResultExt<T> {
    /// Attach `message` as the outermost context. An empty message only
    /// normalizes the error into a chain.
    fn context<M>(self, message: M) -> Result<T>
    where
        M: Into<Cow<'static, str>>;

    fn with_context<M, F>(self, message: F) -> Result<T>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;

    /// Wrap the error together with `outer`, typically an application-level
    /// sentinel, so the sentinel becomes the outermost member.
    fn wrap_err<L>(self, outer: L) -> Result<T>
    where
        L: Into<Link>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Link>,
{
    fn context<M>(self, message: M) -> Result<T>
    where
        M: Into<Cow<'static, str>>,
    {
        self.map_err(|err| attach_text(err.into(), message.into()))
    }

    fn with_context<M, F>(self, message: F) -> Result<T>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        self.map_err(|err| attach_text(err.into(), message().into()))
    }

    fn wrap_err<L>(self, outer: L) -> Result<T>
    where
        L: Into<Link>,
    {
        self.map_err(|err| facade::assemble(vec![err.into(), outer.into()]))
    }
}

fn attach_text(link: Link, text: Cow<'static, str>) -> ErrorChain {
    let message = (!text.is_empty()).then(|| Message::new(text));
    facade::attach(link, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    static ERR_LOAD: Message = Message::new_static("failed to load");

    fn io_failure() -> std::result::Result<u32, std::io::Error> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ))
    }

    #[test]
    fn ok_passes_through() {
        let ok: std::result::Result<u32, std::io::Error> = Ok(7);
        assert_eq!(ok.context("unused").expect("ok"), 7);

        let mut called = false;
        let ok: std::result::Result<u32, std::io::Error> = Ok(8);
        let value = ok
            .with_context(|| {
                called = true;
                "unused"
            })
            .expect("ok");
        assert_eq!(value, 8);
        assert!(!called);
    }

    #[test]
    fn context_becomes_outermost() {
        let err = io_failure().context("reading config").unwrap_err();
        assert_eq!(err.render(), "reading config : permission denied");
        assert!(err.find::<std::io::Error>().is_some());
    }

    #[test]
    fn empty_context_only_normalizes() {
        let err = io_failure().context("").unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn context_on_chain_extends_it() {
        let err = io_failure()
            .context("reading config")
            .with_context(|| format!("starting {}", "server"))
            .unwrap_err();
        assert_eq!(err.len(), 3);
        assert_eq!(
            err.render(),
            "starting server : reading config : permission denied"
        );
    }

    #[test]
    fn wrap_err_puts_sentinel_outermost() {
        let err = io_failure().wrap_err(ERR_LOAD.clone()).unwrap_err();
        assert_eq!(err.render(), "failed to load : permission denied");
        assert!(err.fetch(&ERR_LOAD).is_some());
    }
}
