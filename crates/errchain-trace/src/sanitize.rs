//! Helpers that shorten raw symbol and file names for display.

const REGISTRY_SRC: &str = "/registry/src/";
const RUSTC_SRC: &str = "/rustc/";

/// Crates whose frames belong to the capture machinery rather than to the caller.
const CAPTURE_CRATES: &[&str] = &["backtrace::", "errchain_trace::", "errchain::"];

/// Trims configured prefixes, the cargo registry checkout and the rustc
/// source root from a file name.
///
/// `/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.0/src/de.rs`
/// becomes `serde-1.0.0/src/de.rs`.
pub(crate) fn sanitize_filename<'a>(file: &'a str, prefixes: &[String]) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = file.strip_prefix(prefix.as_str()) {
            return rest;
        }
    }
    if let Some(idx) = file.find(REGISTRY_SRC) {
        let rest = &file[idx + REGISTRY_SRC.len()..];
        // skip the registry index directory
        if let Some(slash) = rest.find('/') {
            return &rest[slash + 1..];
        }
    }
    if let Some(rest) = file.strip_prefix(RUSTC_SRC) {
        // skip the commit hash
        if let Some(slash) = rest.find('/') {
            return &rest[slash + 1..];
        }
    }
    file
}

/// Drops the leading crate segment: `my_app::db::connect` becomes `db::connect()`.
pub(crate) fn sanitize_function_name(name: &str) -> String {
    if name.is_empty() {
        return "unknown".to_string();
    }
    let trimmed = if name.starts_with('<') {
        name
    } else {
        name.split_once("::").map_or(name, |(_, rest)| rest)
    };
    format!("{trimmed}()")
}

pub(crate) fn is_capture_frame(name: &str) -> bool {
    if name.contains("::tests::") {
        return false;
    }
    let name = name.strip_prefix('<').unwrap_or(name);
    CAPTURE_CRATES.iter().any(|krate| name.starts_with(krate))
}

/// `<crate>::main`, the last frame worth showing.
pub(crate) fn is_entry_point(name: &str) -> bool {
    name.ends_with("::main") && name.matches("::").count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_and_rustc_paths_are_shortened() {
        assert_eq!(
            sanitize_filename(
                "/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.0/src/de.rs",
                &[]
            ),
            "serde-1.0.0/src/de.rs"
        );
        assert_eq!(
            sanitize_filename("/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/std/src/rt.rs", &[]),
            "library/std/src/rt.rs"
        );
    }

    #[test]
    fn configured_prefix_wins() {
        let prefixes = vec!["/work/app/".to_string()];
        assert_eq!(sanitize_filename("/work/app/src/main.rs", &prefixes), "src/main.rs");
        assert_eq!(sanitize_filename("/elsewhere/main.rs", &prefixes), "/elsewhere/main.rs");
    }

    #[test]
    fn function_names_lose_crate_path() {
        assert_eq!(sanitize_function_name("my_app::db::connect"), "db::connect()");
        assert_eq!(sanitize_function_name("my_app::main"), "main()");
        assert_eq!(sanitize_function_name("main"), "main()");
        assert_eq!(
            sanitize_function_name("<my_app::Db as core::ops::Drop>::drop"),
            "<my_app::Db as core::ops::Drop>::drop()"
        );
        assert_eq!(sanitize_function_name(""), "unknown");
    }

    #[test]
    fn capture_frames() {
        assert!(is_capture_frame("backtrace::capture::Backtrace::new_unresolved"));
        assert!(is_capture_frame("errchain::chain::ErrorChain::new"));
        assert!(is_capture_frame(
            "<errchain::chain::ErrorChain as core::default::Default>::default"
        ));
        assert!(!is_capture_frame("errchain::facade::tests::wrap_orders_members"));
        assert!(!is_capture_frame("my_app::load"));
        assert!(!is_capture_frame(""));
    }

    #[test]
    fn entry_point() {
        assert!(is_entry_point("my_app::main"));
        assert!(!is_entry_point("my_app::cli::main"));
        assert!(!is_entry_point("my_app::run"));
    }
}
