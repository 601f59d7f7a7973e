use std::fmt;
use std::sync::Arc;

use backtrace::Backtrace;

use crate::config::CaptureConfig;
use crate::sanitize::{is_capture_frame, is_entry_point, sanitize_filename, sanitize_function_name};

/// One rendered stack frame.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\t{}:{} {}",
            self.file.as_deref().unwrap_or("unknown"),
            self.line.unwrap_or(0),
            self.function
        )
    }
}

/// The call stack at the moment an error chain was created.
///
/// Cloning is cheap and clones share the same (still unresolved) trace.
#[derive(Clone)]
pub struct Snapshot {
    trace: Option<Arc<Backtrace>>,
    depth: usize,
    trimmed_prefixes: Arc<[String]>,
}

impl Snapshot {
    /// Capture using the process-wide configuration.
    pub fn capture() -> Self {
        Self::capture_with(CaptureConfig::process_default())
    }

    pub fn capture_with(config: &CaptureConfig) -> Self {
        if !config.is_enabled() {
            return Self::empty();
        }
        Self {
            trace: Some(Arc::new(Backtrace::new_unresolved())),
            depth: config.depth(),
            trimmed_prefixes: config.trimmed_prefixes().into(),
        }
    }

    /// A snapshot with no frames; renders as an empty string.
    pub fn empty() -> Self {
        Self {
            trace: None,
            depth: 0,
            trimmed_prefixes: Arc::from(Vec::new()),
        }
    }

    pub fn is_captured(&self) -> bool {
        self.trace.is_some()
    }

    /// Resolves symbols and returns the caller's frames, innermost first.
    ///
    /// Frames of the capture machinery are skipped, at most `depth` frames are
    /// returned, and nothing beyond the program's `main` is included.
    pub fn frames(&self) -> Vec<Frame> {
        let Some(trace) = &self.trace else {
            return Vec::new();
        };
        let mut trace = Backtrace::clone(trace);
        trace.resolve();

        let mut frames = Vec::with_capacity(self.depth);
        let mut in_caller = false;
        'outer: for frame in trace.frames() {
            let symbols = frame.symbols();
            if symbols.is_empty() {
                if in_caller {
                    frames.push(Frame {
                        file: None,
                        line: None,
                        function: sanitize_function_name(""),
                    });
                }
                if frames.len() >= self.depth {
                    break;
                }
                continue;
            }
            // inlined calls show up as several symbols for one frame
            for symbol in symbols {
                let raw = symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_default();
                if !in_caller {
                    if is_capture_frame(&raw) {
                        continue;
                    }
                    in_caller = true;
                }
                let file = symbol
                    .filename()
                    .map(|path| path.to_string_lossy().into_owned())
                    .map(|path| sanitize_filename(&path, &self.trimmed_prefixes).to_string());
                frames.push(Frame {
                    file,
                    line: symbol.lineno(),
                    function: sanitize_function_name(&raw),
                });
                if frames.len() >= self.depth || is_entry_point(&raw) {
                    break 'outer;
                }
            }
        }
        frames
    }

    /// One line per frame: `\t<file>:<line> <function>()`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for frame in self.frames() {
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("captured", &self.is_captured())
            .field("depth", &self.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_capture_renders_nothing() {
        let config = CaptureConfig::builder().enabled(false).build();
        let snapshot = Snapshot::capture_with(&config);
        assert!(!snapshot.is_captured());
        assert!(snapshot.frames().is_empty());
        assert_eq!(snapshot.render(), "");
    }

    #[test]
    fn frames_respect_depth() {
        let config = CaptureConfig::builder().enabled(true).with_depth(3).build();
        let snapshot = Snapshot::capture_with(&config);
        assert!(snapshot.is_captured());
        let frames = snapshot.frames();
        assert!(frames.len() <= 3);
        for line in snapshot.render().lines() {
            assert!(line.starts_with('\t'), "{line:?}");
        }
    }

    #[test]
    fn clones_render_identically() {
        let config = CaptureConfig::builder().enabled(true).with_depth(5).build();
        let snapshot = Snapshot::capture_with(&config);
        let copy = snapshot.clone();
        assert_eq!(snapshot.render(), copy.render());
    }

    #[test]
    fn frame_display_uses_placeholders() {
        let frame = Frame {
            file: None,
            line: None,
            function: "unknown".into(),
        };
        assert_eq!(frame.to_string(), "\tunknown:0 unknown");
    }
}
