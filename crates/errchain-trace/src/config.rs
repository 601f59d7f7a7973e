use lazy_static::lazy_static;

/// Frame limit used when neither the builder nor the environment sets one.
pub const DEFAULT_DEPTH: usize = 16;
/// Upper bound for any configured frame limit.
pub const MAX_DEPTH: usize = 128;

/// `0`, `off` or `false` disables capture.
pub const ENV_TRACE: &str = "ERRCHAIN_TRACE";
pub const ENV_TRACE_DEPTH: &str = "ERRCHAIN_TRACE_DEPTH";

lazy_static! {
    static ref PROCESS_DEFAULT: CaptureConfig = CaptureConfig::from_env();
}

/// Resolved capture settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    enabled: bool,
    depth: usize,
    trimmed_prefixes: Vec<String>,
}

impl CaptureConfig {
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }

    /// Settings derived from the environment only.
    pub fn from_env() -> Self {
        CaptureConfigBuilder::default().build()
    }

    /// The configuration used by [`crate::Snapshot::capture`], computed once per process.
    pub fn process_default() -> &'static CaptureConfig {
        &PROCESS_DEFAULT
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Path prefixes stripped from rendered file names, checked in order.
    pub fn trimmed_prefixes(&self) -> &[String] {
        &self.trimmed_prefixes
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: DEFAULT_DEPTH,
            trimmed_prefixes: Vec::new(),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct CaptureConfigBuilder {
    enabled: Option<bool>,
    depth: Option<usize>,
    trimmed_prefixes: Vec<String>,
}

impl CaptureConfigBuilder {
    /// Explicitly enable or disable capture, overriding `ERRCHAIN_TRACE`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the rendered frame limit, overriding `ERRCHAIN_TRACE_DEPTH`.
    /// Clamped to `1..=MAX_DEPTH`.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Strip `prefix` from rendered file names. The current working directory
    /// is always added after any explicit prefixes.
    pub fn with_trimmed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trimmed_prefixes.push(prefix.into());
        self
    }

    pub fn build(self) -> CaptureConfig {
        let env_enabled = std::env::var(ENV_TRACE).ok();
        let env_depth = std::env::var(ENV_TRACE_DEPTH).ok();

        let mut trimmed_prefixes = self.trimmed_prefixes;
        if let Ok(cwd) = std::env::current_dir() {
            let mut cwd = cwd.to_string_lossy().into_owned();
            if !cwd.ends_with('/') {
                cwd.push('/');
            }
            trimmed_prefixes.push(cwd);
        }

        CaptureConfig {
            enabled: resolve_enabled_from_inputs(env_enabled.as_deref(), self.enabled),
            depth: resolve_depth_from_inputs(env_depth.as_deref(), self.depth),
            trimmed_prefixes,
        }
    }
}

/// Precedence: builder override > env override > enabled.
pub(crate) fn resolve_enabled_from_inputs(env_value: Option<&str>, builder: Option<bool>) -> bool {
    if let Some(enabled) = builder {
        return enabled;
    }
    match env_value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "0" | "off" | "false" | "no"),
        None => true,
    }
}

/// Precedence: builder override > env override > DEFAULT_DEPTH.
/// Unparseable env values are ignored.
pub(crate) fn resolve_depth_from_inputs(env_value: Option<&str>, builder: Option<usize>) -> usize {
    if let Some(n) = builder {
        return n.clamp(1, MAX_DEPTH);
    }
    if let Some(n) = env_value.and_then(|v| v.trim().parse::<usize>().ok()) {
        return n.clamp(1, MAX_DEPTH);
    }
    DEFAULT_DEPTH
}
