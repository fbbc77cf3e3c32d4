//! Diagnostic probe for the host's shutdown-notification file.
//!
//! Some hosts announce an imminent shutdown by creating a file whose path is published in an environment variable.
//! The probe only reports on that file for log enrichment; it never affects control flow.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

/// Environment variable consulted by [`EnvShutdownProbe::default`].
pub const DEFAULT_SHUTDOWN_FILE_VAR: &str = "WEBJOBS_SHUTDOWN_FILE";

/// Snapshot of the shutdown file state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownFileInfo {
    /// Configured path, `None` when the variable is unset or empty.
    pub path: Option<PathBuf>,
    pub exists: bool,
}

impl ShutdownFileInfo {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<PathBuf>, exists: bool) -> Self {
        Self {
            path: Some(path.into()),
            exists,
        }
    }
}

impl fmt::Display for ShutdownFileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.as_deref().map(Path::display);
        match path {
            Some(p) => write!(f, "File:{p};File exists:{}", self.exists),
            None => write!(f, "File:;File exists:{}", self.exists),
        }
    }
}

/// Read-only source of [`ShutdownFileInfo`].
pub trait ShutdownProbe: Send + Sync + 'static {
    fn probe(&self) -> ShutdownFileInfo;
}

/// Probe backed by an environment variable and the real filesystem.
#[derive(Debug, Clone)]
pub struct EnvShutdownProbe {
    var: OsString,
}

impl EnvShutdownProbe {
    pub fn new(var: impl Into<OsString>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvShutdownProbe {
    fn default() -> Self {
        Self::new(DEFAULT_SHUTDOWN_FILE_VAR)
    }
}

impl ShutdownProbe for EnvShutdownProbe {
    fn probe(&self) -> ShutdownFileInfo {
        match std::env::var_os(&self.var).filter(|v| !v.is_empty()) {
            Some(raw) => {
                let path = PathBuf::from(raw);
                let exists = path.is_file();
                ShutdownFileInfo::at(path, exists)
            }
            None => ShutdownFileInfo::unset(),
        }
    }
}

/// Probe that always reports the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe(pub ShutdownFileInfo);

impl ShutdownProbe for FixedProbe {
    fn probe(&self) -> ShutdownFileInfo {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unset() {
        assert_eq!(ShutdownFileInfo::unset().to_string(), "File:;File exists:false");
    }

    #[test]
    fn display_set() {
        let info = ShutdownFileInfo::at("/tmp/shutdown", true);
        assert_eq!(info.to_string(), "File:/tmp/shutdown;File exists:true");
    }

    #[test]
    fn unset_variable_reports_nothing() {
        let probe = EnvShutdownProbe::new("QLOAD_TEST_SHUTDOWN_FILE_NEVER_SET");
        assert_eq!(probe.probe(), ShutdownFileInfo::unset());
    }

    #[test]
    fn env_probe_follows_file() {
        let var = "QLOAD_TEST_SHUTDOWN_FILE_PROBE";
        let path = std::env::temp_dir().join(format!("qload-shutdown-{}", std::process::id()));
        let _ = std::fs::remove_file(&path);

        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(var, &path) };
        let probe = EnvShutdownProbe::new(var);

        assert_eq!(probe.probe(), ShutdownFileInfo::at(&path, false));

        std::fs::write(&path, b"").unwrap();
        assert_eq!(probe.probe(), ShutdownFileInfo::at(&path, true));

        std::fs::remove_file(&path).unwrap();
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn fixed_probe_is_stable() {
        let probe = FixedProbe(ShutdownFileInfo::at("/x", true));
        assert_eq!(probe.probe(), probe.probe());
    }
}
