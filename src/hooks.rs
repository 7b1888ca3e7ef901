//! Before and after hook scripts.
//! A hook is an optional executable run with no arguments around the build-and-publish
//! pipeline. Its output is captured and logged; a failure aborts the run.

use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// When a hook runs relative to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Before,
    After,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::Before => write!(f, "before"),
            HookStage::After => write!(f, "after"),
        }
    }
}

/// An optional hook script for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookScript {
    pub stage: HookStage,
    pub path: Option<PathBuf>,
}

impl HookScript {
    /// Builds a hook from a possibly empty path argument.
    pub fn new<P: AsRef<Path>>(stage: HookStage, path: Option<P>) -> Self {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .filter(|p| !p.as_os_str().is_empty());
        Self { stage, path }
    }

    /// A hook without a script.
    pub fn none(stage: HookStage) -> Self {
        Self { stage, path: None }
    }

    /// True when a script path is set and points at an existing file.
    pub fn is_configured(&self) -> bool {
        self.path.as_deref().is_some_and(Path::is_file)
    }

    /// Runs the script, if configured, and waits for it to finish.
    ///
    /// Hooks without a path or pointing at a missing file are skipped silently.
    /// There is no timeout: a hung script blocks the caller.
    ///
    /// # Errors
    /// * `Error::HookError` if the script cannot be launched or exits unsuccessfully
    pub fn run(&self) -> Result<()> {
        let Some(script) = self.path.as_deref().filter(|_| self.is_configured()) else {
            debug!("No {} hook to run", self.stage);
            return Ok(());
        };

        info!("Running {} hook: {}", self.stage, script.display());
        let hook_error = |reason: String| Error::HookError {
            stage: self.stage,
            script: script.display().to_string(),
            reason,
        };

        // A bare file name would otherwise be looked up on PATH.
        let program = if script.is_relative() {
            Path::new(".").join(script)
        } else {
            script.to_path_buf()
        };
        let output = Command::new(program)
            .output()
            .map_err(|e| hook_error(format!("unable to launch: {}", e)))?;

        self.log_output(&output);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let reason = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {}", output.status, stderr)
            };
            return Err(hook_error(reason));
        }

        Ok(())
    }

    fn log_output(&self, output: &Output) {
        for stream in [&output.stdout, &output.stderr] {
            for line in String::from_utf8_lossy(stream).lines().filter(|l| !l.trim().is_empty()) {
                info!("[{} hook] {}", self.stage, line);
            }
        }
    }
}

/// Runs the hook that precedes the pipeline.
pub fn run_before(hook: &HookScript) -> Result<()> {
    debug_assert_eq!(hook.stage, HookStage::Before);
    hook.run()
}

/// Runs the hook that follows the pipeline.
pub fn run_after(hook: &HookScript) -> Result<()> {
    debug_assert_eq!(hook.stage, HookStage::After);
    hook.run()
}
