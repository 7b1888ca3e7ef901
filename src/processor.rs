//! Build-and-publish orchestration.
//!
//! A run moves linearly through
//! `Init -> EnsureStagingRoot -> BeforeHook -> {Render(i) -> [Publish(i)]}* -> AfterHook -> Done`
//! and aborts on the first error. Nothing is retried and nothing already published is
//! rolled back.

use log::{debug, error};
use std::fmt;
use std::path::PathBuf;

use crate::context::ConfigContext;
use crate::discovery::TemplateRecord;
use crate::error::Result;
use crate::fsutil::ensure_dir;
use crate::hooks::{run_after, run_before, HookScript, HookStage};
use crate::publisher::publish;
use crate::renderer::{render_to_staging, TemplateRenderer};

/// States of a pipeline run, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    EnsureStagingRoot,
    BeforeHook,
    Render(usize),
    Publish(usize),
    AfterHook,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => write!(f, "init"),
            Stage::EnsureStagingRoot => write!(f, "ensure staging root"),
            Stage::BeforeHook => write!(f, "before hook"),
            Stage::Render(i) => write!(f, "render #{}", i + 1),
            Stage::Publish(i) => write!(f, "publish #{}", i + 1),
            Stage::AfterHook => write!(f, "after hook"),
            Stage::Done => write!(f, "done"),
            Stage::Aborted => write!(f, "aborted"),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub rendered: usize,
    pub published: usize,
    pub dry_run: bool,
}

/// Sequences discovery output through rendering, publishing and hooks.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    context: &'a ConfigContext,
    records: &'a [TemplateRecord],
    staging_root: PathBuf,
    live_root: PathBuf,
    before: HookScript,
    after: HookScript,
    dry_run: bool,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        context: &'a ConfigContext,
        records: &'a [TemplateRecord],
        staging_root: impl Into<PathBuf>,
        live_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            context,
            records,
            staging_root: staging_root.into(),
            live_root: live_root.into(),
            before: HookScript::none(HookStage::Before),
            after: HookScript::none(HookStage::After),
            dry_run: false,
        }
    }

    /// Sets the scripts run before and after the pipeline.
    pub fn with_hooks(mut self, before: HookScript, after: HookScript) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Renders only, never touching the live configuration.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Executes the whole pipeline.
    ///
    /// # Errors
    /// Returns the first error raised by any step. Files published before a failing
    /// record stay published.
    pub fn run(&self) -> Result<Summary> {
        let result = self.run_stages();
        if result.is_err() {
            self.enter(Stage::Aborted);
        }
        result
    }

    fn run_stages(&self) -> Result<Summary> {
        let mut summary = Summary {
            dry_run: self.dry_run,
            ..Summary::default()
        };

        self.enter(Stage::Init);
        self.enter(Stage::EnsureStagingRoot);
        ensure_dir(&self.staging_root)?;

        self.enter(Stage::BeforeHook);
        run_before(&self.before)?;

        let total = self.records.len();
        for (i, record) in self.records.iter().enumerate() {
            if let Err(e) = self.process(i, record, &mut summary) {
                error!(
                    "Aborting at template {} of {} ({}), {} file(s) already published",
                    i + 1,
                    total,
                    record.template_path.display(),
                    summary.published
                );
                return Err(e);
            }
        }

        self.enter(Stage::AfterHook);
        run_after(&self.after)?;

        self.enter(Stage::Done);
        Ok(summary)
    }

    fn process(&self, i: usize, record: &TemplateRecord, summary: &mut Summary) -> Result<()> {
        self.enter(Stage::Render(i));
        let staged = render_to_staging(self.renderer, record, &self.staging_root, self.context)?;
        summary.rendered += 1;

        if self.dry_run {
            debug!("Test mode, not publishing {}", staged.display());
            return Ok(());
        }

        self.enter(Stage::Publish(i));
        publish(record, &staged, &self.live_root)?;
        summary.published += 1;
        Ok(())
    }

    fn enter(&self, stage: Stage) {
        debug!("Pipeline stage: {}", stage);
    }
}
