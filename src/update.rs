//! The `update` command: discover templates, load the context and run the pipeline.

use log::info;

use crate::cli::UpdateArgs;
use crate::context::ConfigContext;
use crate::discovery::discover_templates;
use crate::error::Result;
use crate::hooks::{HookScript, HookStage};
use crate::processor::{Processor, Summary};
use crate::renderer::MiniJinjaRenderer;

/// Runs one `update` invocation.
///
/// # Flow
/// 1. Discovers the templates under `--templates`
/// 2. Loads the YAML context from `--config`, adding `Env` when `--env` is set
/// 3. Builds the processor and runs it, publishing unless `--test` is set
pub fn run(args: &UpdateArgs) -> Result<Summary> {
    let records = discover_templates(&args.templates)?;
    info!("Found {} template(s) in {}", records.len(), args.templates.display());

    let mut context = ConfigContext::load(&args.config)?;
    if args.env {
        context = context.with_process_env();
    }

    let renderer = MiniJinjaRenderer::new();
    Processor::new(&renderer, &context, &records, &args.temp, &args.root)
        .with_hooks(
            HookScript::new(HookStage::Before, args.before.as_ref()),
            HookScript::new(HookStage::After, args.after.as_ref()),
        )
        .dry_run(args.test)
        .run()
}
