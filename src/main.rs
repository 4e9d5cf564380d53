//! smartgen's application entry point.
//! Parses arguments, opens the output file and hands everything to the generator.

use std::sync::Arc;

use anyhow::Context;
use smartgen::{
    cli::{get_args, Args},
    generator::Generator,
    logger::init_logger,
    renderer::{MiniJinjaRenderer, TemplateRenderer},
    sink::SyncWriter,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the generation config from the config file and flags
/// 2. Compiles the built-in or user-supplied templates
/// 3. Creates (or truncates) the output file
/// 4. Runs the generator and reports a summary
fn run(args: Args) -> anyhow::Result<()> {
    let config = args.generation_config()?;
    let renderer: Arc<dyn TemplateRenderer> = match &args.template_dir {
        Some(dir) => Arc::new(MiniJinjaRenderer::from_dir(dir)?),
        None => Arc::new(MiniJinjaRenderer::new()?),
    };

    let output = args.output_path();
    let sink = SyncWriter::create(&output)
        .with_context(|| format!("failed to create '{}'", output.display()))?;

    let generator = Generator::new(renderer, args.output_settings());
    let summary = generator
        .run(&config, Arc::new(sink))
        .with_context(|| format!("failed to generate '{}'", output.display()))?;

    log::info!(
        "Created {} functions in {} ms ({} bytes) at '{}'",
        summary.jobs,
        summary.elapsed.as_millis(),
        summary.bytes_written,
        output.display()
    );
    Ok(())
}
