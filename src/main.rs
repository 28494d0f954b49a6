use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

mod config;

use config::{Options, TemplateOptions};
use ts2cairo::generator;

fn main() -> Result<()> {
    let matches = config::app().get_matches();
    let options = Options::from_matches(&matches)?;
    init_tracing(options.verbosity);
    run(&options)
}

// Logs go to stderr so that `--print` output stays clean.
fn init_tracing(verbosity: u64) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(options: &Options) -> Result<()> {
    debug!(?options, "resolved options");

    let source = fs::read_to_string(&options.input)
        .with_context(|| format!("Failed to read input file: {}", options.input.display()))?;

    let cairo_code = ts2cairo::convert(&source)
        .with_context(|| format!("Failed to convert {}", options.input.display()))?;

    if options.print {
        println!("{}", cairo_code);
    }

    fs::write(&options.output, &cairo_code)
        .with_context(|| format!("Failed to write output file: {}", options.output.display()))?;
    info!(path = %options.output.display(), bytes = cairo_code.len(), "wrote contract");

    let module = options.module_name();
    if let Some(lib) = &options.lib {
        write_lib(lib, &module)?;
    }
    if let Some(deploy) = &options.deploy {
        write_deploy_script(deploy, &module)?;
    }

    println!(
        "Successfully converted {} to {}",
        options.input.display(),
        options.output.display()
    );
    Ok(())
}

fn render(template: &Path, module: &str) -> Result<String> {
    let template_text = fs::read_to_string(template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;
    Ok(generator::render_template(&template_text, module))
}

fn write_lib(lib: &TemplateOptions, module: &str) -> Result<()> {
    let content = match &lib.template {
        Some(template) => render(template, module)?,
        None => generator::default_lib(module),
    };

    fs::write(&lib.path, content)
        .with_context(|| format!("Failed to write lib file: {}", lib.path.display()))?;
    info!(path = %lib.path.display(), module, "wrote lib.cairo");
    Ok(())
}

fn write_deploy_script(deploy: &TemplateOptions, module: &str) -> Result<()> {
    let template = deploy
        .template
        .as_deref()
        .ok_or_else(|| anyhow!("No deployment script template given"))?;
    let content = render(template, module)?;

    fs::write(&deploy.path, content).with_context(|| {
        format!("Failed to write deployment script: {}", deploy.path.display())
    })?;
    info!(path = %deploy.path.display(), module, "wrote deployment script");
    Ok(())
}
