use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{App, Arg, ArgMatches};

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOptions {
    pub template: Option<PathBuf>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lib: Option<TemplateOptions>,
    pub deploy: Option<TemplateOptions>,
    pub print: bool,
    pub verbosity: u64,
}

pub fn app() -> App<'static, 'static> {
    App::new("ts2cairo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts a TypeScript contract class to a Cairo StarkNet contract")
        .arg(
            Arg::with_name("INPUT")
                .help("Input TypeScript file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Output Cairo file (defaults to the input path with a .cairo extension)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("lib-template")
                .long("lib-template")
                .value_name("FILE")
                .help("lib.cairo template; {{Caironame}} is replaced by the module name")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("lib-output")
                .long("lib-output")
                .value_name("FILE")
                .help("Where to write lib.cairo (defaults to lib.cairo next to the output)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("deploy-template")
                .long("deploy-template")
                .value_name("FILE")
                .help("Deployment script template; {{Caironame}} is replaced by the module name")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("deploy-output")
                .long("deploy-output")
                .value_name("FILE")
                .help("Where to write the deployment script (defaults to deploy.ts next to the template)")
                .takes_value(true)
                .requires("deploy-template"),
        )
        .arg(
            Arg::with_name("print")
                .long("print")
                .help("Also print the generated contract to stdout"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase log verbosity (RUST_LOG overrides)"),
        )
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Options> {
        let input = matches
            .value_of("INPUT")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("No input file given"))?;

        let output = matches
            .value_of("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| input.with_extension("cairo"));

        let template = matches.value_of("lib-template").map(PathBuf::from);
        let lib_path = matches.value_of("lib-output").map(PathBuf::from);
        let lib = match (template, lib_path) {
            (None, None) => None,
            (template, Some(path)) => Some(TemplateOptions { template, path }),
            (Some(template), None) => Some(TemplateOptions {
                template: Some(template),
                path: sibling(&output, "lib.cairo"),
            }),
        };

        let deploy = matches
            .value_of("deploy-template")
            .map(PathBuf::from)
            .map(|template| {
                let path = matches
                    .value_of("deploy-output")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| sibling(&template, "deploy.ts"));
                TemplateOptions {
                    template: Some(template),
                    path,
                }
            });

        Ok(Options {
            input,
            output,
            lib,
            deploy,
            print: matches.is_present("print"),
            verbosity: matches.occurrences_of("verbose"),
        })
    }

    pub fn module_name(&self) -> String {
        self.output
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contract".to_string())
    }
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
