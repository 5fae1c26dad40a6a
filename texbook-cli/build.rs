use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the views from src/views.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &[
    "outline",
    "expanded",
    "labels",
    "document-json",
    "metadata-json",
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let path_arg = |name: &'static str| {
        Arg::new(name)
            .help("Path to the root .tex file")
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };

    let mut cmd = Command::new("texbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert LaTeX book projects to Markdown")
        .arg(
            Arg::new("list-views")
                .long("list-views")
                .help("List available inspect views")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a texbook.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("inspect").arg(path_arg("path")).arg(
                Arg::new("view")
                    .help("View to print")
                    .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                    .index(2)
                    .value_hint(ValueHint::Other),
            ),
        )
        .subcommand(
            Command::new("convert")
                .arg(path_arg("input"))
                .arg(
                    Arg::new("unit")
                        .long("unit")
                        .short('u')
                        .help("Unit number or id, or 'index'")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "texbook", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "texbook", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "texbook", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
