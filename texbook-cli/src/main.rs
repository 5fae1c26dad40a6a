// Command-line interface for texbook
//
// This binary turns a multi-file LaTeX book project into Markdown files for a static-site
// generator, and lets you look at what the parser made of a project along the way.
//
// The core capabilities live in the texbook-babel crate; configuration comes from
// texbook-config. This crate only wires arguments, configuration and output together.
//
// Usage:
//  texbook <main.tex> [--unit <n>] [-o <file>]          - Convert one unit or the index (default)
//  texbook convert <main.tex> [--unit <n>] [-o <file>]  - Same as above (explicit)
//  texbook inspect <main.tex> [<view>]                  - Print a view (defaults to "outline")
//  texbook --list-views                                 - List available views
//
// Extra Parameters:
//
// Settings can be overridden per run using --extra-<parameter-name> <value>.
// Known keys update the loaded configuration (converter, scope-labels, lang, author,
// image-base-url); anything else is handed to the inspect view.
// Example:
//  texbook main.tex --unit 2 --extra-converter fallback

use texbook_cli::views;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::collections::HashMap;
use texbook_babel::ingest::Expansion;
use texbook_babel::publish::{
    prepare, publish, PrepareOptions, PublishArtifact, PublishSpec, PublishTarget,
};
use texbook_babel::{Document, ParseOptions, ProjectParser, RenderOptions, Renderer};
use texbook_config::{ConverterSetting, Loader, TexbookConfig, PROJECT_CONFIG_FILE};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args
                .get(i + 1)
                .map(|next| !next.starts_with('-'))
                .unwrap_or(false);

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("texbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert LaTeX book projects to Markdown")
        .long_about(
            "texbook reads a LaTeX project (a root file pulling in others with \\input,\n\
            \\include or \\subfile) and writes Markdown with front matter for a static site.\n\n\
            Commands:\n  \
            - convert: Render one chapter, appendix or the index page (default command)\n  \
            - inspect: View what the parser extracted (outline, labels, JSON, ...)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override a setting for this run.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            texbook main.tex                          # Index page to stdout\n  \
            texbook main.tex --unit 3 -o ch03.md      # Chapter 3 to a file\n  \
            texbook main.tex --unit B                 # Appendix B\n  \
            texbook inspect main.tex labels           # Label registry",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-views")
                .long("list-views")
                .help("List available inspect views")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a texbook.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v info, -vv debug); RUST_LOG takes precedence")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect what the parser extracted from a project")
                .long_about(
                    "Print one stage of the parse.\n\n\
                    Views:\n  \
                    - outline:        Title, kind and the chapter/appendix sequence (default)\n  \
                    - expanded:       Flattened source after include expansion\n  \
                    - labels:         Label registry\n  \
                    - document-json:  Whole document model as JSON\n  \
                    - metadata-json:  Document metadata as JSON\n\n\
                    Extra Parameters:\n  \
                    --extra-files          List the files read (expanded view)\n  \
                    --extra-warnings false Hide unit warnings (outline view)",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the root .tex file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to print. Defaults to 'outline'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            views::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Render a unit or the index page to Markdown (default command)")
                .long_about(
                    "Parse the project, render every included unit and print one output file.\n\n\
                    Units are chosen by number (3, C) or id (ch03, appC); 'index' (default)\n\
                    selects the book overview page, or the whole text of an article.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    texbook convert main.tex --unit 1\n  \
                    texbook convert main.tex -o index.md\n  \
                    texbook main.tex --unit 2 --extra-converter fallback",
                )
                .arg(
                    Arg::new("input")
                        .help("Path to the root .tex file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("unit")
                        .long("unit")
                        .short('u')
                        .help("Unit number or id, or 'index' (default)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare path as first argument means the default "convert" command
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_count("verbose"));

    if matches.get_flag("list-views") {
        handle_list_views_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(views::DEFAULT_VIEW);
            handle_inspect_command(path, view, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let unit = sub_matches.get_one::<String>("unit").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            for key in extra_params.keys() {
                warn!("ignoring unknown parameter --extra-{key}");
            }
            handle_convert_command(input, unit, output, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_project(path: &str, config: &TexbookConfig) -> (Document, Expansion) {
    ProjectParser::new(path)
        .with_options(ParseOptions::from(config))
        .parse_with_expansion()
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        })
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    view: &str,
    extra_params: &HashMap<String, String>,
    config: &TexbookConfig,
) {
    let (mut document, expansion) = parse_project(path, config);
    prepare(&mut document, &PrepareOptions::from(config));

    let output =
        views::execute_view(&document, &expansion, view, extra_params).unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    unit: Option<&str>,
    output: Option<&str>,
    config: &TexbookConfig,
) {
    let (mut document, _) = parse_project(input, config);
    prepare(&mut document, &PrepareOptions::from(config));

    let renderer = Renderer::new(RenderOptions::from(config));
    match renderer.render_document(&mut document) {
        Ok(count) => debug!(units = count, "rendered"),
        Err(e) => {
            eprintln!("Render error: {e}");
            std::process::exit(1);
        }
    }
    for rendered in document.included_units() {
        for warning in &rendered.warnings {
            eprintln!("warning: {}: {warning}", rendered.id());
        }
    }

    let target = PublishTarget::parse(unit.unwrap_or("index"));
    let mut spec = PublishSpec::new(&document, target)
        .with_fallback_description(config.render.book_description_fallback.clone());
    if let Some(path) = output {
        spec = spec.with_output_path(path);
    }

    match publish(spec) {
        Ok(result) => match result.artifact {
            PublishArtifact::InMemory(text) => print!("{text}"),
            PublishArtifact::File(path) => {
                debug!(path = %path.display(), name = %result.file_name, "wrote output")
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the list-views command
fn handle_list_views_command() {
    println!("Available views:\n");
    for view in views::AVAILABLE_VIEWS {
        println!("  {view}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> TexbookConfig {
    let loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut TexbookConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("converter") {
        config.render.converter = parse_converter_arg(&raw);
    }
    if let Some(raw) = take_override(extra_params, &["scope-labels", "scoped-labels"]) {
        config.render.scope_labels = parse_bool_arg("scope-labels", &raw);
    }
    if let Some(raw) = extra_params.remove("lang") {
        config.metadata.default_lang = raw;
    }
    if let Some(raw) = extra_params.remove("author") {
        config.metadata.default_author = raw;
    }
    if let Some(raw) = take_override(extra_params, &["image-base-url", "base-url"]) {
        config.images.base_url = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_converter_arg(raw: &str) -> ConverterSetting {
    match raw.to_lowercase().as_str() {
        "auto" => ConverterSetting::Auto,
        "pandoc" => ConverterSetting::Pandoc,
        "fallback" => ConverterSetting::Fallback,
        other => {
            eprintln!("Invalid converter '{other}' for --extra-converter (auto, pandoc, fallback)");
            std::process::exit(1);
        }
    }
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let args = strings(&["texbook", "inspect", "main.tex"]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, args);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let args = strings(&[
            "texbook",
            "convert",
            "main.tex",
            "--extra-converter",
            "fallback",
            "--unit",
            "2",
        ]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(
            cleaned,
            strings(&["texbook", "convert", "main.tex", "--unit", "2"])
        );
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("converter"), Some(&"fallback".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flag() {
        let args = strings(&[
            "texbook",
            "inspect",
            "main.tex",
            "--extra-files",
            "--extra-lang",
            "en",
        ]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, strings(&["texbook", "inspect", "main.tex"]));
        assert_eq!(extra.get("files"), Some(&"true".to_string()));
        assert_eq!(extra.get("lang"), Some(&"en".to_string()));
    }

    #[test]
    fn apply_config_overrides_updates_known_keys() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("converter".to_string(), "fallback".to_string());
        extras.insert("scoped-labels".to_string(), "no".to_string());
        extras.insert("author".to_string(), "Ada".to_string());
        extras.insert("files".to_string(), "true".to_string());

        apply_config_overrides(&mut config, &mut extras);

        assert_eq!(config.render.converter, ConverterSetting::Fallback);
        assert!(!config.render.scope_labels);
        assert_eq!(config.metadata.default_author, "Ada");
        assert_eq!(extras.len(), 1);
        assert!(extras.contains_key("files"));
    }

    #[test]
    fn overrides_flow_into_library_options() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("image-base-url".to_string(), "/images/demo".to_string());
        extras.insert("lang".to_string(), "en".to_string());
        apply_config_overrides(&mut config, &mut extras);

        assert_eq!(RenderOptions::from(&config).image_base_url, "/images/demo");
        assert_eq!(ParseOptions::from(&config).default_lang, "en");
    }
}
