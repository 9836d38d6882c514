// Command-line interface for docspan
//
// Reads a source document, runs the configured pipeline over it and prints the
// resulting annotated document as JSON.
//
// The source format is auto-detected from the file extension and can be
// overridden with --from.
// Usage:
//  docspan <input> [--from <format>] [--raw] [--output <file>]          - Convert (default)
//  docspan convert <input> [--from <format>] [--raw] [--output <file>]  - Same as above (explicit)
//  docspan formats                                                      - List source formats
//
// Configuration is read from the embedded defaults, then ./docspan.toml if it
// exists, then the file given with --config.

use clap::{Arg, ArgAction, Command, ValueHint};
use docspan_config::{DocspanConfig, Loader};
use std::fs;

fn build_cli() -> Command {
    Command::new("docspan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert structured documents into annotated text")
        .long_about(
            "docspan flattens a document into one text buffer plus typed, attributed\n\
            spans over it, and prints the result as JSON.\n\n\
            Examples:\n  \
            docspan notes.md                       # Canonical annotations for a markdown file\n  \
            docspan notes.md --raw                 # Keep placeholders and parse-token markers\n  \
            docspan dump.json --from tokens        # Read a markdown-it token dump\n  \
            docspan notes.md -o notes.spans.json   # Write to a file",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a docspan.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a document to annotated text (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Keep placeholder units and parse-token markers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("formats").about("List available source formats"))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "convert".
            if args.len() > 1
                && !args[1].starts_with('-')
                && args[1] != "convert"
                && args[1] != "formats"
                && args[1] != "help"
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                eprintln!("Error: an input file is required");
                std::process::exit(1);
            };
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let raw = sub_matches.get_flag("raw");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, from, raw, output, &config);
        }
        Some(("formats", _)) => {
            handle_formats_command(&config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn handle_convert_command(
    input: &str,
    from: Option<&str>,
    raw: bool,
    output: Option<&str>,
    config: &DocspanConfig,
) {
    let registry = config.registry();

    let from = match from {
        Some(name) => name.to_string(),
        None => match registry.detect_format_from_filename(input) {
            Some(detected) => detected,
            None => {
                eprintln!("Error: Could not detect format from filename '{input}'");
                eprintln!("Please specify --from explicitly");
                std::process::exit(1);
            }
        },
    };

    let format = registry.get(&from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let mut pipeline = config.pipeline();
    if raw {
        pipeline = pipeline.raw();
    }
    let doc = pipeline.run_source(format, &source).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let json = serde_json::to_string_pretty(&doc).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{json}"),
    }
}

fn handle_formats_command(config: &DocspanConfig) {
    let registry = config.registry();
    for name in registry.list_formats() {
        match registry.get(&name) {
            Ok(format) => println!(
                "  {name:<10} {} (.{})",
                format.description(),
                format.file_extensions().join(", .")
            ),
            Err(_) => println!("  {name}"),
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DocspanConfig {
    let loader = Loader::new().with_optional_file("docspan.toml");
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
