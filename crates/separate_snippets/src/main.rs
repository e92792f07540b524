use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use separate_snippets::{run, SeparateConfig};
use snippet_markers::DEFAULT_PREFIX;
use snippet_normalizer::DEFAULT_REGENERATE_COMMAND;
use snippet_scanner::DuplicatePolicy;

fn cli() -> Command {
    Command::new("separate_snippets")
        .version("0.1.0")
        .about("Extracts [START]/[END] tagged regions into standalone snippet files")
        .arg(
            Arg::new("root")
                .long("root")
                .num_args(1)
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory to scan for source files"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .num_args(1)
                .default_value("snippets")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output root; relative paths are resolved against --root"),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .num_args(1)
                .default_value("js")
                .help("Source file extension, without the dot"),
        )
        .arg(
            Arg::new("default_prefix")
                .long("default-prefix")
                .num_args(1)
                .default_value(DEFAULT_PREFIX)
                .help("Prefix for files without a [SNIPPETS_PREFIX] marker"),
        )
        .arg(
            Arg::new("on_duplicate")
                .long("on-duplicate")
                .num_args(1)
                .default_value("reject")
                .value_parser(["reject", "overwrite"])
                .help("What to do when a file defines the same snippet twice"),
        )
        .arg(
            Arg::new("regenerate_command")
                .long("regenerate-command")
                .num_args(1)
                .default_value(DEFAULT_REGENERATE_COMMAND)
                .help("Command named in the generated file header"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .help("Scan and report without writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

fn config_from_args() -> Result<SeparateConfig> {
    let matches = cli().get_matches();

    let string_arg = |id: &str| -> String {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_default()
    };
    let duplicate_policy: DuplicatePolicy = string_arg("on_duplicate")
        .parse()
        .map_err(anyhow::Error::msg)?;

    Ok(SeparateConfig {
        root: matches
            .get_one::<PathBuf>("root")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        output_root: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("snippets")),
        extension: string_arg("ext"),
        default_prefix: string_arg("default_prefix"),
        duplicate_policy,
        regenerate_command: string_arg("regenerate_command"),
        dry_run: matches.get_flag("dry_run"),
        verbose: matches.get_flag("verbose"),
    })
}

fn main() -> Result<()> {
    let config = config_from_args()?;

    let level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::debug!("{:?}", config);

    let summary = run(&config)?;

    println!("--------------------------------------------------");
    println!("{}", summary);
    if config.dry_run {
        println!("Dry run: no files were written.");
    }
    Ok(())
}
