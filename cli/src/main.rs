mod logging;
mod output;

use std::fs;
use std::path::{Path, PathBuf};

use angl_core::{
    AnglResult, CompileOptions, GlobalRegistry, Script, build_scope_tree, compile_document, config::ConfigError,
    error::ErrorKind,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};

use output::Reporter;

fn main() {
    let cli = Command::new("anglc")
        .version("0.1.0")
        .about("Lower scope-annotated Angl trees to JavaScript modules")
        .arg(
            Arg::new("verbose")
                .help("Log debug output to stderr when ANGL_LOG/RUST_LOG are unset")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue),
        );

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    logging::init_logging(matches.get_flag("verbose"));
    std::process::exit(dispatch_commands(&matches));
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    let globals_arg = Arg::new("globals")
        .help("JSON object of global names replacing the built-in registry")
        .long("globals")
        .value_parser(clap::value_parser!(PathBuf))
        .value_name("FILE");

    cli.subcommand_required(true)
        .subcommand(
            Command::new("build")
                .about("Compile annotated tree documents to JavaScript")
                .arg(
                    Arg::new("inputs")
                        .help("Tree documents to compile; glob patterns are expanded")
                        .required(true)
                        .num_args(1..)
                        .value_name("INPUT"),
                )
                .arg(
                    Arg::new("output")
                        .help("Write the result to this file (single input only)")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_name("FILE")
                        .conflicts_with("out-dir"),
                )
                .arg(
                    Arg::new("out-dir")
                        .help("Write one <stem>.js per input into this directory")
                        .long("out-dir")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("config")
                        .help("Compile options (JSON)")
                        .long("config")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_name("FILE"),
                )
                .arg(globals_arg.clone())
                .arg(
                    Arg::new("global")
                        .help("Extra global name, in addition to the registry")
                        .short('g')
                        .long("global")
                        .action(ArgAction::Append)
                        .value_name("NAME"),
                )
                .arg(
                    Arg::new("dump")
                        .help("Print an intermediate stage to stdout before compiling")
                        .short('d')
                        .long("dump")
                        .value_parser(["scopes", "tree"])
                        .value_name("STAGE"),
                ),
        )
        .subcommand(
            Command::new("globals")
                .about("List the names in the global registry")
                .arg(globals_arg),
        )
}

/// Dispatches the command based on the parsed arguments and returns the
/// process exit code.
fn dispatch_commands(matches: &ArgMatches) -> i32 {
    let reporter = Reporter::new();
    let result = match matches.subcommand() {
        Some(("build", sub_m)) => run_build(sub_m, &reporter),
        Some(("globals", sub_m)) => run_globals(sub_m),
        _ => {
            reporter.error("No valid subcommand was used. Use --help for more information.");
            return 2;
        }
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            reporter.failure("anglc", e.as_ref());
            1
        }
    }
}

fn load_registry(sub_m: &ArgMatches) -> AnglResult<GlobalRegistry> {
    match sub_m.get_one::<PathBuf>("globals") {
        Some(path) => GlobalRegistry::load_from_file(path),
        None => Ok(GlobalRegistry::builtin().clone()),
    }
}

fn run_globals(sub_m: &ArgMatches) -> AnglResult<i32> {
    let registry = load_registry(sub_m)?;
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(0)
}

/// Expand each input: patterns with glob metacharacters through `glob`,
/// plain paths as given.
fn expand_inputs(inputs: &[String]) -> AnglResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(input));
            continue;
        }
        let entries = glob::glob(input).map_err(|e| {
            ConfigError::boxed(ErrorKind::Config, format!("bad pattern {}: {}", input, e), "anglc.expand_inputs")
        })?;
        let before = paths.len();
        for entry in entries.flatten() {
            paths.push(entry);
        }
        if paths.len() == before {
            return Err(ConfigError::boxed(
                ErrorKind::Io,
                format!("pattern {} matched no files", input),
                "anglc.expand_inputs",
            ));
        }
    }
    Ok(paths)
}

fn write_output(path: &Path, code: &str) -> AnglResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::boxed(ErrorKind::Io, format!("create {}: {}", parent.display(), e), "anglc.write_output")
            })?;
        }
    }
    fs::write(path, code).map_err(|e| {
        ConfigError::boxed(ErrorKind::Io, format!("write {}: {}", path.display(), e), "anglc.write_output")
    })
}

fn run_build(sub_m: &ArgMatches, reporter: &Reporter) -> AnglResult<i32> {
    let inputs: Vec<String> = sub_m.get_many::<String>("inputs").into_iter().flatten().cloned().collect();
    let paths = expand_inputs(&inputs)?;

    let mut options = match sub_m.get_one::<PathBuf>("config") {
        Some(path) => CompileOptions::load_from_file(path)?,
        None => CompileOptions::default(),
    };
    options.extra_globals.extend(sub_m.get_many::<String>("global").into_iter().flatten().cloned());
    let registry = load_registry(sub_m)?;

    let output = sub_m.get_one::<PathBuf>("output");
    let out_dir = sub_m.get_one::<PathBuf>("out-dir");
    if output.is_some() && paths.len() > 1 {
        return Err(ConfigError::boxed(
            ErrorKind::Config,
            "--output takes a single input; use --out-dir for several".to_string(),
            "anglc.run_build",
        ));
    }
    let dump = sub_m.get_one::<String>("dump").map(String::as_str);
    debug!("building {} inputs", paths.len());

    let progress = (paths.len() > 1).then(|| output::build_progress(paths.len()));
    let mut failures = 0;
    for path in paths.iter() {
        if let Some(bar) = &progress {
            bar.set_message(path.display().to_string());
        }
        let result = build_one(path, &registry, &options, dump).and_then(|(script, code)| {
            match (output, out_dir) {
                (Some(file), _) => write_output(file, &code)?,
                (None, Some(dir)) => write_output(&dir.join(script.output_name()), &code)?,
                (None, None) if paths.len() == 1 => println!("{}", code),
                (None, None) => {
                    let target = path.with_file_name(script.output_name());
                    write_output(&target, &code)?;
                }
            }
            Ok(())
        });
        if let Err(e) = result {
            failures += 1;
            if let Some(bar) = &progress {
                bar.suspend(|| reporter.failure(&path.display().to_string(), e.as_ref()));
            } else {
                reporter.failure(&path.display().to_string(), e.as_ref());
            }
        }
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    info!("{} of {} units compiled", paths.len() - failures, paths.len());
    if failures > 0 {
        reporter.error(&format!("{} of {} units failed", failures, paths.len()));
        Ok(1)
    } else {
        if paths.len() > 1 {
            reporter.success(&format!("compiled {} units", paths.len()));
        }
        Ok(0)
    }
}

fn build_one(
    path: &Path,
    registry: &GlobalRegistry,
    options: &CompileOptions,
    dump: Option<&str>,
) -> AnglResult<(Script, String)> {
    let script = Script::new(path.to_path_buf())?;
    let doc = script.parse_document()?;
    match dump {
        Some("tree") => {
            let pretty = serde_json::to_string_pretty(&doc).map_err(|e| {
                ConfigError::boxed(ErrorKind::Io, format!("serialize tree: {}", e), "anglc.build_one")
            })?;
            println!("{}", pretty);
        }
        Some("scopes") => {
            let tree = build_scope_tree(&doc, registry, options)?;
            println!("{}", output::scope_table(&tree));
        }
        _ => {}
    }
    let code = compile_document(&doc, registry, options)?;
    Ok((script, code))
}
