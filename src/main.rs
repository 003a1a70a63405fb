use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;

use resmon::error::{EXIT_BAD_PARAMETERS, EXIT_FAILURE};
use resmon::MonitorError;

fn build_cli() -> Command {
    Command::new("resmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simple resource monitor (load, memory, disks, files) with e-mail alerts")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG_FILE")
                .help("Configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the alert instead of sending it; the digest file is not updated")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    resmon::init_logging();

    let mut cli = build_cli();
    // clap exits with 0 for --help/--version and 2 for usage errors
    let matches = cli.try_get_matches_from_mut(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let Some(config_path) = matches.get_one::<PathBuf>("config") else {
        let _ = cli.print_help();
        println!();
        process::exit(EXIT_BAD_PARAMETERS);
    };

    if let Err(err) = resmon::commands::check(config_path, matches.get_flag("dry-run")) {
        let code = err
            .downcast_ref::<MonitorError>()
            .map_or(EXIT_FAILURE, MonitorError::exit_code);
        eprintln!("resmon: {:#}", err);
        log::debug!("Exiting with code {}", code);
        process::exit(code);
    }
}
