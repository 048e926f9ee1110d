// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use dashkit_testkit::{AdminFaker, mock_transactions, mock_users, revenue_series};
use dashkit_view::DirectorySink;
use runtime::{Console, ConsoleData, HELP};
use std::env;
use std::io;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "DASHKIT_LOG";
const GENERATE_SEED: u64 = 42;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `dashkit --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let export_dir = config.export_dir()?;
    if options.print_export_dir {
        println!("{}", export_dir.display());
        return Ok(());
    }

    init_logging(&config)?;

    let sink = DirectorySink::open(&export_dir).with_context(|| {
        format!(
            "open export directory {} -- if this path is wrong, set [export].dir in the config",
            export_dir.display()
        )
    })?;

    let data = match options.generate {
        Some(count) => {
            let (users, transactions) = AdminFaker::new(GENERATE_SEED).dataset(count);
            ConsoleData {
                users,
                transactions,
                revenue: revenue_series(),
            }
        }
        None => ConsoleData {
            users: mock_users(),
            transactions: mock_transactions(),
            revenue: revenue_series(),
        },
    };
    info!(
        users = data.users.len(),
        transactions = data.transactions.len(),
        export_dir = %export_dir.display(),
        "dashboard loaded"
    );

    let today = OffsetDateTime::now_utc().date();
    let mut console = Console::new(data, config.page_size(), sink, today)?;
    if options.check_only {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console.run(stdin.lock(), &mut stdout)?;
    info!(
        users = console.users().records().len(),
        transactions = console.transactions().records().len(),
        site_name = %console.settings().site_name,
        last_page = console.state().active_page.label(),
        export_dir = %console.sink().dir().display(),
        "session ended"
    );
    Ok(())
}

/// `DASHKIT_LOG` wins over `[log].filter`; output goes to stderr.
fn init_logging(config: &Config) -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => EnvFilter::try_new(&raw)
            .with_context(|| format!("{LOG_ENV}={raw:?} is not a valid log filter"))?,
        _ => EnvFilter::try_new(config.log_filter())
            .with_context(|| format!("invalid log filter {:?}", config.log_filter()))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_export_dir: bool,
    print_example: bool,
    check_only: bool,
    generate: Option<usize>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_export_dir: false,
        print_example: false,
        check_only: false,
        generate: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-export-dir" => {
                options.print_export_dir = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--generate" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--generate requires a user count"))?;
                let raw = value.as_ref();
                let count = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| {
                        anyhow!("--generate expects a positive user count, got {raw:?}")
                    })?;
                options.generate = Some(count);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("dashkit");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-export-dir       Print resolved export directory");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --generate <n>           Start with n generated users instead of the sample data");
    println!("  --check                  Validate config, export directory and logging, then exit");
    println!("  --help                   Show this help");
    println!();
    println!("{LOG_ENV} overrides [log].filter. Console {HELP}");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/dashkit-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_export_dir: false,
                print_example: false,
                check_only: false,
                generate: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_export_dir);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_generate_count() -> Result<()> {
        let options = parse_cli_args(
            vec!["--generate", "250", "--print-export-dir"],
            default_options_path(),
        )?;
        assert_eq!(options.generate, Some(250));
        assert!(options.print_export_dir);
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_generate_counts() {
        for args in [vec!["--generate"], vec!["--generate", "0"], vec!["--generate", "lots"]] {
            let error = parse_cli_args(args.clone(), default_options_path())
                .expect_err("bad generate count should fail");
            assert!(error.to_string().contains("--generate"), "{args:?}");
        }
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
