use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use kasboek_banks::Converter;
use kasboek_core::{BankProfile, SourceFormat, ZeroSumPolicy};
use std::path::PathBuf;

mod config;
mod paths;

use config::{Config, DEFAULT_CONFIG_FILE};
use paths::FileLayout;

#[derive(Parser, Debug)]
#[command(
    name = "kasboek",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KASBOEK_BUILD_SHA"), ")"),
    about = "Turn bank statement exports into a transactions + income/expenses workbook"
)]
struct Cli {
    /// Config file (default: ./kasboek.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline steps (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one statement into an .xlsx workbook
    Convert {
        /// Bank profile name (see `kasboek banks`)
        #[arg(long)]
        bank: String,

        /// Statement year (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Statement month, used to find <data_dir>/<year>/<month>.<ext>
        #[arg(long)]
        month: Option<String>,

        /// Read this file instead of the data directory layout
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write the workbook here instead of <results_dir>/<year>/
        #[arg(long)]
        output: Option<PathBuf>,

        /// Where groups summing to exactly zero go (default: from config)
        #[arg(long, value_enum)]
        zero_sum: Option<ZeroSumArg>,
    },

    /// List the available bank profiles
    Banks {
        /// Print full profiles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZeroSumArg {
    Exclude,
    Income,
}

impl From<ZeroSumArg> for ZeroSumPolicy {
    fn from(arg: ZeroSumArg) -> Self {
        match arg {
            ZeroSumArg::Exclude => ZeroSumPolicy::Exclude,
            ZeroSumArg::Income => ZeroSumPolicy::Income,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            bank,
            year,
            month,
            input,
            output,
            zero_sum,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let registry = cfg.registry()?;
            let profile = registry.get(&bank)?;
            let zero_sum = zero_sum.map(Into::into).unwrap_or(cfg.aggregate.zero_sum);

            convert(&cfg, profile, year, month, input, output, zero_sum)?;
        }

        Command::Banks { json } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let registry = cfg.registry()?;

            if json {
                let profiles: Vec<_> = registry.iter().collect();
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                for p in registry.iter() {
                    println!("{}", describe_profile(p));
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init { path } => {
                if config::init_config(&path)? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
        },
    }

    Ok(())
}

fn convert(
    cfg: &Config,
    profile: &BankProfile,
    year: Option<i32>,
    month: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    zero_sum: ZeroSumPolicy,
) -> Result<()> {
    let layout = FileLayout::new(&cfg.paths);
    let year = year.unwrap_or_else(|| chrono::Local::now().year());

    let input = match (input, month.as_deref()) {
        (Some(path), _) => path,
        (None, Some(m)) => layout.input_path(year, m, profile.format)?,
        (None, None) => bail!("pass --month <month> or --input <path>"),
    };

    let output = match output {
        Some(path) => path,
        None => layout.output_path(
            year,
            &paths::output_name(&profile.name, month.as_deref(), &input),
        ),
    };

    let converter = Converter::new(profile).with_zero_sum(zero_sum);
    let context = || format!("converting {} with profile {}", input.display(), profile.name);

    // The results directory is only created once there is something to write.
    let (rows, skipped_lines) = converter.load(&input).with_context(context)?;
    let conversion = converter.transform(rows).with_context(context)?;
    paths::ensure_parent(&output)?;
    let report = converter
        .write(&conversion, &input, &output, skipped_lines)
        .with_context(context)?;

    println!("Converted {} ({})", report.input.display(), report.bank);
    println!("  transactions:    {}", report.transactions);
    println!("  income groups:   {}", report.income_groups);
    println!("  expense groups:  {}", report.expense_groups);
    if report.skipped_lines > 0 {
        println!("  skipped lines:   {}", report.skipped_lines);
    }
    println!("Wrote {}", report.output.display());

    Ok(())
}

fn describe_profile(p: &BankProfile) -> String {
    let mut quirks = Vec::new();
    if p.quirks.backfill_names.is_some() {
        quirks.push("backfill-names");
    }
    if p.quirks.derive_amount_sign.is_some() {
        quirks.push("derive-amount-sign");
    }

    let source = match p.format {
        SourceFormat::Csv => format!(
            "csv delimiter={:?} decimal={:?} encoding={} header={}",
            p.delimiter, p.decimal, p.encoding, p.has_header
        ),
        SourceFormat::Pdf => "pdf".to_string(),
    };

    if quirks.is_empty() {
        format!("{:<10} {source}", p.name)
    } else {
        format!("{:<10} {source} [{}]", p.name, quirks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_version_carries_build_id() {
        let cmd = Cli::command();
        let long = cmd.get_long_version().unwrap_or_default();
        assert!(long.starts_with(env!("CARGO_PKG_VERSION")), "got {long}");
        assert!(long.contains(env!("KASBOEK_BUILD_SHA")), "got {long}");
    }

    #[test]
    fn test_convert_args_parse() {
        let cli = Cli::try_parse_from([
            "kasboek", "convert", "--bank", "sns", "--month", "january", "--zero-sum", "income",
        ])
        .unwrap();
        match cli.command {
            Command::Convert { bank, month, zero_sum, .. } => {
                assert_eq!(bank, "sns");
                assert_eq!(month.as_deref(), Some("january"));
                assert!(matches!(zero_sum, Some(ZeroSumArg::Income)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
