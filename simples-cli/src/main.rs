use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use simples_cli::report::{self, Outcome};
use simples_cli::{logging, utils::parse_decimal};
use simples_core::calculations::common::MONTHS_PER_YEAR;
use simples_core::{CalculationInput, RegimeSelector, TaxTables};
use simples_data::{TaxTablesLoader, load_inputs_from_file};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Net monthly income under the better of two simplified-tax regimes.
///
/// Splits income between a salary (social security and income tax) and
/// entity revenue (gross-receipts tax), evaluates Attachment 3 and
/// Attachment 5, and reports whichever leaves more.
#[derive(Debug, Parser)]
#[command(name = "simples", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML file with alternate tax tables. Built-in tables when omitted.
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Print every intermediate figure for both regimes.
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log calculation steps to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate a single case from flags.
    Calculate(CalculateArgs),

    /// Calculate every row of a CSV file.
    Batch {
        /// CSV with monthly_income, trailing_12mo_income and optional
        /// is_export, dependents, fixed_personal_income columns.
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Gross monthly income, e.g. `5,000.00`.
    #[arg(long, value_parser = parse_decimal)]
    monthly_income: Decimal,

    /// Revenue over the last twelve months. Defaults to 12 × monthly income.
    #[arg(long, value_parser = parse_decimal)]
    trailing_income: Option<Decimal>,

    /// The service is rendered to a foreign client.
    #[arg(long, default_value_t = false)]
    export: bool,

    #[arg(long, default_value_t = 0)]
    dependents: u32,

    /// Fixed salary. Each regime's default rule applies when omitted.
    #[arg(long, value_parser = parse_decimal)]
    personal_income: Option<Decimal>,
}

impl CalculateArgs {
    fn into_input(self) -> Result<CalculationInput> {
        let trailing = match self.trailing_income {
            Some(trailing) => trailing,
            None => self
                .monthly_income
                .checked_mul(MONTHS_PER_YEAR)
                .with_context(|| {
                    format!(
                        "Monthly income {} is too large to project a year; pass --trailing-income",
                        self.monthly_income
                    )
                })?,
        };
        Ok(CalculationInput {
            monthly_income: self.monthly_income,
            trailing_12mo_income: trailing,
            is_export: self.export,
            dependents: self.dependents,
            fixed_personal_income: self.personal_income,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let tables = match &cli.tables {
        Some(path) => TaxTablesLoader::load_file(path)
            .with_context(|| format!("Failed to load tax tables: {}", path.display()))?,
        None => TaxTables::default(),
    };
    let selector = RegimeSelector::new(&tables).context("Tax tables are invalid")?;

    let inputs = match cli.command {
        Command::Calculate(args) => vec![args.into_input()?],
        Command::Batch { file } => load_inputs_from_file(&file)
            .with_context(|| format!("Failed to load inputs: {}", file.display()))?,
    };
    debug!(count = inputs.len(), "calculating");

    let mut outcomes = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let (result, trace) = selector
            .select_traced(input)
            .with_context(|| format!("Calculation {} failed", index + 1))?;
        info!(
            net_monthly_income = %result.net_monthly_income,
            winning_regime = result.winning_regime.as_str(),
            "calculated"
        );
        outcomes.push(Outcome { result, trace });
    }

    let rendered = match cli.format {
        OutputFormat::Text => report::render_text(&outcomes, cli.trace),
        OutputFormat::Json => {
            report::render_json(&outcomes, cli.trace).context("Failed to serialize results")?
        }
    };
    print!("{rendered}");
    if cli.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn calculate_defaults_trailing_income_to_a_year() {
        let cli = Cli::parse_from(["simples", "calculate", "--monthly-income", "5,000"]);

        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(
            args.into_input().unwrap(),
            CalculationInput::new(dec!(5000), dec!(60000))
        );
    }

    #[test]
    fn calculate_reads_every_flag() {
        let cli = Cli::parse_from([
            "simples",
            "calculate",
            "--monthly-income",
            "12000",
            "--trailing-income",
            "150000",
            "--export",
            "--dependents",
            "2",
            "--personal-income",
            "3000",
            "--trace",
            "--format",
            "json",
        ]);

        assert!(cli.trace);
        assert_eq!(cli.format, OutputFormat::Json);
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(
            args.into_input().unwrap(),
            CalculationInput::new(dec!(12000), dec!(150000))
                .with_export(true)
                .with_dependents(2)
                .with_personal_income(dec!(3000))
        );
    }

    #[test]
    fn huge_monthly_income_without_trailing_income_is_an_error() {
        let cli = Cli::parse_from([
            "simples",
            "calculate",
            "--monthly-income",
            "79228162514264337593543950335",
        ]);

        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        let err = args.into_input().unwrap_err();

        assert!(err.to_string().contains("--trailing-income"), "{err}");
    }

    #[test]
    fn huge_monthly_income_with_trailing_income_is_accepted() {
        let cli = Cli::parse_from([
            "simples",
            "calculate",
            "--monthly-income",
            "79228162514264337593543950335",
            "--trailing-income",
            "60000",
        ]);

        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };

        assert_eq!(args.into_input().unwrap().trailing_12mo_income, dec!(60000));
    }

    #[test]
    fn negative_dependents_are_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "simples",
            "calculate",
            "--monthly-income",
            "5000",
            "--dependents",
            "-1",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn batch_takes_a_file_and_table_override() {
        let cli = Cli::parse_from(["simples", "batch", "inputs.csv", "--tables", "t.toml"]);

        assert_eq!(cli.tables, Some(PathBuf::from("t.toml")));
        assert!(matches!(
            cli.command,
            Command::Batch { file } if file == PathBuf::from("inputs.csv")
        ));
    }
}
