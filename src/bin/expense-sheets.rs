use bigdecimal::BigDecimal;
use clap::Parser;
use expense_sheets::{
    formats::{expensify::EXPENSIFY_CATEGORIES, CellCsvWriter, ExpensifyCsv, NumberLocale},
    ExpenseReporter, ReportConfig, ReportError, ReportResult,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AFTER_HELP: &str = "\
Expensify setup:
  1. Under Settings > Preferences set the default currency. Expensify converts
     foreign transactions into it; pass the same code with -c.
  2. Set the Cash Conversion Surcharge to 0 and use -u instead, so the charge is
     broken out into the Other column.
  3. Categories must match one of the names below exactly.";

/// Fill expense report sheets from an Expensify CSV export
#[derive(Parser, Debug)]
#[command(name = "expense-sheets", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Locale the export's amounts are written in
    #[arg(short = 'l', long, default_value = "en_US")]
    locale: String,

    /// Home currency, 3-letter code
    #[arg(short = 'c', long, default_value = "USD")]
    currency: String,

    /// Card surcharge on foreign transactions, in percent (e.g. 4.5)
    #[arg(short = 'u', long, default_value = "0")]
    uplift: BigDecimal,

    /// Output file stem; pages are written to <stem>-1.csv, <stem>-2.csv, ...
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Business purpose written on every sheet
    #[arg(long, default_value = "Sales")]
    purpose: String,

    /// Department written on every sheet
    #[arg(long, default_value = "Sales")]
    department: String,

    /// List the accepted Expensify categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Your name, e.g. "John Hancock"
    #[arg(required_unless_present = "list_categories")]
    name: Option<String>,

    /// Expensify export in .csv format
    #[arg(required_unless_present = "list_categories")]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_sheets=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    if cli.list_categories {
        for (name, category) in EXPENSIFY_CATEGORIES {
            println!("{:<40} {}", name, category);
        }
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ReportResult<()> {
    let (Some(name), Some(export)) = (cli.name, cli.export) else {
        return Err(ReportError::Validation(
            "a name and an export file are required".to_string(),
        ));
    };

    if export.extension().and_then(|ext| ext.to_str()) != Some("csv") {
        return Err(ReportError::Validation(format!(
            "export file must end in .csv: {}",
            export.display()
        )));
    }

    let locale: NumberLocale = cli.locale.parse()?;
    let stem = cli.output.unwrap_or_else(|| export.with_extension(""));

    let config = ReportConfig::new(name)
        .with_home_currency(cli.currency)
        .with_uplift_percent(cli.uplift)
        .with_business_purpose(cli.purpose)
        .with_department(cli.department);

    let mut source = ExpensifyCsv::open(&export, locale)?;
    let mut reporter = ExpenseReporter::new(config, CellCsvWriter::new(stem));
    reporter.run_source(&mut source)?;

    for path in reporter.sink().written() {
        info!("Saved {}", path.display());
    }
    Ok(())
}
