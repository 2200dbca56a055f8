use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::ConfigArgs;
use core_types::{Account, AccountType, Order, OrderSide, PositionEffect};
use environment::SimulatedEnvironment;
use events::FundsRejection;
use risk::{FundsValidator, RecordingSink, RejectionSink, TracingSink, ValidatorChain};
use rust_decimal::Decimal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Tollgate pre-trade gate.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Instruments(args) => handle_instruments(args).map(|()| ExitCode::SUCCESS),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        ExitCode::from(2)
    })
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Pre-trade funds and margin gate for stock and futures accounts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an account can cover a single order.
    Check(CheckArgs),
    /// List the instruments in the configured registry.
    Instruments(InstrumentsArgs),
}

#[derive(Parser)]
struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Account kind (e.g., "STOCK", "FUTURE"). Unknown kinds are admitted unchecked.
    #[arg(long, required_unless_present = "no_account")]
    account_type: Option<AccountType>,

    /// Cash currently available in the account.
    #[arg(long, required_unless_present = "no_account")]
    cash: Option<Decimal>,

    /// Evaluate as if the order had not been resolved to an account yet.
    #[arg(long, conflicts_with_all = ["account_type", "cash"])]
    no_account: bool,

    /// The instrument to trade (e.g., "000001.XSHE", "IF2406").
    #[arg(long)]
    instrument: String,

    /// "BUY" or "SELL".
    #[arg(long)]
    side: OrderSide,

    /// "OPEN", "CLOSE" or "CLOSE_TODAY". Only futures accounts look at it.
    #[arg(long, default_value = "OPEN")]
    effect: PositionEffect,

    /// Price at which funds are reserved.
    #[arg(long)]
    price: Decimal,

    #[arg(long)]
    quantity: Decimal,

    /// Ask whether the order may be cancelled instead of submitted.
    #[arg(long)]
    cancel: bool,

    /// Print the verdict as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct InstrumentsArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs one order through a validator chain holding the funds validator.
fn handle_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let config = args
        .config
        .load()
        .with_context(|| format!("loading {}", args.config.config.display()))?;
    let env = Arc::new(SimulatedEnvironment::from_config(&config));

    let order = Order::new(
        args.instrument,
        args.side,
        args.effect,
        args.price,
        args.quantity,
    )
    .context("invalid order")?;

    let account = match (args.no_account, args.account_type, args.cash) {
        (true, _, _) => None,
        (false, Some(account_type), Some(cash)) => Some(Account::new(account_type, cash)),
        _ => anyhow::bail!("--account-type and --cash are required unless --no-account is given"),
    };

    let sink = Arc::new(RecordingSink::new());
    let mut chain = ValidatorChain::new();
    chain.add_validator(Box::new(FundsValidator::with_sink(env, sink.clone())));

    let admitted = if args.cancel {
        chain.can_cancel_order(&order, account.as_ref())
    } else {
        chain.can_submit_order(&order, account.as_ref())
    };
    let rejections = sink.take();
    for rejection in &rejections {
        TracingSink.reject(rejection);
    }

    if args.json {
        let rejections = rejections
            .iter()
            .map(rejection_json)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let verdict = serde_json::json!({
            "admitted": admitted,
            "order": order,
            "account": account,
            "rejections": rejections,
        });
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else if admitted {
        println!("ADMITTED");
    } else {
        for rejection in &rejections {
            println!("REJECTED: {}", rejection);
        }
    }

    Ok(if admitted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Serializes a rejection for the JSON verdict. Shortfalls also carry the
/// missing amount as `deficit`.
fn rejection_json(rejection: &FundsRejection) -> anyhow::Result<serde_json::Value> {
    let mut value: serde_json::Value = serde_json::from_str(&rejection.to_json()?)?;
    if let FundsRejection::Shortfall(shortfall) = rejection {
        value["deficit"] = serde_json::to_value(shortfall.deficit())?;
    }
    Ok(value)
}

fn handle_instruments(args: InstrumentsArgs) -> anyhow::Result<()> {
    let config = args
        .config
        .load()
        .with_context(|| format!("loading {}", args.config.config.display()))?;
    let env = SimulatedEnvironment::from_config(&config);

    let mut table = Table::new();
    table.set_header(vec!["Instrument", "Account", "Multiplier", "Margin Rate"]);
    for instrument in env.instruments() {
        table.add_row(vec![
            instrument.instrument_id.clone(),
            instrument.account_type.to_string(),
            instrument.contract_multiplier.to_string(),
            instrument.margin_rate.to_string(),
        ]);
    }

    println!("{table}");
    println!("margin_multiplier = {}", config.base.margin_multiplier);
    Ok(())
}
