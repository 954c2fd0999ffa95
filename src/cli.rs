//! CLI definition and dispatch.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::{
    load_backtest_config, load_indicator_params, load_signal_params, load_sizing_params,
    FileConfigAdapter,
};
use crate::adapters::text_report::{render_summary, TextReportAdapter};
use crate::domain::backtest::run_backtest;
use crate::domain::bar::Bar;
use crate::domain::error::GoldtrendError;
use crate::domain::indicator::compute_snapshots;
use crate::domain::metrics::Metrics;
use crate::domain::signal::evaluate;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "goldtrend", about = "Trend-following signal engine and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over historical bars
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding {symbol}.csv files
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Write a text report (and trade log CSV) to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the slippage RNG seed from the config
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate the signal rules on the latest bar
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range for a symbol
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            symbol,
            output,
            seed,
        } => run_backtest_command(&config, &data, &symbol, output.as_ref(), seed),
        Command::Signal {
            config,
            data,
            symbol,
        } => run_signal_command(&config, &data, &symbol),
        Command::Validate { config } => run_validate_command(&config),
        Command::Info { data, symbol } => run_info_command(&data, &symbol),
    }
}

fn fail(err: &GoldtrendError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fetch_all_bars(data: &PathBuf, symbol: &str) -> Result<Vec<Bar>, GoldtrendError> {
    let adapter = CsvAdapter::new(data.clone());
    adapter.fetch_bars(symbol, NaiveDateTime::MIN, NaiveDateTime::MAX)
}

fn run_backtest_command(
    config_path: &PathBuf,
    data: &PathBuf,
    symbol: &str,
    output: Option<&PathBuf>,
    seed: Option<u64>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let loaded = (|| {
        let indicators = load_indicator_params(&adapter)?;
        let signal = load_signal_params(&adapter)?;
        let sizing = load_sizing_params(&adapter)?;
        let mut backtest = load_backtest_config(&adapter)?;
        if seed.is_some() {
            backtest.rng_seed = seed;
        }
        Ok::<_, GoldtrendError>((indicators, signal, sizing, backtest))
    })();
    let (indicators, signal, sizing, backtest) = match loaded {
        Ok(v) => v,
        Err(e) => return fail(&e),
    };

    eprintln!("Loading bars for {} from {}", symbol, data.display());
    let bars = match fetch_all_bars(data, symbol) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    eprintln!("Running backtest over {} bars", bars.len());

    let result = match run_backtest(symbol, &bars, &indicators, &signal, &sizing, &backtest) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    let metrics = Metrics::compute(&result.trades, &result.account, backtest.initial_balance);

    print!("{}", render_summary(&result, &metrics));

    if let Some(path) = output {
        let report = TextReportAdapter;
        if let Err(e) = report.write(&result, &metrics, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_signal_command(config_path: &PathBuf, data: &PathBuf, symbol: &str) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let loaded = (|| {
        let indicators = load_indicator_params(&adapter)?;
        let signal = load_signal_params(&adapter)?;
        let sizing = load_sizing_params(&adapter)?;
        let backtest = load_backtest_config(&adapter)?;
        Ok::<_, GoldtrendError>((indicators, signal, sizing, backtest))
    })();
    let (indicators, signal_params, sizing, backtest) = match loaded {
        Ok(v) => v,
        Err(e) => return fail(&e),
    };

    let bars = match fetch_all_bars(data, symbol) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };

    let snapshots = compute_snapshots(&bars, &indicators);
    let last = bars.len() - 1;
    let decision = evaluate(
        &bars[last],
        &snapshots[last],
        bars.len(),
        backtest.initial_balance,
        backtest.risk_percent,
        &signal_params,
        &sizing,
    );

    println!("Symbol:    {}", symbol);
    println!("Bar time:  {}", bars[last].timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("Signal:    {}", decision.signal);
    println!("Rationale: {}", decision.rationale);
    if decision.side().is_some() {
        println!("Entry:     {:.5}", decision.entry_price);
        println!("Stop:      {:.5}", decision.stop_loss);
        println!("Target:    {:.5}", decision.take_profit);
        println!("Lot size:  {:.2}", decision.lot_size);
    }

    ExitCode::SUCCESS
}

fn run_validate_command(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checked = (|| {
        load_indicator_params(&adapter)?;
        load_signal_params(&adapter)?;
        load_sizing_params(&adapter)?;
        load_backtest_config(&adapter)?;
        Ok::<_, GoldtrendError>(())
    })();
    match checked {
        Ok(()) => {
            println!("{}: OK", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_info_command(data: &PathBuf, symbol: &str) -> ExitCode {
    let adapter = CsvAdapter::new(data.clone());
    match adapter.get_data_range(symbol) {
        Ok(Some((start, end, count))) => {
            println!("Symbol: {}", symbol);
            println!("Bars:   {}", count);
            println!("From:   {}", start.format("%Y-%m-%d %H:%M:%S"));
            println!("To:     {}", end.format("%Y-%m-%d %H:%M:%S"));
            ExitCode::SUCCESS
        }
        Ok(None) => {
            let err = GoldtrendError::NoData {
                symbol: symbol.to_string(),
            };
            fail(&err)
        }
        Err(e) => fail(&e),
    }
}
