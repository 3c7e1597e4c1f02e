//! `workshop-recompute`: re-derives the totals of a stored invoice record.
//!
//! ```text
//! workshop-recompute record.json --kind payment
//! cat record.json | workshop-recompute --summary-only
//! workshop-recompute record.json --check   # exit 1 if any stored total is stale
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use workshop_core::InvoiceKind;
use workshop_session::audit::{self, AuditOptions, AuditReport, InputSource};
use workshop_session::{init_tracing, EngineConfig, SessionResult};

#[derive(Parser)]
#[command(name = "workshop-recompute")]
#[command(about = "Recompute the totals of a stored proforma or payment record", long_about = None)]
struct Cli {
    /// Payload JSON file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Invoice kind (proforma/payment)
    #[arg(short, long, default_value = "proforma")]
    kind: InvoiceKind,

    /// Engine config file (default: platform config dir/engine.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the summary block
    #[arg(long)]
    summary_only: bool,

    /// Compare stored row totals and summary with the recomputed ones
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let check = cli.check;

    let result = run(cli);
    if let Err(e) = &result {
        error!("{}", e);
    }
    ExitCode::from(audit::exit_code(&result, check))
}

fn run(cli: Cli) -> SessionResult<AuditReport> {
    let config = EngineConfig::load(cli.config)?;
    let raw = InputSource::from_arg(cli.input.as_deref()).read_to_string()?;

    let options = AuditOptions {
        kind: cli.kind,
        policy: config.policy(),
        summary_only: cli.summary_only,
    };
    audit::run(&options, raw.as_bytes(), std::io::stdout().lock())
}
