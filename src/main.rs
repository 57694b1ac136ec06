// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use splitit::{
    collection_plan, read_snapshot, render_receipt, summary_view, write_shares_csv_to_path,
    AllocationEngine, CurrencyFormat, SettleProgress, Settings, SplitState,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let settings = Settings::new().context("Failed to load settings")?;

    match args.get(1).map(String::as_str) {
        Some("summary") => {
            init_tracing();
            run_summary(&settings, path_arg(&args, 2, "summary <state.json>")?)?;
        }
        Some("export") => {
            init_tracing();
            run_export(
                path_arg(&args, 2, "export <state.json> <out.csv>")?,
                path_arg(&args, 3, "export <state.json> <out.csv>")?,
            )?;
        }
        Some("receipt") => {
            init_tracing();
            run_receipt(&settings, path_arg(&args, 2, "receipt <state.json>")?)?;
        }
        Some("sample") => {
            let state = settings.initial_state();
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Some(other) => bail!("Unknown command: {} (try summary, export, receipt, sample)", other),
        None => {
            // UI mode (default)
            run_ui_mode(&settings)?;
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so only CLI commands log to stdout
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn path_arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a Path> {
    args.get(index)
        .map(Path::new)
        .with_context(|| format!("Usage: splitit {}", usage))
}

fn run_summary(settings: &Settings, path: &Path) -> Result<()> {
    let state = read_snapshot(path)?;
    let currency = settings.currency()?;
    let summary = AllocationEngine::new().evaluate(&state);
    let plan = collection_plan(&state, &summary, &observed(&state));
    let view = summary_view(&state, &summary, Some(&plan), &currency);

    println!("🧮 Split the Bill - {}", path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total: {}", currency.display(summary.total));
    println!();

    for line in &view.people {
        println!(
            "  {:<20} {:>12}  ({} items)",
            line.name,
            format!("{} {}", view.symbol, line.share),
            line.item_count
        );
    }

    println!();
    println!("{}: {} {}", view.covered_label, view.symbol, view.covered);
    println!("{}: {} {}", view.remaining_label, view.symbol, view.remaining);
    if let Some(badge) = view.badge {
        let icon = if summary.is_balanced { "✅" } else { "⚠️" };
        println!("{} {}", icon, badge.label());
    }

    Ok(())
}

fn run_export(state_path: &Path, csv_path: &Path) -> Result<()> {
    let state = read_snapshot(state_path)?;
    let summary = AllocationEngine::new().evaluate(&state);
    let rows = write_shares_csv_to_path(csv_path, &state, &summary)?;

    println!("✓ Wrote {} rows to {}", rows, csv_path.display());
    Ok(())
}

fn run_receipt(settings: &Settings, path: &Path) -> Result<()> {
    let state = read_snapshot(path)?;
    let currency = settings.currency()?;
    let summary = AllocationEngine::new().evaluate(&state);
    let plan = collection_plan(&state, &summary, &observed(&state));

    let receipt = render_receipt(&state, &summary, Some(&plan), &currency, Local::now().date_naive());
    print!("{}", receipt);
    Ok(())
}

/// Fresh progress aligned with the snapshot's payer
fn observed(state: &SplitState) -> SettleProgress {
    let mut progress = SettleProgress::new();
    progress.observe(state);
    progress
}

#[cfg(feature = "tui")]
fn run_ui_mode(settings: &Settings) -> Result<()> {
    println!("🖥️  Loading Split the Bill...\n");

    let currency = settings.currency()?;
    let state = settings.initial_state();
    println!("✓ {} people, currency {}", state.people.len(), currency.code);
    println!("Starting UI... (Press 'q' to quit)\n");

    // Create and run app
    let mut app = ui::App::new(state, currency);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_settings: &Settings) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin splitit-server --features server");
    std::process::exit(1);
}
