// 📤 Export - snapshots in, share sheets and receipts out
//
// CSV columns: name,share,items,manual_amount
// Receipts are plain text, dated by the caller so output is reproducible.

use crate::balance::SplitSummary;
use crate::currency::CurrencyFormat;
use crate::model::SplitState;
use crate::money::to_fixed;
use crate::settle::CollectionPlan;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ShareRow<'a> {
    name: &'a str,
    share: String,
    items: usize,
    manual_amount: &'a str,
}

/// Load a JSON snapshot from disk
pub fn read_snapshot(path: &Path) -> Result<SplitState> {
    let file = File::open(path).with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
    let state = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse snapshot JSON: {}", path.display()))?;
    Ok(state)
}

/// Write one row per person; shares are plain two-decimal numbers so
/// spreadsheets can sum them
pub fn write_shares_csv<W: Write>(writer: W, state: &SplitState, summary: &SplitSummary) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    for person in &state.people {
        wtr.serialize(ShareRow {
            name: person.display_name(),
            share: to_fixed(summary.computed_amount(&person.id), 2),
            items: state.item_count(&person.id),
            manual_amount: &person.amount,
        })
        .with_context(|| format!("Failed to write CSV row for {}", person.display_name()))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(state.people.len())
}

pub fn write_shares_csv_to_path(path: &Path, state: &SplitState, summary: &SplitSummary) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_shares_csv(file, state, summary)
}

/// Human-readable receipt: items, shares and (when settling) who owes whom
pub fn render_receipt<C: CurrencyFormat>(
    state: &SplitState,
    summary: &SplitSummary,
    plan: Option<&CollectionPlan>,
    currency: &C,
    date: NaiveDate,
) -> String {
    let mut out = String::new();
    let rule = "─".repeat(40);

    let _ = writeln!(out, "Split the Bill · {}", date.format("%Y-%m-%d"));
    let _ = writeln!(out, "{}", rule);

    if state.has_items() {
        for expense in &state.expenses {
            let mode = state.effective_pricing_mode(expense);
            let line_total = summary
                .pools
                .iter()
                .find(|pool| pool.expense_id.as_ref() == Some(&expense.id))
                .map(|pool| pool.line_total)
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{:<24} {:>3} {:>10}",
                expense.display_name(),
                mode.label(),
                currency.display(line_total)
            );
        }
        let _ = writeln!(out, "{}", rule);
    }

    let _ = writeln!(out, "{:<28} {:>10}", "Total", currency.display(summary.total));
    let _ = writeln!(out);

    for person in &state.people {
        let _ = writeln!(
            out,
            "{:<20} {:>2} items {:>10}",
            person.display_name(),
            state.item_count(&person.id),
            currency.display(summary.computed_amount(&person.id))
        );
    }

    if let Some(plan) = plan {
        if let Some(payer) = &plan.payer {
            let _ = writeln!(out, "{}", rule);
            let _ = writeln!(out, "Paid by {}", payer.name);
        } else if !plan.debtors.is_empty() {
            let _ = writeln!(out, "{}", rule);
            let _ = writeln!(out, "Everyone pays their own share");
        }

        for debtor in &plan.debtors {
            let mark = if debtor.paid { "✓" } else { " " };
            let _ = writeln!(out, "  [{}] {:<18} {:>10}", mark, debtor.name, currency.display(debtor.owes));
        }

        if !plan.debtors.is_empty() {
            let _ = writeln!(out, "{:<28} {:>10}", "To Collect", currency.display(plan.to_collect));
        }
    }

    out
}
