// 🧾 Summary View - engine output formatted for display
//
// Hosts (TUI, HTTP) render this instead of re-deriving labels themselves.
// Consumption view shows Covered / Remaining with a Balanced, Over or
// Remaining badge. Settle view with an active collection shows the payer's
// share and what is left to collect, with a Collected badge at the end.

use crate::balance::{BalanceStatus, SplitSummary};
use crate::currency::CurrencyFormat;
use crate::model::{PersonId, SplitMode, SplitState, ViewMode};
use crate::money::bake_amount;
use crate::settle::{CollectionPlan, SettleSubMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Balanced,
    Over,
    Remaining,
    Collected,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Balanced => "Balanced",
            Badge::Over => "Over",
            Badge::Remaining => "Remaining",
            Badge::Collected => "Collected",
        }
    }
}

/// One row of the people list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonLine {
    pub person_id: PersonId,
    pub name: String,
    pub initial: String,

    /// What the amount field shows: the computed share in equally mode
    /// (blank when zero), the raw manual entry in amounts mode
    pub displayed_amount: String,

    /// Computed share through the currency formatter
    pub share: String,

    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub symbol: String,
    pub total: String,
    pub covered_label: String,
    pub covered: String,
    pub remaining_label: String,

    /// Absolute value, "+" prefixed when over
    pub remaining: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,

    pub can_settle: bool,
    pub people: Vec<PersonLine>,
}

pub fn summary_view<C: CurrencyFormat>(
    state: &SplitState,
    summary: &SplitSummary,
    plan: Option<&CollectionPlan>,
    currency: &C,
) -> SummaryView {
    let people = state
        .people
        .iter()
        .map(|person| {
            let computed = summary.computed_amount(&person.id);
            let displayed_amount = match state.split_mode {
                SplitMode::Equally => bake_amount(computed),
                SplitMode::Amounts => person.amount.clone(),
            };

            PersonLine {
                person_id: person.id.clone(),
                name: person.display_name().to_string(),
                initial: person.initial(),
                displayed_amount,
                share: currency.format_amount(computed),
                item_count: state.item_count(&person.id),
            }
        })
        .collect();

    let collecting = match plan {
        Some(plan) if state.view_mode == ViewMode::Settle && !plan.awaiting_payer() => Some(plan),
        _ => None,
    };

    let (covered_label, covered, remaining_label, remaining, badge) = match collecting {
        Some(plan) => {
            let covered_label = match (&plan.payer, plan.sub_mode) {
                (Some(payer), SettleSubMode::OnePayer) => format!("{}'s Share", payer.name),
                _ => "Covered".to_string(),
            };
            let covered = match &plan.payer {
                Some(payer) => payer.share,
                None => summary.covered_amount,
            };
            (
                covered_label,
                currency.format_amount(covered),
                "To Collect".to_string(),
                currency.format_amount(plan.to_collect),
                plan.collected.then_some(Badge::Collected),
            )
        }
        None => {
            let sign = if summary.is_over { "+" } else { "" };
            let badge = match summary.status {
                BalanceStatus::Balanced => Badge::Balanced,
                BalanceStatus::Over => Badge::Over,
                BalanceStatus::Remaining => Badge::Remaining,
            };
            (
                "Covered".to_string(),
                currency.format_amount(summary.covered_amount),
                "Remaining".to_string(),
                format!("{}{}", sign, currency.format_amount(summary.remaining.abs())),
                Some(badge),
            )
        }
    };

    SummaryView {
        symbol: currency.symbol().to_string(),
        total: currency.format_amount(summary.total),
        covered_label,
        covered,
        remaining_label,
        remaining,
        badge,
        can_settle: summary.can_settle,
        people,
    }
}
