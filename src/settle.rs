// 🤝 Settle-Up - who fronted the bill and who still owes
//
// Two sub-modes:
//   OnePayer  - one person paid; their displayed share is the whole total and
//               everyone else owes their computed share
//   Everyone  - nobody fronted anything; every person owes their own share
//
// Paid/owed flags live in SettleProgress, a disposable store that is never
// part of the SplitState snapshot. Changing the payer or the sub-mode wipes
// it.

use crate::balance::SplitSummary;
use crate::model::{PersonId, SplitState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettleSubMode {
    /// "One Person" paid the bill
    #[default]
    OnePayer,
    /// "Everyone" pays their own share
    Everyone,
}

// ============================================================================
// SETTLE PROGRESS (ephemeral)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleProgress {
    #[serde(default)]
    sub_mode: SettleSubMode,

    /// People marked as paid
    #[serde(default)]
    paid: BTreeSet<PersonId>,

    /// Payer the flags were recorded against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed_payer: Option<PersonId>,
}

impl SettleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_mode(&self) -> SettleSubMode {
        self.sub_mode
    }

    /// Switch sub-mode; any switch resets every flag
    pub fn set_sub_mode(&mut self, mode: SettleSubMode) {
        if self.sub_mode != mode {
            debug!(?mode, "settle sub-mode changed, resetting progress");
            self.sub_mode = mode;
            self.paid.clear();
        }
    }

    /// Sync with the snapshot's payer; a different payer invalidates
    /// collection progress
    pub fn observe(&mut self, state: &SplitState) {
        if self.observed_payer != state.payer_id {
            debug!(payer = ?state.payer_id, "payer changed, resetting progress");
            self.observed_payer = state.payer_id.clone();
            self.paid.clear();
        }
    }

    pub fn toggle_paid(&mut self, person_id: &PersonId) {
        if !self.paid.remove(person_id) {
            self.paid.insert(person_id.clone());
        }
    }

    pub fn is_paid(&self, person_id: &PersonId) -> bool {
        self.paid.contains(person_id)
    }

    pub fn reset(&mut self) {
        self.paid.clear();
    }

    /// Flags only count when recorded against the current payer
    fn is_current_for(&self, state: &SplitState) -> bool {
        self.observed_payer == state.payer_id
    }
}

// ============================================================================
// COLLECTION PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerLine {
    pub person_id: PersonId,
    pub name: String,

    /// They fronted the money, so their share is the whole bill
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtorLine {
    pub person_id: PersonId,
    pub name: String,
    pub owes: Decimal,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPlan {
    pub sub_mode: SettleSubMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<PayerLine>,

    /// People who could be picked as payer (one-payer mode, none picked yet)
    pub candidates: Vec<PersonId>,

    pub debtors: Vec<DebtorLine>,

    /// Sum of unpaid debtors' shares
    pub to_collect: Decimal,

    /// Collection is running and every debtor has paid
    pub collected: bool,
}

impl CollectionPlan {
    pub fn awaiting_payer(&self) -> bool {
        self.sub_mode == SettleSubMode::OnePayer && self.payer.is_none()
    }

    pub fn unpaid_count(&self) -> usize {
        self.debtors.iter().filter(|d| !d.paid).count()
    }
}

/// Build the collection view for the current snapshot
pub fn collection_plan(state: &SplitState, summary: &SplitSummary, progress: &SettleProgress) -> CollectionPlan {
    let flags_valid = progress.is_current_for(state);
    let paid = |id: &PersonId| flags_valid && progress.is_paid(id);

    let debtor = |person: &crate::model::Person| DebtorLine {
        person_id: person.id.clone(),
        name: person.display_name().to_string(),
        owes: summary.computed_amount(&person.id),
        paid: paid(&person.id),
    };

    let (payer, candidates, debtors) = match progress.sub_mode() {
        SettleSubMode::OnePayer => match state.payer() {
            Some(payer) => (
                Some(PayerLine {
                    person_id: payer.id.clone(),
                    name: payer.display_name().to_string(),
                    share: summary.total,
                }),
                Vec::new(),
                state
                    .people
                    .iter()
                    .filter(|p| p.id != payer.id)
                    .map(debtor)
                    .collect(),
            ),
            None => (None, state.person_ids(), Vec::new()),
        },
        SettleSubMode::Everyone => (None, Vec::new(), state.people.iter().map(debtor).collect()),
    };

    let to_collect: Decimal = debtors.iter().filter(|d| !d.paid).map(|d| d.owes).sum();
    let active = match progress.sub_mode() {
        SettleSubMode::OnePayer => payer.is_some(),
        SettleSubMode::Everyone => true,
    };
    let collected = active && debtors.iter().all(|d| d.paid);

    CollectionPlan {
        sub_mode: progress.sub_mode(),
        payer,
        candidates,
        debtors,
        to_collect,
        collected,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{reduce, reduce_all, Action};
    use crate::allocation::AllocationEngine;
    use crate::model::ViewMode;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn settled_state() -> SplitState {
        reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "100".to_string() },
                Action::SetViewMode { mode: ViewMode::Settle },
            ],
        )
    }

    #[test]
    fn test_awaiting_payer() {
        let engine = AllocationEngine::new();
        let state = settled_state();
        let progress = SettleProgress::new();

        let plan = collection_plan(&state, &engine.evaluate(&state), &progress);
        assert!(plan.awaiting_payer());
        assert_eq!(plan.candidates.len(), 4);
        assert!(plan.debtors.is_empty());
        assert_eq!(plan.to_collect, Decimal::ZERO);
        assert!(!plan.collected);
    }

    #[test]
    fn test_one_payer_collection_terminates() {
        let engine = AllocationEngine::new();
        let state = reduce(&settled_state(), Action::SetPayer { id: Some(PersonId::from("1")) });
        let mut progress = SettleProgress::new();
        progress.observe(&state);

        let summary = engine.evaluate(&state);
        let plan = collection_plan(&state, &summary, &progress);
        assert_eq!(plan.payer.as_ref().map(|p| p.share), Some(d("100")));
        assert_eq!(plan.debtors.len(), 3);
        assert!(plan.debtors.iter().all(|debtor| debtor.owes == d("25")));
        assert_eq!(plan.to_collect, d("75"));

        for id in ["2", "3", "4"] {
            progress.toggle_paid(&PersonId::from(id));
        }
        let plan = collection_plan(&state, &summary, &progress);
        assert_eq!(plan.to_collect, d("0.00"));
        assert!(plan.collected);

        // A new payer wipes progress
        let state = reduce(&state, Action::SetPayer { id: Some(PersonId::from("2")) });
        progress.observe(&state);
        let summary = engine.evaluate(&state);
        let plan = collection_plan(&state, &summary, &progress);
        assert_eq!(plan.unpaid_count(), 3);
        assert_eq!(plan.to_collect, d("75.00"));
        assert!(!plan.collected);
        assert!(plan.debtors.iter().any(|debtor| debtor.name == "Rus"));

        println!("✅ Settle collection test passed: to collect {}", plan.to_collect);
    }

    #[test]
    fn test_stale_progress_is_ignored() {
        let engine = AllocationEngine::new();
        let state = reduce(&settled_state(), Action::SetPayer { id: Some(PersonId::from("1")) });
        let mut progress = SettleProgress::new();
        progress.observe(&state);
        progress.toggle_paid(&PersonId::from("3"));

        // Host switched payer but forgot to call observe()
        let state = reduce(&state, Action::SetPayer { id: Some(PersonId::from("4")) });
        let plan = collection_plan(&state, &engine.evaluate(&state), &progress);
        assert!(plan.debtors.iter().all(|debtor| !debtor.paid));
    }

    #[test]
    fn test_everyone_mode() {
        let engine = AllocationEngine::new();
        let state = settled_state();
        let summary = engine.evaluate(&state);
        let mut progress = SettleProgress::new();
        progress.observe(&state);
        progress.set_sub_mode(SettleSubMode::Everyone);

        let plan = collection_plan(&state, &summary, &progress);
        assert!(plan.payer.is_none());
        assert_eq!(plan.debtors.len(), 4);
        assert_eq!(plan.to_collect, d("100"));

        progress.toggle_paid(&PersonId::from("1"));
        progress.toggle_paid(&PersonId::from("2"));
        let plan = collection_plan(&state, &summary, &progress);
        assert_eq!(plan.to_collect, d("50"));

        progress.toggle_paid(&PersonId::from("3"));
        progress.toggle_paid(&PersonId::from("4"));
        assert!(collection_plan(&state, &summary, &progress).collected);

        // Switching back to one payer resets everything
        progress.set_sub_mode(SettleSubMode::OnePayer);
        assert!(!progress.is_paid(&PersonId::from("1")));
        assert!(collection_plan(&state, &summary, &progress).awaiting_payer());
    }

    #[test]
    fn test_toggle_paid_flips() {
        let mut progress = SettleProgress::new();
        let id = PersonId::from("2");
        progress.toggle_paid(&id);
        assert!(progress.is_paid(&id));
        progress.toggle_paid(&id);
        assert!(!progress.is_paid(&id));
    }

    #[test]
    fn test_sub_mode_survives_view_switch() {
        let mut progress = SettleProgress::new();
        progress.set_sub_mode(SettleSubMode::Everyone);

        let state = reduce(&settled_state(), Action::SetViewMode { mode: ViewMode::Consumption });
        let state = reduce(&state, Action::SetViewMode { mode: ViewMode::Settle });
        progress.observe(&state);

        assert_eq!(state.view_mode, ViewMode::Settle);
        assert_eq!(progress.sub_mode(), SettleSubMode::Everyone);
    }
}
