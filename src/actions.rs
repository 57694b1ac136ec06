// 🔁 Actions - pure reducers over SplitState
//
// (state, action) -> new state. Reducers never fail: an action naming an id
// that does not exist leaves the state untouched. Ids for new entities are
// carried inside the action so the reducer itself stays deterministic.

use crate::allocation::AllocationEngine;
use crate::assignment::{self, AssignmentMode, Transition};
use crate::model::{Expense, ExpenseId, Person, PersonId, PricingMode, SplitMode, SplitState, ViewMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    // People
    AddPerson { id: PersonId },
    RemovePerson { id: PersonId },
    RenamePerson { id: PersonId, name: String },
    SetPersonAmount { id: PersonId, amount: String },

    // Expenses
    AddExpense { id: ExpenseId },
    RemoveExpense { id: ExpenseId },
    SetExpenseDescription { id: ExpenseId, description: String },
    SetExpensePrice { id: ExpenseId, price: String },
    /// `None` clears the override
    SetExpensePricingMode { id: ExpenseId, mode: Option<PricingMode> },

    // Global modes
    SetPricingMode { mode: PricingMode },
    SetManualTotal { total: String },
    SetSplitMode { mode: SplitMode },

    // Assignment mode
    FocusItem { id: ExpenseId },
    FocusPerson { id: PersonId },
    /// Item mode: flip a person on the active expense
    TogglePerson { id: PersonId },
    /// Person mode: flip an expense for the active person
    ToggleExpense { id: ExpenseId },
    /// Select/deselect all for whichever entity is active
    SelectAll,
    ExitAssignmentMode,

    // Settle
    SetViewMode { mode: ViewMode },
    SetPayer { id: Option<PersonId> },
}

impl Action {
    pub fn add_person() -> Self {
        Action::AddPerson {
            id: PersonId::generate(),
        }
    }

    pub fn add_expense() -> Self {
        Action::AddExpense {
            id: ExpenseId::generate(),
        }
    }
}

// ============================================================================
// REDUCER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Reducer {
    engine: AllocationEngine,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: AllocationEngine) -> Self {
        Reducer { engine }
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Produce the next snapshot
    pub fn apply(&self, state: &SplitState, action: Action) -> SplitState {
        let mut next = state.clone();
        debug!(?action, "applying action");

        match action {
            Action::AddPerson { id } => self.add_person(&mut next, id),
            Action::RemovePerson { id } => self.remove_person(&mut next, &id),
            Action::RenamePerson { id, name } => {
                if let Some(person) = next.people.iter_mut().find(|p| p.id == id) {
                    person.name = name;
                }
            }
            Action::SetPersonAmount { id, amount } => {
                if let Some(person) = next.people.iter_mut().find(|p| p.id == id) {
                    person.amount = amount;
                }
            }

            Action::AddExpense { id } => self.add_expense(&mut next, id),
            Action::RemoveExpense { id } => self.remove_expense(&mut next, &id),
            Action::SetExpenseDescription { id, description } => {
                if let Some(expense) = next.expenses.iter_mut().find(|e| e.id == id) {
                    expense.description = description;
                }
            }
            Action::SetExpensePrice { id, price } => {
                if let Some(expense) = next.expenses.iter_mut().find(|e| e.id == id) {
                    expense.price = price;
                }
            }
            Action::SetExpensePricingMode { id, mode } => {
                if let Some(expense) = next.expenses.iter_mut().find(|e| e.id == id) {
                    expense.pricing_mode = mode;
                }
            }

            Action::SetPricingMode { mode } => next.pricing_mode = mode,
            Action::SetManualTotal { total } => next.manual_total = total,
            Action::SetSplitMode { mode } => {
                // Manual edits start from the equal split, not blank fields
                if next.split_mode == SplitMode::Equally && mode == SplitMode::Amounts {
                    assignment::bake_in(&mut next, &self.engine);
                }
                next.split_mode = mode;
            }

            Action::FocusItem { id } => {
                if next.view_mode == ViewMode::Consumption && next.contains_expense(&id) {
                    let transition = next.assignment_mode.focus_item(&id);
                    self.transition(&mut next, transition);
                }
            }
            Action::FocusPerson { id } => {
                if next.view_mode == ViewMode::Consumption && next.contains_person(&id) {
                    let transition = next.assignment_mode.focus_person(&id);
                    self.transition(&mut next, transition);
                }
            }
            Action::TogglePerson { id } => {
                if let Some(item_id) = next.assignment_mode.active_item().cloned() {
                    assignment::toggle_membership(&mut next, &item_id, &id);
                }
            }
            Action::ToggleExpense { id } => {
                if let Some(person_id) = next.assignment_mode.active_person().cloned() {
                    assignment::toggle_membership(&mut next, &id, &person_id);
                }
            }
            Action::SelectAll => match next.assignment_mode.clone() {
                AssignmentMode::ItemActive { item_id } => {
                    assignment::select_all_people(&mut next, &item_id)
                }
                AssignmentMode::PersonActive { person_id } => {
                    assignment::select_all_expenses(&mut next, &person_id)
                }
                AssignmentMode::Idle => {}
            },
            Action::ExitAssignmentMode => {
                if next.assignment_mode.is_active() {
                    self.transition(&mut next, Transition::Exit);
                }
            }

            Action::SetViewMode { mode } => self.set_view_mode(&mut next, mode),
            Action::SetPayer { id } => match id {
                Some(id) if next.contains_person(&id) => next.payer_id = Some(id),
                Some(_) => {}
                None => next.payer_id = None,
            },
        }

        self.enforce_settle_gate(&mut next);
        next
    }

    fn transition(&self, state: &mut SplitState, transition: Transition) {
        match transition {
            Transition::Enter(mode) => state.assignment_mode = mode,
            Transition::Exit => {
                assignment::bake_in(state, &self.engine);
                state.assignment_mode = AssignmentMode::Idle;
            }
            Transition::Ignore => {}
        }
    }

    fn add_person(&self, state: &mut SplitState, id: PersonId) {
        if state.contains_person(&id) {
            return;
        }

        // New people start assigned to every existing expense
        for sequence in state.assignments.values_mut() {
            sequence.push(id.clone());
        }
        for expense in &state.expenses {
            state
                .assignments
                .entry(expense.id.clone())
                .or_insert_with(|| vec![id.clone()]);
        }
        state.people.push(Person::new(id));
    }

    fn remove_person(&self, state: &mut SplitState, id: &PersonId) {
        if !state.contains_person(id) {
            return;
        }

        state.people.retain(|p| &p.id != id);
        for sequence in state.assignments.values_mut() {
            sequence.retain(|pid| pid != id);
        }
        if state.payer_id.as_ref() == Some(id) {
            state.payer_id = None;
        }
        if state.assignment_mode.active_person() == Some(id) {
            self.transition(state, Transition::Exit);
        }
    }

    fn add_expense(&self, state: &mut SplitState, id: ExpenseId) {
        if state.contains_expense(&id) {
            return;
        }

        // The first expense takes over whatever was typed as the manual total
        let price = if state.expenses.is_empty() {
            state.manual_total.clone()
        } else {
            String::new()
        };

        let everyone = state.person_ids();
        state.assignments.insert(id.clone(), everyone);
        state.expenses.push(Expense::new(id, &price));
    }

    fn remove_expense(&self, state: &mut SplitState, id: &ExpenseId) {
        if !state.contains_expense(id) {
            return;
        }

        state.expenses.retain(|e| &e.id != id);
        state.assignments.remove(id);
        if state.assignment_mode.active_item() == Some(id) {
            self.transition(state, Transition::Exit);
        }
    }

    fn set_view_mode(&self, state: &mut SplitState, mode: ViewMode) {
        match mode {
            ViewMode::Consumption => state.view_mode = ViewMode::Consumption,
            ViewMode::Settle => {
                if state.assignment_mode.is_active() {
                    self.transition(state, Transition::Exit);
                }
                if self.engine.evaluate(state).can_settle {
                    state.view_mode = ViewMode::Settle;
                } else {
                    debug!("settle view refused: split is not settleable");
                }
            }
        }
    }

    /// Settle view is only reachable while the split can be settled; drop
    /// back to consumption if an edit broke that
    fn enforce_settle_gate(&self, state: &mut SplitState) {
        if state.view_mode == ViewMode::Settle && !self.engine.evaluate(state).can_settle {
            state.view_mode = ViewMode::Consumption;
        }
    }
}

/// Apply one action with a default engine
pub fn reduce(state: &SplitState, action: Action) -> SplitState {
    Reducer::new().apply(state, action)
}

/// Apply a sequence of actions in order
pub fn reduce_all<I>(state: &SplitState, actions: I) -> SplitState
where
    I: IntoIterator<Item = Action>,
{
    let reducer = Reducer::new();
    actions
        .into_iter()
        .fold(state.clone(), |current, action| reducer.apply(&current, action))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn pid(id: &str) -> PersonId {
        PersonId::from(id)
    }

    fn eid(id: &str) -> ExpenseId {
        ExpenseId::from(id)
    }

    #[test]
    fn test_add_person_appends_to_every_expense() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::AddExpense { id: eid("e2") },
                Action::AddPerson { id: pid("5") },
            ],
        );

        assert_eq!(state.people.len(), 5);
        assert_eq!(state.assignees(&eid("e1")).last(), Some(&pid("5")));
        assert_eq!(state.assignees(&eid("e2")).len(), 5);
        assert_eq!(state.people[4].initial(), "?");
    }

    #[test]
    fn test_first_expense_inherits_manual_total() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "42.50".to_string() },
                Action::AddExpense { id: eid("e1") },
                Action::AddExpense { id: eid("e2") },
            ],
        );

        assert_eq!(state.expenses[0].price, "42.50");
        assert_eq!(state.expenses[1].price, "");
        assert_eq!(state.assignees(&eid("e1")), state.person_ids().as_slice());
    }

    #[test]
    fn test_remove_expense_restores_manual_mode() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "80".to_string() },
                Action::AddExpense { id: eid("e1") },
                Action::SetExpensePrice { id: eid("e1"), price: "20".to_string() },
                Action::RemoveExpense { id: eid("e1") },
            ],
        );

        assert!(!state.has_items());
        assert!(state.assignments.is_empty());
        assert_eq!(AllocationEngine::new().total(&state), d("80"));
    }

    #[test]
    fn test_remove_person_cascades_and_conserves_pennies() {
        let engine = AllocationEngine::new();
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::SetExpensePrice { id: eid("e1"), price: "10.01".to_string() },
                Action::AddExpense { id: eid("e2") },
                Action::SetExpensePrice { id: eid("e2"), price: "7".to_string() },
                Action::SetPayer { id: Some(pid("2")) },
                Action::RemovePerson { id: pid("2") },
            ],
        );

        for sequence in state.assignments.values() {
            assert!(!sequence.contains(&pid("2")));
        }
        assert_eq!(state.payer_id, None);

        let allocation = engine.allocate(&state);
        for expense in &state.expenses {
            let pool = allocation.pool_for(&expense.id).unwrap();
            let sum: Decimal = pool.shares.iter().map(|s| s.amount).sum();
            assert_eq!(sum, pool.line_total);
        }
        assert_eq!(allocation.computed_amount(&pid("4")), d("3.35") + d("2.34"));
    }

    #[test]
    fn test_item_mode_toggle_and_exit_bakes_in() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::SetExpensePrice { id: eid("e1"), price: "40".to_string() },
                Action::FocusItem { id: eid("e1") },
                Action::TogglePerson { id: pid("4") },
            ],
        );
        assert_eq!(state.assignment_mode.active_item(), Some(&eid("e1")));
        assert_eq!(state.assignees(&eid("e1")).len(), 3);

        // Re-focusing the same item exits and bakes in
        let state = reduce(&state, Action::FocusItem { id: eid("e1") });
        assert_eq!(state.assignment_mode, AssignmentMode::Idle);
        let amounts: Vec<&str> = state.people.iter().map(|p| p.amount.as_str()).collect();
        assert_eq!(amounts, vec!["13.33", "13.33", "13.34", ""]);
        assert_eq!(state.split_mode, SplitMode::Equally);
    }

    #[test]
    fn test_exit_bake_in_is_idempotent() {
        let start = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::SetExpensePrice { id: eid("e1"), price: "10.01".to_string() },
            ],
        );

        let once = reduce_all(
            &start,
            [Action::FocusItem { id: eid("e1") }, Action::FocusItem { id: eid("e1") }],
        );
        let twice = reduce_all(
            &once,
            [Action::FocusPerson { id: pid("1") }, Action::FocusPerson { id: pid("1") }],
        );

        let engine = AllocationEngine::new();
        let allocation = engine.allocate(&twice);
        for person in &twice.people {
            assert_eq!(
                crate::money::parse_amount(&person.amount),
                allocation.computed_amount(&person.id)
            );
        }
        assert_eq!(once.people, twice.people);

        println!("✅ Bake-in idempotence test passed");
    }

    #[test]
    fn test_person_mode_toggle_and_select_all() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::AddExpense { id: eid("e2") },
                Action::FocusPerson { id: pid("1") },
                Action::ToggleExpense { id: eid("e1") },
            ],
        );
        assert_eq!(state.item_count(&pid("1")), 1);

        // Not on every expense, so select-all adds back (at the end)
        let state = reduce(&state, Action::SelectAll);
        assert_eq!(state.item_count(&pid("1")), 2);
        assert_eq!(state.assignees(&eid("e1")).last(), Some(&pid("1")));

        let state = reduce(&state, Action::SelectAll);
        assert_eq!(state.item_count(&pid("1")), 0);
        assert_eq!(state.item_count(&pid("2")), 2);
    }

    #[test]
    fn test_toggles_ignored_in_wrong_mode() {
        let start = reduce(&SplitState::sample(), Action::AddExpense { id: eid("e1") });

        let idle = reduce(&start, Action::TogglePerson { id: pid("1") });
        assert_eq!(idle, start);

        let item_mode = reduce(&start, Action::FocusItem { id: eid("e1") });
        let unchanged = reduce(&item_mode, Action::ToggleExpense { id: eid("e1") });
        assert_eq!(unchanged.assignees(&eid("e1")), item_mode.assignees(&eid("e1")));
    }

    #[test]
    fn test_switching_entities_does_not_pass_through_idle() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::AddExpense { id: eid("e2") },
                Action::SetExpensePrice { id: eid("e1"), price: "8".to_string() },
                Action::FocusItem { id: eid("e1") },
                Action::FocusItem { id: eid("e2") },
            ],
        );

        assert_eq!(state.assignment_mode.active_item(), Some(&eid("e2")));
        // No exit happened, so nothing was baked in
        assert!(state.people.iter().all(|p| p.amount.is_empty()));

        // Person controls are hidden while an item is active
        let same = reduce(&state, Action::FocusPerson { id: pid("2") });
        assert_eq!(same, state);
    }

    #[test]
    fn test_split_mode_switch_bakes_in() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "100".to_string() },
                Action::SetSplitMode { mode: SplitMode::Amounts },
            ],
        );

        assert!(state.people.iter().all(|p| p.amount == "25.00"));
        let summary = AllocationEngine::new().evaluate(&state);
        assert!(summary.is_balanced);

        // Amounts -> Equally leaves manual fields alone
        let edited = reduce(&state, Action::SetPersonAmount { id: pid("1"), amount: "5".to_string() });
        let back = reduce(&edited, Action::SetSplitMode { mode: SplitMode::Equally });
        assert_eq!(back.people[0].amount, "5");
    }

    #[test]
    fn test_removing_active_expense_exits_assignment_mode() {
        let state = reduce_all(
            &SplitState::sample(),
            [
                Action::AddExpense { id: eid("e1") },
                Action::FocusItem { id: eid("e1") },
                Action::RemoveExpense { id: eid("e1") },
            ],
        );
        assert_eq!(state.assignment_mode, AssignmentMode::Idle);
    }

    #[test]
    fn test_settle_view_requires_balance() {
        let unbalanced = reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "100".to_string() },
                Action::SetSplitMode { mode: SplitMode::Amounts },
                Action::SetPersonAmount { id: pid("1"), amount: "0".to_string() },
                Action::SetViewMode { mode: ViewMode::Settle },
            ],
        );
        assert_eq!(unbalanced.view_mode, ViewMode::Consumption);

        let balanced = reduce_all(
            &SplitState::sample(),
            [
                Action::SetManualTotal { total: "100".to_string() },
                Action::SetViewMode { mode: ViewMode::Settle },
            ],
        );
        assert_eq!(balanced.view_mode, ViewMode::Settle);

        // Editing the total to zero drops back to consumption
        let broken = reduce(&balanced, Action::SetManualTotal { total: "".to_string() });
        assert_eq!(broken.view_mode, ViewMode::Consumption);
    }

    #[test]
    fn test_set_payer_validates_id() {
        let state = reduce(&SplitState::sample(), Action::SetPayer { id: Some(pid("9")) });
        assert_eq!(state.payer_id, None);

        let state = reduce(&state, Action::SetPayer { id: Some(pid("1")) });
        assert_eq!(state.payer().map(|p| p.name.as_str()), Some("Rus"));

        let state = reduce(&state, Action::SetPayer { id: None });
        assert_eq!(state.payer_id, None);
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action = serde_json::from_str(r#"{"type":"focusItem","id":"e1"}"#).unwrap();
        assert_eq!(action, Action::FocusItem { id: eid("e1") });

        let json = serde_json::to_value(Action::SetPayer { id: None }).unwrap();
        assert_eq!(json["type"], "setPayer");
    }
}
