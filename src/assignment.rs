// 🎯 Assignment Mode - which entity is currently being assigned
//
// Three states: Idle, ItemActive(expense), PersonActive(person).
// Focusing the active entity again exits to Idle; focusing another entity
// of the same kind moves straight to it. Controls of the other kind are
// hidden while a mode is active, so focusing them does nothing. Exiting
// bakes the computed equal split into every person's manual amount field.

use crate::allocation::AllocationEngine;
use crate::model::{ExpenseId, PersonId, SplitState};
use crate::money::bake_amount;
use serde::{Deserialize, Serialize};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssignmentMode {
    /// Nothing selected
    #[default]
    Idle,

    /// Assigning people to one expense
    #[serde(rename = "item")]
    ItemActive {
        #[serde(rename = "itemId")]
        item_id: ExpenseId,
    },

    /// Assigning expenses to one person
    #[serde(rename = "person")]
    PersonActive {
        #[serde(rename = "personId")]
        person_id: PersonId,
    },
}

/// Outcome of focusing an entity's assignment control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Move to (or stay in) an active state
    Enter(AssignmentMode),

    /// Leave to Idle; computed shares must be baked in
    Exit,

    /// Control not offered in the current state
    Ignore,
}

impl AssignmentMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, AssignmentMode::Idle)
    }

    pub fn active_item(&self) -> Option<&ExpenseId> {
        match self {
            AssignmentMode::ItemActive { item_id } => Some(item_id),
            AssignmentMode::Idle | AssignmentMode::PersonActive { .. } => None,
        }
    }

    pub fn active_person(&self) -> Option<&PersonId> {
        match self {
            AssignmentMode::PersonActive { person_id } => Some(person_id),
            AssignmentMode::Idle | AssignmentMode::ItemActive { .. } => None,
        }
    }

    /// Focus an expense's "assign people" control
    pub fn focus_item(&self, item_id: &ExpenseId) -> Transition {
        match self {
            AssignmentMode::ItemActive { item_id: current } if current == item_id => {
                Transition::Exit
            }
            AssignmentMode::Idle | AssignmentMode::ItemActive { .. } => {
                Transition::Enter(AssignmentMode::ItemActive {
                    item_id: item_id.clone(),
                })
            }
            AssignmentMode::PersonActive { .. } => Transition::Ignore,
        }
    }

    /// Focus a person's avatar control
    pub fn focus_person(&self, person_id: &PersonId) -> Transition {
        match self {
            AssignmentMode::PersonActive { person_id: current } if current == person_id => {
                Transition::Exit
            }
            AssignmentMode::Idle | AssignmentMode::PersonActive { .. } => {
                Transition::Enter(AssignmentMode::PersonActive {
                    person_id: person_id.clone(),
                })
            }
            AssignmentMode::ItemActive { .. } => Transition::Ignore,
        }
    }
}

// ============================================================================
// MEMBERSHIP OPERATIONS
// ============================================================================

/// Flip a person's membership in an expense's sequence.
/// Insertions go to the end; that position decides who receives the
/// remainder cent.
pub fn toggle_membership(state: &mut SplitState, expense_id: &ExpenseId, person_id: &PersonId) {
    if !state.contains_expense(expense_id) || !state.contains_person(person_id) {
        return;
    }

    let sequence = state.assignments.entry(expense_id.clone()).or_default();
    if sequence.contains(person_id) {
        sequence.retain(|id| id != person_id);
    } else {
        sequence.push(person_id.clone());
    }
}

/// Item mode "Select All / Deselect All": everyone in roster order, or nobody
pub fn select_all_people(state: &mut SplitState, expense_id: &ExpenseId) {
    if !state.contains_expense(expense_id) {
        return;
    }

    let next = if state.all_people_assigned(expense_id) {
        Vec::new()
    } else {
        state.person_ids()
    };
    state.assignments.insert(expense_id.clone(), next);
}

/// Person mode "Select All / Deselect All": remove the person everywhere if
/// they are already on every expense, else append them where missing
pub fn select_all_expenses(state: &mut SplitState, person_id: &PersonId) {
    if !state.contains_person(person_id) {
        return;
    }

    let all_selected = state.assigned_to_all_expenses(person_id);
    let expense_ids: Vec<ExpenseId> = state.expenses.iter().map(|e| e.id.clone()).collect();

    for expense_id in expense_ids {
        let sequence = state.assignments.entry(expense_id).or_default();
        if all_selected {
            sequence.retain(|id| id != person_id);
        } else if !sequence.contains(person_id) {
            sequence.push(person_id.clone());
        }
    }
}

/// Overwrite every manual amount with the current computed share
/// (two decimals, empty when zero)
pub fn bake_in(state: &mut SplitState, engine: &AllocationEngine) {
    let allocation = engine.allocate(state);
    for person in state.people.iter_mut() {
        person.amount = bake_amount(allocation.computed_amount(&person.id));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expense;

    fn state_with_expense(price: &str) -> (SplitState, ExpenseId) {
        let mut state = SplitState::sample();
        let id = ExpenseId::from("e1");
        state.expenses.push(Expense::new(id.clone(), price));
        state.assignments.insert(id.clone(), state.person_ids());
        (state, id)
    }

    #[test]
    fn test_focus_transitions_from_idle() {
        let idle = AssignmentMode::Idle;
        let item = ExpenseId::from("e1");
        let person = PersonId::from("1");

        assert_eq!(
            idle.focus_item(&item),
            Transition::Enter(AssignmentMode::ItemActive { item_id: item.clone() })
        );
        assert_eq!(
            idle.focus_person(&person),
            Transition::Enter(AssignmentMode::PersonActive { person_id: person.clone() })
        );
    }

    #[test]
    fn test_refocus_same_entity_exits() {
        let item = ExpenseId::from("e1");
        let active = AssignmentMode::ItemActive { item_id: item.clone() };
        assert_eq!(active.focus_item(&item), Transition::Exit);

        let person = PersonId::from("1");
        let active = AssignmentMode::PersonActive { person_id: person.clone() };
        assert_eq!(active.focus_person(&person), Transition::Exit);
    }

    #[test]
    fn test_focus_other_entity_switches_directly() {
        let active = AssignmentMode::ItemActive { item_id: ExpenseId::from("e1") };
        let other = ExpenseId::from("e2");
        assert_eq!(
            active.focus_item(&other),
            Transition::Enter(AssignmentMode::ItemActive { item_id: other })
        );

        let person = active.focus_person(&PersonId::from("3"));
        assert_eq!(person, Transition::Ignore);

        let active = AssignmentMode::PersonActive { person_id: PersonId::from("1") };
        assert_eq!(active.focus_item(&ExpenseId::from("e1")), Transition::Ignore);
        assert_eq!(
            active.focus_person(&PersonId::from("2")),
            Transition::Enter(AssignmentMode::PersonActive { person_id: PersonId::from("2") })
        );
    }

    #[test]
    fn test_toggle_appends_at_end() {
        let (mut state, id) = state_with_expense("10");
        let rus = PersonId::from("1");

        toggle_membership(&mut state, &id, &rus);
        assert_eq!(state.assignees(&id).len(), 3);
        assert!(!state.is_assigned(&id, &rus));

        toggle_membership(&mut state, &id, &rus);
        assert_eq!(state.assignees(&id).last(), Some(&rus));
    }

    #[test]
    fn test_toggle_ignores_unknown_ids() {
        let (mut state, id) = state_with_expense("10");
        let before = state.clone();

        toggle_membership(&mut state, &id, &PersonId::from("ghost"));
        toggle_membership(&mut state, &ExpenseId::from("nope"), &PersonId::from("1"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_select_all_people_flips() {
        let (mut state, id) = state_with_expense("10");

        select_all_people(&mut state, &id);
        assert!(state.assignees(&id).is_empty());

        select_all_people(&mut state, &id);
        assert_eq!(state.assignees(&id), state.person_ids().as_slice());

        // Partial selection selects everyone in roster order
        state.assignments.insert(id.clone(), vec![PersonId::from("3")]);
        select_all_people(&mut state, &id);
        assert_eq!(state.assignees(&id), state.person_ids().as_slice());
    }

    #[test]
    fn test_select_all_expenses_flips() {
        let (mut state, e1) = state_with_expense("10");
        let e2 = ExpenseId::from("e2");
        state.expenses.push(Expense::new(e2.clone(), "5"));
        state.assignments.insert(e2.clone(), vec![PersonId::from("2")]);
        let rus = PersonId::from("1");

        select_all_expenses(&mut state, &rus);
        assert!(state.is_assigned(&e1, &rus));
        assert_eq!(state.assignees(&e2), &[PersonId::from("2"), rus.clone()]);

        select_all_expenses(&mut state, &rus);
        assert!(!state.is_assigned(&e1, &rus));
        assert!(!state.is_assigned(&e2, &rus));
    }

    #[test]
    fn test_bake_in_writes_two_decimals() {
        let (mut state, id) = state_with_expense("10.01");
        state.assignments.insert(
            id,
            vec![PersonId::from("1"), PersonId::from("2"), PersonId::from("3")],
        );

        bake_in(&mut state, &AllocationEngine::new());

        let amounts: Vec<&str> = state.people.iter().map(|p| p.amount.as_str()).collect();
        assert_eq!(amounts, vec!["3.33", "3.33", "3.35", ""]);

        println!("✅ Bake-in test passed: {:?}", amounts);
    }
}
