// 🧮 Allocation Engine - total and per-person computed shares
//
// Pure function of a SplitState snapshot. No state is kept between calls.
//
// Equal split within a pool (one expense, or the whole roster when there
// are no expenses):
//   base      = floor(price_cents / n) / 100
//   remainder = round(price - base * n, 2)
//   every member gets `base`, the LAST member in sequence order gets
//   `base + remainder`
//
// The remainder always lands on the last-listed assignee. That is why
// assignment sequences are ordered Vecs: turning them into sets would
// silently move the odd cent.

use crate::balance::{self, SplitSummary};
use crate::model::{Expense, ExpenseId, PersonId, PricingMode, SplitState};
use crate::money::{cent, parse_amount, round_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Where the total came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationBasis {
    /// At least one expense exists
    Items,
    /// No expenses; the manual total is split across the roster
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonShare {
    pub person_id: PersonId,
    pub amount: Decimal,
}

/// How one pool was divided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolBreakdown {
    /// None for the manual-total pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<ExpenseId>,

    pub pricing_mode: PricingMode,

    /// Parsed price as entered (per head in `each` mode)
    pub unit_price: Decimal,

    /// What the pool contributes to the total
    pub line_total: Decimal,

    /// Shares in pool order
    pub shares: Vec<PersonShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub basis: AllocationBasis,
    pub total: Decimal,

    /// One entry per person, in roster order
    pub computed_amounts: Vec<PersonShare>,

    pub pools: Vec<PoolBreakdown>,
}

impl Allocation {
    /// Computed share of a person; zero for unknown ids
    pub fn computed_amount(&self, person_id: &PersonId) -> Decimal {
        self.computed_amounts
            .iter()
            .find(|share| &share.person_id == person_id)
            .map(|share| share.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all computed shares
    pub fn computed_total(&self) -> Decimal {
        self.computed_amounts.iter().map(|share| share.amount).sum()
    }

    pub fn pool_for(&self, expense_id: &ExpenseId) -> Option<&PoolBreakdown> {
        self.pools
            .iter()
            .find(|pool| pool.expense_id.as_ref() == Some(expense_id))
    }
}

// ============================================================================
// EQUAL SPLIT
// ============================================================================

/// Divide `price` across `count` members in whole cents.
///
/// All but the last member get the truncated share; the last gets the
/// truncated share plus whatever is left, so the shares always sum to the
/// price (to the cent).
///
/// ```
/// use splitit::allocation::equal_split;
/// use rust_decimal::Decimal;
///
/// let shares = equal_split(Decimal::new(1001, 2), 4);
/// assert_eq!(shares, vec![
///     Decimal::new(250, 2),
///     Decimal::new(250, 2),
///     Decimal::new(250, 2),
///     Decimal::new(251, 2),
/// ]);
/// ```
pub fn equal_split(price: Decimal, count: usize) -> Vec<Decimal> {
    if count == 0 {
        return Vec::new();
    }
    if price.is_zero() {
        return vec![Decimal::ZERO; count];
    }

    let n = Decimal::from(count);
    let base = (price * Decimal::ONE_HUNDRED / n).floor() / Decimal::ONE_HUNDRED;
    let remainder = round_cents(price - base * n);

    let mut shares = vec![base; count];
    if let Some(last) = shares.last_mut() {
        *last = base + remainder;
    }
    shares
}

// ============================================================================
// ALLOCATION ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct AllocationEngine {
    /// Band within which covered and total count as equal (default: 0.01)
    pub tolerance: Decimal,
}

impl AllocationEngine {
    pub fn new() -> Self {
        AllocationEngine { tolerance: cent() }
    }

    /// Bill total.
    ///
    /// Item mode: sum of prices (`total` pricing) or price × assignee count
    /// (`each` pricing). Manual mode: the parsed manual total.
    pub fn total(&self, state: &SplitState) -> Decimal {
        if !state.has_items() {
            return parse_amount(&state.manual_total);
        }

        state
            .expenses
            .iter()
            .map(|expense| ExpensePool::new(state, expense).line_total)
            .sum()
    }

    /// Total plus every person's computed share
    pub fn allocate(&self, state: &SplitState) -> Allocation {
        let mut computed: Vec<PersonShare> = state
            .people
            .iter()
            .map(|p| PersonShare {
                person_id: p.id.clone(),
                amount: Decimal::ZERO,
            })
            .collect();

        let basis = if state.has_items() {
            AllocationBasis::Items
        } else {
            AllocationBasis::Manual
        };

        let mut total = Decimal::ZERO;
        let mut pools = Vec::new();

        match basis {
            AllocationBasis::Items => {
                for expense in &state.expenses {
                    let pool = ExpensePool::new(state, expense);
                    total += pool.line_total;

                    let shares = if pool.members.is_empty() || pool.price.is_zero() {
                        Vec::new()
                    } else {
                        match pool.mode {
                            // Price is already one person's amount
                            PricingMode::Each => vec![pool.price; pool.members.len()],
                            PricingMode::Total => equal_split(pool.price, pool.members.len()),
                        }
                    };

                    trace!(
                        expense = %expense.id,
                        members = pool.members.len(),
                        price = %pool.price,
                        "distributing expense"
                    );

                    pools.push(PoolBreakdown {
                        expense_id: Some(expense.id.clone()),
                        pricing_mode: pool.mode,
                        unit_price: pool.price,
                        line_total: pool.line_total,
                        shares: credit(&mut computed, &pool.members, &shares),
                    });
                }
            }
            AllocationBasis::Manual => {
                total = parse_amount(&state.manual_total);
                let members = state.person_ids();
                let shares = if members.is_empty() || total <= Decimal::ZERO {
                    Vec::new()
                } else {
                    equal_split(total, members.len())
                };

                pools.push(PoolBreakdown {
                    expense_id: None,
                    pricing_mode: PricingMode::Total,
                    unit_price: total,
                    line_total: total,
                    shares: credit(&mut computed, &members, &shares),
                });
            }
        }

        Allocation {
            basis,
            total,
            computed_amounts: computed,
            pools,
        }
    }

    /// Full derived view: allocation plus covered/remaining/balanced
    pub fn evaluate(&self, state: &SplitState) -> SplitSummary {
        let allocation = self.allocate(state);
        let summary = balance::summarize(state, allocation, self.tolerance);

        debug!(
            total = %summary.total,
            covered = %summary.covered_amount,
            remaining = %summary.remaining,
            balanced = summary.is_balanced,
            "evaluated split"
        );

        summary
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One expense resolved against the roster
struct ExpensePool {
    members: Vec<PersonId>,
    price: Decimal,
    mode: PricingMode,
    line_total: Decimal,
}

impl ExpensePool {
    fn new(state: &SplitState, expense: &Expense) -> Self {
        let members = pool_members(state, state.assignees(&expense.id));
        let price = parse_amount(&expense.price);
        let mode = state.effective_pricing_mode(expense);
        let line_total = match mode {
            PricingMode::Total => price,
            PricingMode::Each => price * Decimal::from(members.len()),
        };

        ExpensePool {
            members,
            price,
            mode,
            line_total,
        }
    }
}

/// Members of a pool: ids present in the roster, first occurrence only,
/// in sequence order
fn pool_members(state: &SplitState, sequence: &[PersonId]) -> Vec<PersonId> {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(sequence.len());

    for id in sequence {
        if !state.contains_person(id) {
            warn!(person = %id, "ignoring assignment to unknown person");
            continue;
        }
        if seen.insert(id) {
            members.push(id.clone());
        }
    }

    members
}

/// Add each member's share to the running per-person totals
fn credit(computed: &mut [PersonShare], members: &[PersonId], shares: &[Decimal]) -> Vec<PersonShare> {
    members
        .iter()
        .zip(shares)
        .map(|(member, amount)| {
            if let Some(entry) = computed.iter_mut().find(|s| &s.person_id == member) {
                entry.amount += *amount;
            }
            PersonShare {
                person_id: member.clone(),
                amount: *amount,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
