// Splitit - Bill Splitting Engine - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod money;
pub mod model;
pub mod allocation;  // Equal split, pools, totals
pub mod balance;     // Covered / remaining / balanced
pub mod assignment;  // Idle / ItemActive / PersonActive
pub mod actions;     // Pure reducers
pub mod settle;      // Payer / debtors / to collect
pub mod currency;
pub mod summary;     // Display-ready labels
pub mod export;
pub mod settings;

// Re-export commonly used types
pub use model::{
    Person, PersonId, Expense, ExpenseId,
    SplitState, SplitMode, PricingMode, ViewMode,
    SAMPLE_ROSTER,
};
pub use allocation::{
    Allocation, AllocationBasis, AllocationEngine, PersonShare, PoolBreakdown,
    equal_split,
};
pub use balance::{Balance, BalanceStatus, SplitSummary};
pub use assignment::{AssignmentMode, Transition};
pub use actions::{Action, Reducer, reduce, reduce_all};
pub use settle::{
    SettleProgress, SettleSubMode, CollectionPlan, PayerLine, DebtorLine,
    collection_plan,
};
pub use currency::{
    Currency, CurrencyError, CurrencyFormat,
    COMMON_CURRENCIES, currency_for_region,
};
pub use summary::{Badge, PersonLine, SummaryView, summary_view};
pub use export::{read_snapshot, render_receipt, write_shares_csv, write_shares_csv_to_path};
pub use settings::{Settings, ServerSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
