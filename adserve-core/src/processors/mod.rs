//! Background processors.

pub mod budget_reset;

pub use budget_reset::BudgetResetJob;
