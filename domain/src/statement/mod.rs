//! Financial statement model.
//!
//! - [`SectionKind`]: the three audited statements
//! - [`FinancialLineItem`]: a reported/recomputed amount pair
//! - [`AgentResult`]: one agent's normalized extraction
//! - [`evaluate_balancing`]: the assets = liabilities + equity verdict

pub mod agent_result;
pub mod balancing;
pub mod document;
pub mod line_item;
pub mod section;

pub use agent_result::{AgentResult, StatementSections, field_key};
pub use balancing::{
    BalanceBasis, BalanceStatus, BalanceVerdict, BalancingCheck, evaluate_balancing,
    total_assets_item,
};
pub use document::{DocumentRef, StatementDocument};
pub use line_item::{FinancialLineItem, FootingPolicy, FootingStatus};
pub use section::SectionKind;
