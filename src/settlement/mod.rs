//! Settlement engine for single-layer XL treaties with proportional regional allocation

mod engine;
mod result;

pub use engine::{settle, SettlementEngine};
pub use result::{RegionalSettlement, SettlementOutcome, SettlementResult};
