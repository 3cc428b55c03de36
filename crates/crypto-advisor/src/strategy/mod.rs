//! Investment Strategies
//!
//! The rules engine plus the sizing and allocation algorithms it feeds.

mod allocation;
mod position;
mod recommendation;

pub use allocation::{AllocationPlan, PortfolioStrategy};
pub use position::{PositionSize, position_size};
pub use recommendation::RulesEngine;
