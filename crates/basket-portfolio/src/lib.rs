#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/basket/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod allocation;
pub mod budget;

// Re-export main types
pub use allocation::{Allocation, AllocationError, AllocationLine, EqualWeightAllocator};
pub use budget::{BudgetRejection, InvalidBudgetInput, parse_budget};
