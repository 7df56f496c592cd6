//! Core library for the salvage planner: inventory paste parsing, the item
//! list state, reprocessing efficiency and the analysis service contract.
//! Nothing here performs I/O.

pub mod core_api;
pub mod efficiency;
pub mod item;
pub mod list;
pub mod paste;

pub use efficiency::{EfficiencyTier, ReprocessingEfficiency, SkillLevels};
pub use item::SalvageItem;
pub use list::{ListAction, SalvageList};
pub use paste::{ParseReport, PasteFormat, parse_inventory_report, parse_inventory_text};
