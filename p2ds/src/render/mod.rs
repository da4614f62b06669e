//! Output documents
//!
//! Every renderer is a pure function of finalized results and config; the
//! runner decides where the text goes.

pub mod gold_table;
pub mod lss;
pub mod map_times;
pub mod report;

pub use gold_table::build_gold_table;
pub use lss::build_lss;
pub use map_times::build_map_times;
pub use report::{AttemptReport, GoldReport};
