// Hard filters: the admit/reject gate and the text facts it relies on.

pub mod facts;
pub mod gate;

pub use gate::{admit, FilterReason, GateVerdict, TitleExclusion};
