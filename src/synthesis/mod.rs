//! Pure derivations from collaborator inputs to the published view.
//!
//! - [`calendar`]: day descriptors for the cycle in the reference timezone
//! - [`view`]: the union-by-name join into ordered published rows
//! - [`compliance`]: analytics attachment and the cycle-wide summary

pub mod calendar;
pub mod compliance;
pub mod view;

pub use calendar::{CycleCalendar, day_meta, fortnight};
pub use compliance::{annotate, dedupe_analytics, reconcile_reported, review_flags, summarize};
pub use view::{ShiftMatrix, build_shift_matrix, compare_rows, resolve_role, synthesize_rows};
