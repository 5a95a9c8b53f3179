//! Roster assignment models.
//!
//! The solver returns the fortnight as 14 ordered days, each listing staff
//! names per shift block. The published view uses single-letter shift codes.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Number of days in one rostering cycle.
pub const CYCLE_DAYS: usize = 14;

/// Number of days in one week of the cycle.
pub const WEEK_DAYS: usize = 7;

/// A shift block as named by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftBlock {
    /// Morning block.
    #[serde(rename = "AM")]
    Am,
    /// Afternoon/evening block.
    #[serde(rename = "PM")]
    Pm,
    /// Night duty block.
    #[serde(rename = "ND")]
    Nd,
}

impl ShiftBlock {
    /// Blocks in processing order. When a name appears in several blocks on
    /// the same day, the later block in this order wins.
    pub const PROCESSING_ORDER: [ShiftBlock; 3] = [ShiftBlock::Am, ShiftBlock::Pm, ShiftBlock::Nd];

    /// Returns the published shift code for this block.
    pub fn code(self) -> ShiftCode {
        match self {
            ShiftBlock::Am => ShiftCode::Day,
            ShiftBlock::Pm => ShiftCode::Evening,
            ShiftBlock::Nd => ShiftCode::Night,
        }
    }
}

/// A published shift code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShiftCode {
    /// Day shift, 0700–1530.
    #[serde(rename = "D")]
    Day,
    /// Evening shift, 1300–2130.
    #[serde(rename = "E")]
    Evening,
    /// Night duty, 2100–0730.
    #[serde(rename = "N")]
    Night,
    /// Rostered off.
    #[default]
    #[serde(rename = "OFF")]
    Off,
}

impl ShiftCode {
    /// Returns the code as printed on the roster.
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::Day => "D",
            ShiftCode::Evening => "E",
            ShiftCode::Night => "N",
            ShiftCode::Off => "OFF",
        }
    }

    /// Returns true when the code is a worked shift.
    pub fn is_worked(self) -> bool {
        self != ShiftCode::Off
    }
}

impl std::fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of solver output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftAssignmentDay {
    /// The solver's 1-based day number, when supplied.
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Names rostered on the morning block.
    #[serde(rename = "AM", default, deserialize_with = "lenient::names")]
    pub am: Vec<String>,
    /// Names rostered on the evening block.
    #[serde(rename = "PM", default, deserialize_with = "lenient::names")]
    pub pm: Vec<String>,
    /// Names rostered on night duty.
    #[serde(rename = "ND", default, deserialize_with = "lenient::names")]
    pub nd: Vec<String>,
}

impl ShiftAssignmentDay {
    /// Returns the names rostered on the given block.
    pub fn names(&self, block: ShiftBlock) -> &[String] {
        match block {
            ShiftBlock::Am => &self.am,
            ShiftBlock::Pm => &self.pm,
            ShiftBlock::Nd => &self.nd,
        }
    }

    /// Iterates every name on this day, block by block in processing order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        ShiftBlock::PROCESSING_ORDER
            .into_iter()
            .flat_map(move |block| self.names(block).iter().map(String::as_str))
    }
}
