//! Staff preference profile model.
//!
//! Profiles are owned by the profile store and are read-only here. Only
//! `name` is required; every other field is optional and decoded leniently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::Role;

fn default_swap_willing() -> bool {
    true
}

/// A staff member's submitted preference profile for the fortnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    /// Staff member's name. Unique key across all collaborators.
    pub name: String,
    /// Contact email.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Declared role code, as entered (e.g. "rn", "ANUM").
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Legacy role field used by older profile records.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Fractional full-time equivalent (e.g. 0.8).
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub fte: Option<Decimal>,
    /// Preferred shift block ("AM", "PM" or "ND").
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub shift_pref: Option<String>,
    /// Maximum night duties the staff member will accept in the cycle.
    #[serde(
        rename = "maxNDs",
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_nds: Option<u32>,
    /// Number of rostering requests allowed this cycle.
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub requests_quota: Option<u32>,
    /// Number of rostering preferences allowed this cycle.
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub preferences_quota: Option<u32>,
    /// Holds a flexible work arrangement.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub flexible_work: bool,
    /// Willing to swap shifts.
    #[serde(default = "default_swap_willing", deserialize_with = "lenient::flag")]
    pub swap_willing: bool,
    /// Opted in to overtime.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub overtime_opt_in: bool,
    /// Has completed local ward induction.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub local_induction_complete: bool,
    /// Free-text availability notes.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub availability_notes: Option<String>,
}

impl StaffProfile {
    /// Creates a profile carrying only a name, with every optional field defaulted.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_audit::models::StaffProfile;
    ///
    /// let profile = StaffProfile::named("Amy");
    /// assert_eq!(profile.name, "Amy");
    /// assert!(profile.swap_willing);
    /// assert!(profile.declared_role().is_none());
    /// ```
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            role: None,
            position: None,
            fte: None,
            shift_pref: None,
            max_nds: None,
            requests_quota: None,
            preferences_quota: None,
            flexible_work: false,
            swap_willing: default_swap_willing(),
            overtime_opt_in: false,
            local_induction_complete: false,
            availability_notes: None,
        }
    }

    /// Returns the role from the `role` field alone.
    pub fn stated_role(&self) -> Option<Role> {
        non_blank(&self.role).map(Role::parse)
    }

    /// Returns the role this profile declares, falling back to the legacy
    /// `position` field.
    pub fn declared_role(&self) -> Option<Role> {
        self.stated_role()
            .or_else(|| non_blank(&self.position).map(Role::parse))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
