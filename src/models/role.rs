//! Staff role model and its display precedence.
//!
//! Roles arrive as free text from several collaborators. They are normalized
//! to uppercase and mapped onto a closed set of known codes, with everything
//! else kept verbatim in [`Role::Other`] and sorted after the known codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The role a staff member holds on the ward.
///
/// # Example
///
/// ```
/// use roster_audit::models::Role;
///
/// assert_eq!(Role::parse(" anum "), Role::Anum);
/// assert_eq!(Role::parse("num"), Role::Other("NUM".to_string()));
/// assert!(Role::Anum.precedence() < Role::Rn.precedence());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Associate Nurse Unit Manager.
    Anum,
    /// Clinical Nurse Specialist.
    Cns,
    /// Registered Nurse. Used when no collaborator reports a role.
    #[default]
    Rn,
    /// Enrolled Nurse.
    En,
    /// Graduate Nurse Program participant.
    Gnp,
    /// Any other code, uppercased. Sorts after every known role.
    Other(String),
}

impl Role {
    /// Known role codes in display precedence order.
    pub const PRECEDENCE: [&'static str; 5] = ["ANUM", "CNS", "RN", "EN", "GNP"];

    /// Parses a role code, ignoring surrounding whitespace and case.
    pub fn parse(raw: &str) -> Self {
        let code = raw.trim().to_uppercase();
        match code.as_str() {
            "ANUM" => Role::Anum,
            "CNS" => Role::Cns,
            "RN" => Role::Rn,
            "EN" => Role::En,
            "GNP" => Role::Gnp,
            _ => Role::Other(code),
        }
    }

    /// Returns the sort rank of this role; lower ranks are listed first.
    pub fn precedence(&self) -> usize {
        match self {
            Role::Anum => 0,
            Role::Cns => 1,
            Role::Rn => 2,
            Role::En => 3,
            Role::Gnp => 4,
            Role::Other(_) => Self::PRECEDENCE.len(),
        }
    }

    /// Returns the uppercase role code.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Anum => "ANUM",
            Role::Cns => "CNS",
            Role::Rn => "RN",
            Role::En => "EN",
            Role::Gnp => "GNP",
            Role::Other(code) => code,
        }
    }

    /// Returns true for the Nurse Unit Manager who approves the roster.
    pub fn is_unit_manager(&self) -> bool {
        matches!(self, Role::Other(code) if code == "NUM")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}
