//! Identifier parsing: role and section resolution
//!
//! Platform identifiers are human-entered strings whose first three
//! characters encode the account role and whose characters at positions
//! 6-7 encode a two-character section code. Example: `PRC23CA001` is a
//! student in section `CA`.
//!
//! Both functions are pure and total. Malformed input yields an empty
//! result, never an error.

use serde::{Deserialize, Serialize};

/// Identifier prefix reserved for student accounts
pub const STUDENT_PREFIX: &str = "PRC";

/// Identifier prefix reserved for teacher accounts
pub const TEACHER_PREFIX: &str = "PCE";

/// Minimum identifier length accepted at signup
pub const MIN_ID_LENGTH: usize = 10;

/// Account role, implied by the identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the role implied by an identifier prefix.
///
/// The first three characters are matched case-insensitively against the
/// two reserved prefixes. Any other prefix (including identifiers shorter
/// than three characters) yields `None`.
pub fn role_of(id: &str) -> Option<Role> {
    let prefix: String = id.chars().take(3).collect::<String>().to_uppercase();
    match prefix.as_str() {
        STUDENT_PREFIX => Some(Role::Student),
        TEACHER_PREFIX => Some(Role::Teacher),
        _ => None,
    }
}

/// Extract the two-character section code from an identifier.
///
/// Returns the characters at positions 6-7 (0-indexed slice `[5,7)`) for
/// identifiers of length >= 7. Shorter identifiers yield an empty string;
/// lengths between 3 and 6 are deliberately not an error.
///
/// A pure positional slice: identifiers are uppercased at the boundary
/// by [`normalize_id`] before they reach this parser.
pub fn section_of(id: &str) -> String {
    if id.chars().count() >= 7 {
        id.chars().skip(5).take(2).collect()
    } else {
        String::new()
    }
}

/// Canonical form of an identifier as stored in the accounts table
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}
