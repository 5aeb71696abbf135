//! Fixed curriculum concept catalog
//!
//! Concepts are atomic skill nodes with a locked/learning/mastered
//! lifecycle. The catalog itself is fixed; per-student status lives in the
//! session store. Prerequisites are soft curriculum hints, not enforced
//! gates.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Concept ids unlocked by the first completed assessment (the entry
/// points of the reading and math tracks)
pub const ENTRY_CONCEPT_IDS: [&str; 2] = ["c1", "m1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptCategory {
    Reading,
    Math,
    Comprehension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptStatus {
    Locked,
    Learning,
    Mastered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub category: ConceptCategory,
    pub status: ConceptStatus,
    pub prerequisites: Vec<String>,
    pub xp_reward: i64,
}

fn concept(
    id: &str,
    name: &str,
    category: ConceptCategory,
    prerequisites: &[&str],
    xp_reward: i64,
) -> Concept {
    Concept {
        id: id.to_string(),
        name: name.to_string(),
        category,
        status: ConceptStatus::Locked,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        xp_reward,
    }
}

static CATALOG: Lazy<Vec<Concept>> = Lazy::new(|| {
    use ConceptCategory::{Math, Reading};
    vec![
        concept("c1", "Letter Recognition", Reading, &[], 50),
        concept("c2", "Word Formation", Reading, &["c1"], 75),
        concept("c3", "Sentence Reading", Reading, &["c2"], 100),
        concept("c4", "Paragraph Fluency", Reading, &["c3"], 150),
        concept("m1", "Number Recognition", Math, &[], 50),
        concept("m2", "Counting", Math, &["m1"], 75),
        concept("m3", "Addition", Math, &["m2"], 100),
        concept("m4", "Subtraction", Math, &["m3"], 125),
    ]
});

/// The full catalog, all locked. A fresh session starts from this.
pub fn initial_concepts() -> Vec<Concept> {
    CATALOG.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_starts_fully_locked() {
        assert!(initial_concepts()
            .iter()
            .all(|c| c.status == ConceptStatus::Locked));
    }

    #[test]
    fn entry_concepts_have_no_prerequisites() {
        let catalog = initial_concepts();
        for id in ENTRY_CONCEPT_IDS {
            let c = catalog.iter().find(|c| c.id == id).unwrap();
            assert!(c.prerequisites.is_empty());
        }
    }
}
