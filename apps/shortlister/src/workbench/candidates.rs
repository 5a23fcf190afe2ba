use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::find_job;
use crate::models::candidate::{Candidate, CandidateField};

/// Where the job description comes from: pasted text or a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobInput {
    Custom(String),
    Catalog(String),
}

impl Default for JobInput {
    fn default() -> Self {
        JobInput::Custom(String::new())
    }
}

impl JobInput {
    /// Effective description text. `None` for an unknown catalog id.
    pub fn resolve(&self) -> Option<String> {
        match self {
            JobInput::Custom(text) => Some(text.clone()),
            JobInput::Catalog(id) => find_job(id).map(|job| job.description.to_string()),
        }
    }
}

/// Ordered list of manually entered candidates.
///
/// Records are never edited in place: an update swaps in a new `Candidate`.
/// The list itself does not guard against becoming empty; callers check
/// `can_remove` first.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
}

impl Default for CandidateList {
    fn default() -> Self {
        Self {
            candidates: vec![Candidate::empty()],
        }
    }
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty candidate and returns its id.
    pub fn add(&mut self) -> Uuid {
        let candidate = Candidate::empty();
        let id = candidate.id;
        self.candidates.push(candidate);
        id
    }

    /// Replaces one field of the candidate with `id`. Returns false (and changes nothing) if absent.
    pub fn update(&mut self, id: Uuid, field: CandidateField, value: String) -> bool {
        match self.candidates.iter().position(|c| c.id == id) {
            Some(index) => {
                let replacement = self.candidates[index].with_field(field, value);
                self.candidates[index] = replacement;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.id != id);
        self.candidates.len() != before
    }

    pub fn can_remove(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.candidates.iter().any(|c| c.id == id)
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_empty_candidate() {
        let list = CandidateList::new();
        assert_eq!(list.len(), 1);
        assert!(!list.as_slice()[0].is_complete());
        assert!(!list.can_remove());
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut list = CandidateList::new();
        let a = list.add();
        let b = list.add();
        assert_ne!(a, b);
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[2].id, b);
    }

    #[test]
    fn test_update_replaces_only_named_field() {
        let mut list = CandidateList::new();
        let id = list.as_slice()[0].id;
        assert!(list.update(id, CandidateField::Name, "Alice".to_string()));
        assert!(list.update(id, CandidateField::Resume, "Rust, Go".to_string()));
        assert!(list.update(id, CandidateField::Name, "Alice Smith".to_string()));

        let c = &list.as_slice()[0];
        assert_eq!(c.id, id);
        assert_eq!(c.name, "Alice Smith");
        assert_eq!(c.resume_text, "Rust, Go");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut list = CandidateList::new();
        let before = list.clone();
        assert!(!list.update(Uuid::new_v4(), CandidateField::Name, "Ghost".to_string()));
        assert_eq!(list, before);
    }

    #[test]
    fn test_remove_and_can_remove() {
        let mut list = CandidateList::new();
        let second = list.add();
        assert!(list.can_remove());
        assert!(list.remove(second));
        assert!(!list.contains(second));
        assert!(!list.remove(second));
        assert!(!list.can_remove());
    }

    #[test]
    fn test_job_input_resolves_custom_and_catalog() {
        assert_eq!(
            JobInput::Custom("Senior Backend Engineer".to_string()).resolve(),
            Some("Senior Backend Engineer".to_string())
        );
        let catalog = JobInput::Catalog("product-manager".to_string()).resolve().unwrap();
        assert!(catalog.contains("Product Manager"));
        assert!(JobInput::Catalog("missing".to_string()).resolve().is_none());
    }

    #[test]
    fn test_job_input_serde_shape() {
        let input: JobInput = serde_json::from_str(r#"{"catalog": "frontend-engineer"}"#).unwrap();
        assert_eq!(input, JobInput::Catalog("frontend-engineer".to_string()));
        let input: JobInput = serde_json::from_str(r#"{"custom": "Any role"}"#).unwrap();
        assert_eq!(input, JobInput::Custom("Any role".to_string()));
    }
}
