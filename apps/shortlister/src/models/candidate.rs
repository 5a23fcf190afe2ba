use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A manually entered candidate: a name plus pasted resume / profile text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub resume_text: String,
}

impl Candidate {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            resume_text: String::new(),
        }
    }

    /// Returns a copy of this record with one field replaced.
    pub fn with_field(&self, field: CandidateField, value: String) -> Self {
        match field {
            CandidateField::Name => Self {
                name: value,
                ..self.clone()
            },
            CandidateField::Resume => Self {
                resume_text: value,
                ..self.clone()
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.resume_text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Resume,
}
