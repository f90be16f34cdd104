use core::str::FromStr;

use serde::{Deserialize, Serialize};

use eggman_core::{CompactId, DomainError, DomainResult, Entity};

/// Category options offered by the form, as `(value, label)` pairs.
///
/// The store only requires a non-empty category; this list is what the
/// rendering layer presents.
pub const CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("notebook", "Notebook"),
    ("projector", "Projetor"),
    ("camera", "Câmera"),
    ("other", "Outro"),
];

/// Equipment identifier (opaque, time + random derived).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(CompactId);

impl EquipmentId {
    pub fn generate() -> Self {
        Self(CompactId::generate())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl core::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EquipmentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Availability of a piece of equipment.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentStatus {
    #[default]
    #[serde(rename = "disponível")]
    Available,
    #[serde(rename = "emprestado")]
    Borrowed,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 2] = [EquipmentStatus::Available, EquipmentStatus::Borrowed];

    /// Stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "disponível",
            EquipmentStatus::Borrowed => "emprestado",
        }
    }
}

impl core::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown status {s:?}")))
    }
}

/// A tracked piece of equipment.
///
/// Only ever built from a validated draft (or deserialized from storage), so a
/// stored record is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    id: EquipmentId,
    name: String,
    category: String,
    patrimony: String,
    #[serde(default)]
    status: EquipmentStatus,
}

impl Equipment {
    pub fn new(
        id: EquipmentId,
        name: impl Into<String>,
        category: impl Into<String>,
        patrimony: impl Into<String>,
        status: EquipmentStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            patrimony: patrimony.into(),
            status,
        }
    }

    /// Full copy of the draft's fields under `id`.
    pub(crate) fn from_draft(id: EquipmentId, draft: &EquipmentDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            patrimony: draft.patrimony.clone(),
            status: draft.status,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn patrimony(&self) -> &str {
        &self.patrimony
    }

    pub fn status(&self) -> EquipmentStatus {
        self.status
    }
}

impl Entity for Equipment {
    type Id = EquipmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The form's working copy of a record.
///
/// A draft without an id is a new record; a draft with an id is an edit of
/// the stored record carrying that id. Field edits never touch the stored
/// record until the store saves the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentDraft {
    id: Option<EquipmentId>,
    pub name: String,
    pub category: String,
    pub patrimony: String,
    pub status: EquipmentStatus,
}

impl EquipmentDraft {
    /// Blank template: empty fields, status available.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_record(record: &Equipment) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            category: record.category.clone(),
            patrimony: record.patrimony.clone(),
            status: record.status,
        }
    }

    pub fn id(&self) -> Option<&EquipmentId> {
        self.id.as_ref()
    }

    /// Non-empty checks only; status always has a value.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.category.is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if self.patrimony.trim().is_empty() {
            return Err(DomainError::validation("patrimony cannot be empty"));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
