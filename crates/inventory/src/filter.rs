//! Derived, read-only views over the collection.

use serde::Serialize;

use eggman_core::DomainResult;

use crate::equipment::{Equipment, EquipmentStatus};

/// Category + status filter. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentFilter {
    category: Option<String>,
    status: Option<EquipmentStatus>,
}

impl EquipmentFilter {
    /// Filter by exact category; an empty string clears it.
    pub fn set_category(&mut self, category: &str) {
        self.category = (!category.is_empty()).then(|| category.to_string());
    }

    /// Filter by exact status; an empty string clears it.
    pub fn set_status(&mut self, status: &str) -> DomainResult<()> {
        self.status = if status.is_empty() {
            None
        } else {
            Some(status.parse()?)
        };
        Ok(())
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn status(&self) -> Option<EquipmentStatus> {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none()
    }

    pub fn matches(&self, equipment: &Equipment) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| equipment.category() == c);
        let status_ok = self.status.is_none_or(|s| equipment.status() == s);
        category_ok && status_ok
    }

    /// Matching records, original order preserved.
    pub fn apply<'a>(&self, equipments: &'a [Equipment]) -> Vec<&'a Equipment> {
        equipments.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Aggregate counters shown above the list.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total: usize,
    pub available: usize,
    pub borrowed: usize,
}

impl InventorySummary {
    pub fn of(equipments: &[Equipment]) -> Self {
        equipments.iter().fold(Self::default(), |mut acc, e| {
            acc.total += 1;
            match e.status() {
                EquipmentStatus::Available => acc.available += 1,
                EquipmentStatus::Borrowed => acc.borrowed += 1,
            }
            acc
        })
    }
}
