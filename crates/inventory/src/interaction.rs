//! Seams between the store and whatever renders it.

use std::time::Duration;

/// Text shown when asking the user to confirm a removal.
pub const DELETE_PROMPT: &str = "Tem certeza que deseja remover este equipamento?";

/// How long the UI waits after a redraw before moving focus.
pub const FOCUS_DELAY: Duration = Duration::from_millis(100);

/// Blocking yes/no prompt.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Category,
    Patrimony,
    Status,
}

/// Request to move input focus once the form has been redrawn.
///
/// Returned by [`InventoryStore::edit_equipment`](crate::InventoryStore::edit_equipment);
/// the rendering layer performs it after its next render pass, so the target
/// control exists when focus lands.
#[must_use = "the rendering layer must focus the field after the next redraw"]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub field: FormField,
    pub delay: Duration,
}

impl FocusRequest {
    pub fn name_field() -> Self {
        Self {
            field: FormField::Name,
            delay: FOCUS_DELAY,
        }
    }
}
