//! Text rendering of the store's derived views.

use std::fmt::{self, Write};

use eggman_inventory::{CATEGORY_OPTIONS, EquipmentStatus, InventoryStore};
use eggman_storage::KeyValueStore;

fn category_label(value: &str) -> &str {
    CATEGORY_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

fn status_label(status: EquipmentStatus) -> &'static str {
    match status {
        EquipmentStatus::Available => "Disponível",
        EquipmentStatus::Borrowed => "Emprestado",
    }
}

/// Full screen: counters, filter line, list, form.
pub fn screen<S: KeyValueStore>(store: &InventoryStore<S>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, store);
    out
}

fn write_screen<S: KeyValueStore>(out: &mut String, store: &InventoryStore<S>) -> fmt::Result {
    let summary = store.summary();
    writeln!(
        out,
        "Total: {}  Disponíveis: {}  Emprestados: {}",
        summary.total, summary.available, summary.borrowed
    )?;

    let filter = store.filter();
    if !filter.is_empty() {
        writeln!(
            out,
            "Filtro: categoria={} status={}",
            filter.category().unwrap_or("*"),
            filter.status().map(|s| s.as_str()).unwrap_or("*"),
        )?;
    }

    let rows = store.filtered_equipments();
    if rows.is_empty() {
        writeln!(out, "  (nenhum equipamento)")?;
    }
    for (i, e) in rows.iter().enumerate() {
        writeln!(
            out,
            "  {:>3}. {:<24} {:<10} {:<12} {}",
            i + 1,
            e.name(),
            category_label(e.category()),
            e.patrimony(),
            status_label(e.status()),
        )?;
    }

    let draft = store.draft();
    let title = if store.is_editing() {
        "Editar equipamento"
    } else {
        "Novo equipamento"
    };
    writeln!(out, "-- {title} --")?;
    writeln!(out, "  nome: {}", draft.name)?;
    writeln!(out, "  categoria: {}", draft.category)?;
    writeln!(out, "  patrimônio: {}", draft.patrimony)?;
    writeln!(out, "  status: {}", draft.status)?;
    if !store.is_form_valid() {
        writeln!(out, "  (preencha nome, categoria e patrimônio para salvar)")?;
    }
    Ok(())
}
