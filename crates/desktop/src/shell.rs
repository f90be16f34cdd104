//! Interactive loop: read a command, run it against the store, redraw.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use eggman_core::Entity;
use eggman_events::Subscription;
use eggman_inventory::{
    Confirm, DeleteOutcome, EquipmentId, FocusRequest, FormField, InventoryChange, InventoryError,
    InventoryStore, SaveOutcome,
};
use eggman_storage::KeyValueStore;

use crate::command::{Command, HELP};
use crate::render;

/// Line-oriented terminal. Interior mutability lets the same terminal serve
/// as the store's [`Confirm`] collaborator while the shell holds it.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn write(&self, text: &str) -> io::Result<()> {
        let mut out = self.output.borrow_mut();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    /// Show `prompt` and read one line. `None` at end of input.
    pub fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        self.write(prompt)?;
        let mut line = String::new();
        let n = self.input.borrow_mut().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> Confirm for Terminal<R, W> {
    fn confirm(&self, message: &str) -> bool {
        match self.read_line(&format!("{message} [s/N] ")) {
            Ok(Some(answer)) => matches!(
                answer.trim().to_lowercase().as_str(),
                "s" | "sim" | "y" | "yes"
            ),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(%err, "confirmation prompt failed; treating as no");
                false
            }
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<S, R, W>
where
    S: KeyValueStore,
{
    store: InventoryStore<S>,
    changes: Subscription<InventoryChange>,
    terminal: Terminal<R, W>,
    /// Focus to perform once the next redraw is on screen.
    pending_focus: Option<FocusRequest>,
}

impl<S, R, W> Shell<S, R, W>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    pub fn new(store: InventoryStore<S>, terminal: Terminal<R, W>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            changes,
            terminal,
            pending_focus: None,
        }
    }

    pub fn store(&self) -> &InventoryStore<S> {
        &self.store
    }

    pub fn into_parts(self) -> (InventoryStore<S>, Terminal<R, W>) {
        (self.store, self.terminal)
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.redraw()?;
        loop {
            if let Some(focus) = self.pending_focus.take() {
                // Render has happened; the field exists now.
                if !self.focus(focus)? {
                    return Ok(());
                }
                self.redraw()?;
                continue;
            }

            let Some(line) = self.terminal.read_line("> ").context("failed to read command")? else {
                return Ok(());
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(crate::ParseCommandError::Empty) => continue,
                Err(err) => {
                    self.say(&err.to_string())?;
                    continue;
                }
            };

            if let Flow::Quit = self.dispatch(command)? {
                return Ok(());
            }
            self.redraw()?;
        }
    }

    fn dispatch(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::SetName(v) => self.store.draft_mut().name = v,
            Command::SetCategory(v) => self.store.draft_mut().category = v,
            Command::SetPatrimony(v) => self.store.draft_mut().patrimony = v,
            Command::SetStatus(v) => match v.parse() {
                Ok(status) => self.store.draft_mut().status = status,
                Err(err) => self.say(&err.to_string())?,
            },
            Command::Save => match self.store.save_equipment() {
                Ok(SaveOutcome::Rejected) => {
                    self.say("formulário incompleto: nome, categoria e patrimônio são obrigatórios")?
                }
                Ok(SaveOutcome::Stale(_)) => self.say("o equipamento editado não existe mais")?,
                Ok(SaveOutcome::Created(_) | SaveOutcome::Updated(_)) => {}
                Err(err) => self.write_failed(err)?,
            },
            Command::Edit(row) => {
                if let Some(record) = self.row(row)?.and_then(|id| self.store.find(&id).cloned()) {
                    self.pending_focus = Some(self.store.edit_equipment(&record));
                }
            }
            Command::Cancel => self.store.cancel_edit(),
            Command::Delete(row) => {
                if let Some(id) = self.row(row)? {
                    match self.store.delete_equipment(&id, &self.terminal) {
                        Ok(DeleteOutcome::Deleted | DeleteOutcome::Declined) => {}
                        Ok(DeleteOutcome::NotFound) => self.say("equipamento não encontrado")?,
                        Err(err) => self.write_failed(err)?,
                    }
                }
            }
            Command::FilterCategory(v) => self.store.set_category_filter(&v),
            Command::FilterStatus(v) => {
                if let Err(err) = self.store.set_status_filter(&v) {
                    self.say(&err.to_string())?;
                }
            }
            Command::ClearFilters => self.store.clear_filters(),
            // Every command is followed by a redraw.
            Command::List => {}
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// A refused write leaves the store untouched, so the session goes on and
    /// the user can retry. Anything else is fatal.
    fn write_failed(&self, err: InventoryError) -> anyhow::Result<()> {
        match err {
            InventoryError::Storage(err) => {
                tracing::warn!(%err, "write failed; collection and draft kept");
                self.say(&format!("falha ao gravar: {err}"))
            }
            other => Err(other.into()),
        }
    }

    /// Resolve a 1-based row of the filtered list to an id.
    fn row(&self, row: usize) -> anyhow::Result<Option<EquipmentId>> {
        let id = self
            .store
            .filtered_equipments()
            .get(row - 1)
            .map(|e| e.id().clone());
        if id.is_none() {
            self.say(&format!("linha {row} não existe"))?;
        }
        Ok(id)
    }

    /// Put the cursor on `focus.field`. Returns false at end of input.
    fn focus(&mut self, focus: FocusRequest) -> anyhow::Result<bool> {
        tracing::debug!(field = ?focus.field, delay_ms = focus.delay.as_millis() as u64, "moving focus");
        std::thread::sleep(focus.delay);

        let draft = self.store.draft();
        let (label, current) = match focus.field {
            FormField::Name => ("nome", draft.name.clone()),
            FormField::Category => ("categoria", draft.category.clone()),
            FormField::Patrimony => ("patrimônio", draft.patrimony.clone()),
            FormField::Status => ("status", draft.status.to_string()),
        };

        let Some(value) = self
            .terminal
            .read_line(&format!("{label} [{current}]: "))
            .context("failed to read field")?
        else {
            return Ok(false);
        };
        if value.trim().is_empty() {
            return Ok(true);
        }

        let draft = self.store.draft_mut();
        match focus.field {
            FormField::Name => draft.name = value,
            FormField::Category => draft.category = value,
            FormField::Patrimony => draft.patrimony = value,
            FormField::Status => match value.parse() {
                Ok(status) => draft.status = status,
                Err(err) => self.say(&err.to_string())?,
            },
        }
        Ok(true)
    }

    fn redraw(&self) -> anyhow::Result<()> {
        let changes = self.changes.drain();
        if !changes.is_empty() {
            tracing::trace!(?changes, "store changed");
        }
        self.terminal
            .write(&render::screen(&self.store))
            .context("failed to draw screen")
    }

    fn say(&self, message: &str) -> anyhow::Result<()> {
        self.terminal
            .write(&format!("{message}\n"))
            .context("failed to write message")
    }
}
