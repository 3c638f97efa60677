//! Record browser state and session loop

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use tracing::{debug, error};

use crate::core::Reporter;
use crate::error::{DouglasError, Result};
use crate::store::{DisplayFields, Entry, ModelCatalog, RecordStore};
use crate::tui::input::{Key, KeyDecoder};
use crate::tui::terminal::{RawModeGuard, RawTerminal};
use crate::tui::ui::{self, Status};

/// Rows per page
pub const PAGE_SIZE: usize = 10;

/// What the session loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    ConfirmDelete,
    Quit,
    Interrupt,
}

/// How a browsing session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Nothing to browse; raw mode was never entered
    Empty,
    Quit,
    Interrupted,
    /// The last entries were deleted
    AllDeleted,
}

/// Cursor, page and selection over a snapshot of entries
#[derive(Debug, Clone)]
pub struct BrowserState {
    entries: Vec<Entry>,
    page_size: usize,
    current_page: usize,
    cursor_pos: usize,
    /// Absolute indices into `entries`
    selected_indices: BTreeSet<usize>,
}

impl BrowserState {
    pub fn new(entries: Vec<Entry>, page_size: usize) -> Self {
        Self {
            entries,
            page_size: page_size.max(1),
            current_page: 0,
            cursor_pos: 0,
            selected_indices: BTreeSet::new(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn selected_indices(&self) -> &BTreeSet<usize> {
        &self.selected_indices
    }

    /// `ceil(len / page_size)`
    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.page_size)
    }

    /// Absolute index of the first row on the current page
    pub fn page_offset(&self) -> usize {
        self.current_page * self.page_size
    }

    pub fn page_entries(&self) -> &[Entry] {
        let start = self.page_offset().min(self.entries.len());
        let end = (start + self.page_size).min(self.entries.len());
        &self.entries[start..end]
    }

    fn rows_on_page(&self) -> usize {
        self.page_entries().len()
    }

    fn has_next_page(&self) -> bool {
        (self.current_page + 1) * self.page_size < self.entries.len()
    }

    /// Absolute index of the row under the cursor
    pub fn cursor_index(&self) -> usize {
        self.page_offset() + self.cursor_pos
    }

    pub fn move_up(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
        } else if self.current_page > 0 {
            self.current_page -= 1;
            self.cursor_pos = self.rows_on_page().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_pos + 1 < self.rows_on_page() {
            self.cursor_pos += 1;
        } else if self.has_next_page() {
            self.current_page += 1;
            self.cursor_pos = 0;
        }
    }

    pub fn toggle_selection(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let index = self.cursor_index();
        if !self.selected_indices.remove(&index) {
            self.selected_indices.insert(index);
        }
    }

    /// Selected entries in display order
    pub fn selected_entries(&self) -> Vec<&Entry> {
        self.selected_indices
            .iter()
            .filter_map(|&i| self.entries.get(i))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected_entries().iter().map(|e| e.id).collect()
    }

    /// Snapshot with the selected entries dropped, cursor back at the top
    pub fn without_selected(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.selected_indices.contains(i))
            .map(|(_, entry)| entry.clone())
            .collect();
        Self::new(entries, self.page_size)
    }

    /// Apply a key while browsing
    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Up => self.move_up(),
            Key::Down => self.move_down(),
            Key::Space => self.toggle_selection(),
            Key::Delete if !self.selected_indices.is_empty() => return Action::ConfirmDelete,
            Key::Quit => return Action::Quit,
            Key::Interrupt => return Action::Interrupt,
            Key::Delete | Key::Other(_) | Key::Escape(_) => {}
        }
        Action::None
    }
}

/// `y` / `yes`, any case
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// First line of an error message; status lines are a single row
fn headline(err: &DouglasError) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

/// Interactive browser for one app's records
pub struct Browser<'s, C, R, W> {
    store: &'s RecordStore<C>,
    app_name: String,
    display: DisplayFields,
    reporter: Reporter,
    input: R,
    output: W,
}

impl<'s, C, R, W> Browser<'s, C, R, W>
where
    C: ModelCatalog,
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'s RecordStore<C>, app_name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            store,
            app_name: app_name.into(),
            display: DisplayFields::default(),
            reporter: Reporter::default(),
            input,
            output,
        }
    }

    pub fn with_display(mut self, display: DisplayFields) -> Self {
        self.display = display;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run one session, from loading to exit.
    ///
    /// Raw mode is only entered when there is something to browse, and is
    /// released before this returns, whatever the outcome.
    pub fn run<T: RawTerminal>(&mut self, terminal: &mut T) -> Result<SessionEnd> {
        self.say(format!("🗄️  Browsing {} database", self.app_name))?;
        self.say("🔍 Loading entries...")?;

        let entries = self.load_entries();
        if entries.is_empty() {
            writeln!(self.output, "📭 No entries found in database")?;
            return Ok(SessionEnd::Empty);
        }
        self.say(format!("📊 Found {} entries", entries.len()))?;

        let mut state = BrowserState::new(entries, PAGE_SIZE);
        let mut guard = RawModeGuard::acquire(terminal)?;
        let end = self.browse(&mut state, &mut guard);
        drop(guard);

        // Back in cooked mode from here on
        ui::Frame::default().write_to(&mut self.output)?;
        let end = end?;
        match end {
            SessionEnd::AllDeleted => writeln!(self.output, "📭 All entries deleted!")?,
            SessionEnd::Interrupted => writeln!(self.output, "👋 Exiting database browser")?,
            SessionEnd::Quit | SessionEnd::Empty => {}
        }
        self.output.flush()?;
        Ok(end)
    }

    fn browse<T: RawTerminal>(
        &mut self,
        state: &mut BrowserState,
        guard: &mut RawModeGuard<'_, T>,
    ) -> Result<SessionEnd> {
        let mut status: Option<Status> = None;

        loop {
            ui::render(&self.app_name, state, &self.display, status.as_ref())
                .write_to(&mut self.output)?;

            let key = KeyDecoder::new(&mut self.input).next_key()?;
            debug!(?key, "key");

            match state.handle_key(key) {
                Action::None => {}
                Action::Quit => return Ok(SessionEnd::Quit),
                Action::Interrupt => return Ok(SessionEnd::Interrupted),
                Action::ConfirmDelete => {
                    if !guard.suspend(|| self.confirm(state))?? {
                        status = Some(Status::Notice("❌ Deletion cancelled".to_string()));
                        continue;
                    }

                    // Selection is kept when nothing was deleted
                    let removed = match self.store.delete_many(&self.app_name, &state.selected_ids()) {
                        Ok(removed) => removed,
                        Err(e) => {
                            error!(app = %self.app_name, "delete failed: {}", e);
                            status = Some(Status::Error(format!("❌ Delete failed: {}", headline(&e))));
                            continue;
                        }
                    };

                    match self.store.list(&self.app_name) {
                        Ok(entries) if entries.is_empty() => return Ok(SessionEnd::AllDeleted),
                        Ok(entries) => {
                            *state = BrowserState::new(entries, state.page_size());
                            status = Some(Status::Success(format!("✅ Deleted {} entries", removed)));
                        }
                        Err(e) => {
                            error!(app = %self.app_name, "reloading entries failed: {}", e);
                            *state = state.without_selected();
                            if state.entries().is_empty() {
                                return Ok(SessionEnd::AllDeleted);
                            }
                            status = Some(Status::Error(format!(
                                "⚠️  Deleted {} entries, but reloading failed: {}",
                                removed,
                                headline(&e)
                            )));
                        }
                    }
                }
            }
        }
    }

    /// Ask for confirmation with a full line read; EOF counts as "no"
    fn confirm(&mut self, state: &BrowserState) -> Result<bool> {
        ui::render_confirmation(&state.selected_entries(), &self.display)
            .write_to(&mut self.output)?;
        write!(self.output, "Are you sure? [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        let read = self.input.read_line(&mut answer)?;
        Ok(read > 0 && is_affirmative(&answer))
    }

    fn load_entries(&self) -> Vec<Entry> {
        match self.store.list(&self.app_name) {
            Ok(entries) => entries,
            Err(e) => {
                error!(app = %self.app_name, "loading entries failed: {}", e);
                self.reporter.error(format!("❌ {}", e));
                Vec::new()
            }
        }
    }

    fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        if !self.reporter.is_quiet() {
            writeln!(self.output, "{}", message.as_ref())?;
        }
        Ok(())
    }
}
