//! Browse CLI command handler

use std::io;

use crate::cli::commands::BrowseArgs;
use crate::core::{AppRegistry, Reporter, Settings};
use crate::error::Result;
use crate::store::RecordStore;
use crate::tui::terminal::{install_termination_signals, TerminalRestorer};
use crate::tui::{Browser, CrosstermTerminal};

/// Launch the interactive browser for an app
pub fn handle_browse(args: BrowseArgs, settings: &Settings) -> Result<()> {
    let registry = AppRegistry::new(&settings.apps_dir);

    // Configuration problems surface before any store or terminal access
    let app = registry.load_with_database(&args.app)?;
    let store = RecordStore::new(settings.databases_dir(), registry).with_model(args.model);
    store.target_table(&args.app)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut terminal = CrosstermTerminal;
    let _signals = install_termination_signals(TerminalRestorer::crossterm())?;

    Browser::new(&store, args.app, stdin.lock(), stdout.lock())
        .with_display(app.display)
        .with_reporter(Reporter::new(settings.quiet))
        .run(&mut terminal)?;
    Ok(())
}
