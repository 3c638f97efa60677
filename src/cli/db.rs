//! Database CLI command handlers

use std::io::{self, Read};

use tracing::warn;

use crate::cli::commands::{DbArgs, DbCommand};
use crate::core::{AppRegistry, Reporter, Settings};
use crate::error::{DouglasError, Result};
use crate::store::RecordStore;

/// Handle database commands
pub fn handle_db(args: DbArgs, settings: &Settings) -> Result<()> {
    let reporter = Reporter::new(settings.quiet);
    let registry = AppRegistry::new(&settings.apps_dir);
    let store = RecordStore::new(settings.databases_dir(), registry.clone()).with_model(args.model);

    match args.command {
        DbCommand::List => handle_list(&store, &reporter),
        DbCommand::Init { app } => handle_init(&store, &registry, app, &reporter),
        DbCommand::Save { app, content } => handle_save(&store, &app, content),
        DbCommand::Entries { app } => handle_entries(&store, &registry, &app, &reporter),
        DbCommand::Count { app } => {
            println!("{}", store.count(&app)?);
            Ok(())
        }
        DbCommand::Delete { app, ids } => handle_delete(&store, &app, &ids),
    }
}

fn handle_list(store: &RecordStore<AppRegistry>, reporter: &Reporter) -> Result<()> {
    if !store.databases_dir().exists() {
        reporter.info("no databases directory");
        return Ok(());
    }

    let databases = store.list_databases()?;
    if databases.is_empty() {
        reporter.info("no databases found");
        return Ok(());
    }

    for db in databases {
        println!("{:<20} {:>8}", db.app_name, format_size(db.size));
    }
    Ok(())
}

/// Boot sequence: make sure every app's tables exist
fn handle_init(
    store: &RecordStore<AppRegistry>,
    registry: &AppRegistry,
    app: Option<String>,
    reporter: &Reporter,
) -> Result<()> {
    let apps = match app {
        Some(name) => {
            // An explicitly named app must exist and declare a database
            registry.load_with_database(&name)?;
            vec![name]
        }
        None => registry.list()?,
    };

    let mut ready = 0;
    for name in apps {
        let config = match registry.load(&name) {
            Ok(config) => config,
            Err(e) => {
                warn!(app = %name, "skipping app: {}", e);
                reporter.error(format!("⚠️  Error processing {}: {}", name, e));
                continue;
            }
        };
        if !config.has_database() {
            continue;
        }

        match store.init(&name, config.models()) {
            Ok(created) => {
                if created {
                    reporter.info(format!("📊 Created tables in {}.db", name));
                }
                ready += 1;
            }
            Err(e) => reporter.error(format!("❌ Database initialization error for {}: {}", name, e)),
        }
    }

    if ready > 0 {
        reporter.info(format!("✅ {} database(s) ready", ready));
        reporter.info(format!(
            "📂 Database location: {}",
            store.databases_dir().display()
        ));
    } else {
        reporter.info("✅ No databases required");
    }
    Ok(())
}

fn handle_save(store: &RecordStore<AppRegistry>, app: &str, content: String) -> Result<()> {
    let content = if content == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end_matches('\n').to_string()
    } else {
        content
    };

    if content.trim().is_empty() {
        return Err(DouglasError::InvalidInput(
            "Record content is empty.".to_string(),
        ));
    }
    if serde_json::from_str::<serde_json::Value>(&content).is_err() {
        warn!(app, "saving content that is not valid JSON");
    }

    let id = store.save(app, &content)?;
    println!("{}", id);
    Ok(())
}

fn handle_entries(
    store: &RecordStore<AppRegistry>,
    registry: &AppRegistry,
    app: &str,
    reporter: &Reporter,
) -> Result<()> {
    let display = registry.load(app)?.display;
    let entries = store.list(app)?;

    if entries.is_empty() {
        reporter.info("📭 No entries found in database");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:>6}  {}  {}",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.display_name_with(&display)
        );
    }
    Ok(())
}

fn handle_delete(store: &RecordStore<AppRegistry>, app: &str, ids: &[i64]) -> Result<()> {
    if let [id] = ids {
        if store.delete(app, *id)? {
            println!("deleted entry {}", id);
            return Ok(());
        }
        return Err(DouglasError::InvalidInput(format!(
            "Entry #{} does not exist.\n\n  → Run 'douglas db entries {}' to see existing entries.",
            id, app
        )));
    }

    let removed = store.delete_many(app, ids)?;
    println!("deleted {} of {} entries", removed, ids.len());
    Ok(())
}

/// Human-friendly file size: bytes, then whole KiB, then MiB with a decimal
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{}b", bytes)
    } else if bytes < MIB {
        format!("{:.0}k", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1}m", bytes as f64 / MIB as f64)
    }
}
