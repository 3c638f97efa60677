//! Apps CLI command handler

use crate::core::{AppRegistry, Reporter, Settings};
use crate::error::Result;

/// List declared apps
pub fn handle_apps(settings: &Settings) -> Result<()> {
    let reporter = Reporter::new(settings.quiet);
    let registry = AppRegistry::new(&settings.apps_dir);
    let apps = registry.list()?;

    if apps.is_empty() {
        reporter.info(format!(
            "no apps found in {}",
            registry.apps_dir().display()
        ));
        return Ok(());
    }

    for app in apps {
        println!("  {}", app);
    }
    Ok(())
}
