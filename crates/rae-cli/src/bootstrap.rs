use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load `.env` and the layered configuration for the project directory.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<rae_config::RaeConfig> {
    let root = project_root(flags)?;
    load_dotenv(&root)?;
    rae_config::RaeConfig::load_in(&root, &[]).context("failed to load configuration")
}

fn project_root(flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    match &flags.project_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if !dir.is_dir() {
                anyhow::bail!(
                    "invalid --project-dir '{}': directory does not exist",
                    dir.display()
                );
            }
            Ok(dir)
        }
        None => std::env::current_dir().context("failed to read current directory"),
    }
}

fn load_dotenv(root: &Path) -> anyhow::Result<()> {
    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
