use anyhow::Context;
use tokio::io::AsyncReadExt;

use rae_sync::AppContext;
use rae_sync::tools::ContentTools;
use serde_json::json;

use crate::cli::root_commands::SpellcheckArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

/// Handle `rae spellcheck`.
pub async fn spellcheck(
    args: &SpellcheckArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        }
    };

    let spinner = Progress::spinner("correcting");
    let result = ContentTools::new(ctx).correct_text(&text).await;
    spinner.finish_clear();
    let corrected = result?;

    if flags.format == OutputFormat::Table {
        println!("{corrected}");
        return Ok(());
    }
    output(&json!({ "original": text, "correction": corrected }), flags.format)
}
