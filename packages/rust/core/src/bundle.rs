//! Output bundle writer.
//!
//! Writes the files of a finished run to an output directory:
//! ```text
//! <dir>/
//! ├── <slug>_<YYYYMMDD_HHMMSS>_post.txt
//! ├── <slug>_<YYYYMMDD_HHMMSS>_research.md     (optional)
//! └── <slug>_<YYYYMMDD_HHMMSS>_metadata.json
//! ```

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, instrument};

use postcraft_shared::{ExecutionResult, PostcraftError, Result};

const SLUG_MAX_CHARS: usize = 50;
const RULE_WIDTH: usize = 80;

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub post: PathBuf,
    pub research: Option<PathBuf>,
    pub metadata: PathBuf,
}

/// File-name slug for a topic: lowercased, spaces to underscores, 50 chars.
///
/// Path separators are replaced too so the slug always names a single file.
pub fn topic_slug(topic: &str) -> String {
    topic
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .take(SLUG_MAX_CHARS)
        .collect()
}

/// Write the bundle for `result` into `dir`, creating it if needed.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn save_bundle(result: &ExecutionResult, dir: &Path, save_research: bool) -> Result<BundlePaths> {
    std::fs::create_dir_all(dir).map_err(|e| PostcraftError::io(dir, e))?;

    let prefix = format!(
        "{}_{}",
        topic_slug(&result.topic),
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let post = dir.join(format!("{prefix}_post.txt"));
    write_atomic(&post, &result.linkedin_post)?;

    let research = if save_research {
        let path = dir.join(format!("{prefix}_research.md"));
        write_atomic(&path, &result.research_report)?;
        Some(path)
    } else {
        None
    };

    let metadata_json = serde_json::to_string_pretty(&result.metadata).map_err(|e| {
        PostcraftError::validation(format!("JSON serialization failed: {e}"))
    })?;
    let metadata = dir.join(format!("{prefix}_metadata.json"));
    write_atomic(&metadata, &metadata_json)?;

    info!(post = %post.display(), "bundle saved");

    Ok(BundlePaths {
        post,
        research,
        metadata,
    })
}

/// Write through a temp file and rename into place.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| PostcraftError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| PostcraftError::io(target, e))?;

    debug!(path = %target.display(), size = content.len(), "wrote file");
    Ok(())
}

/// Plain-text block showing the post and its run metadata.
pub fn render_summary(result: &ExecutionResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let meta = &result.metadata;

    let mut out = format!(
        "{rule}\nLINKEDIN POST (READY TO PUBLISH)\n{rule}\n\n{post}\n\n{rule}\nMETADATA\n{rule}\n",
        post = result.linkedin_post,
    );
    out.push_str(&format!("Research Steps: {}\n", meta.research_steps));
    out.push_str(&format!("Post Length: {} characters\n", meta.post_length));
    out.push_str(&format!("Model Used: {}\n", meta.model_used));
    out.push_str(if meta.validation.valid {
        "Validation: ✓ Passed\n"
    } else {
        "Validation: ⚠ Warnings\n"
    });

    if !meta.validation.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &meta.validation.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}
