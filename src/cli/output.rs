//! Output formatting utilities for CLI operations.

use std::io::Write;

use pendant::{FileView, RepositoryItem, ReviewPresentation};

use super::CliError;

/// Writes one repository caption per line, followed by a count.
pub fn write_repositories<W: Write>(
    writer: &mut W,
    items: &[RepositoryItem],
    filter: Option<&str>,
) -> Result<(), CliError> {
    for item in items {
        writeln!(writer, "{}\t{}", item.caption, item.url)?;
    }
    match filter.filter(|text| !text.trim().is_empty()) {
        Some(text) => writeln!(writer, "{} repositories match '{text}'", items.len())?,
        None => writeln!(writer, "{} repositories", items.len())?,
    }
    Ok(())
}

/// Writes the reconciled review with its changed files.
pub fn write_presentation<W: Write>(
    writer: &mut W,
    presentation: &ReviewPresentation,
) -> Result<(), CliError> {
    let snapshot = &presentation.pull_request;
    writeln!(writer, "{}: {}", snapshot.locator, snapshot.title)?;

    match (&presentation.model, presentation.state) {
        (Some(review), Some(state)) => writeln!(writer, "Review {} [{state}]", review.id)?,
        _ => writeln!(writer, "New pending review")?,
    }
    if presentation.is_pending {
        writeln!(writer, "Pending: yes")?;
    }
    if !presentation.body.is_empty() {
        writeln!(writer, "Body: {}", presentation.body)?;
    }

    writeln!(writer, "Files ({}):", presentation.files.len())?;
    for file in &presentation.files {
        write_file(writer, file)?;
    }
    Ok(())
}

fn write_file<W: Write>(writer: &mut W, file: &FileView) -> Result<(), CliError> {
    let diff = &file.diff;
    let path = diff.old_path.as_ref().map_or_else(
        || diff.path.clone(),
        |old| format!("{old} -> {}", diff.path),
    );
    writeln!(
        writer,
        "  {} {path} (+{} -{}) threads: {}",
        diff.status,
        diff.additions,
        diff.deletions,
        file.threads.len()
    )?;
    Ok(())
}
