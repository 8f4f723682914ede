//! Interactive prompts: migration confirmation and editing a day in `$EDITOR`.

use anyhow::{Context, Result};
use console::style;
use daylog_core::DayKey;
use dialoguer::{theme::ColorfulTheme, Confirm, Editor};

/// Ask before carrying open tasks over. Esc or Ctrl+C counts as no.
pub fn confirm_migration(from: DayKey, to: DayKey, items: &[String]) -> Result<bool> {
    println!();
    println!(
        "{}",
        style(format!("  Migrate {from} → {to}")).bold().cyan()
    );
    println!("{}", style("  ─────────────────────────────").dim());
    for item in items {
        println!("  {}", style(item).dim());
    }
    println!();

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Migrate {} open task(s)?", items.len()))
        .default(true)
        .interact_opt()
        .context("Failed to read confirmation")?;

    Ok(confirmed.unwrap_or(false))
}

/// Open a day's text in the user's editor.
///
/// Returns `None` if the editor was closed without saving.
pub fn edit_day(date: DayKey, text: &str) -> Result<Option<String>> {
    println!(
        "  {}",
        style(format!("Editing {date}... (save and close to continue)")).dim()
    );

    let edited = Editor::new()
        .extension(".log")
        .edit(text)
        .context("Failed to open editor")?;

    Ok(edited.map(strip_final_newline))
}

/// Editors usually end the file with a newline that isn't part of the log.
fn strip_final_newline(text: String) -> String {
    match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest).to_string(),
        None => text,
    }
}
