use std::io::Write;

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::config::resolve_backend;
use crate::cli::repl::{parse_line, ReplCommand, HELP};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::MenuBackend;
use crate::error::MenuResult;
use crate::menu::{flatten, Direction, MenuEditor, Tree};

pub async fn show(menu: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let backend = resolve_backend(menu)?;
    let mut editor = MenuEditor::new(backend);
    editor.load().await?;
    print_tree(editor.tree(), false, &output_format)
}

pub async fn edit(menu: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let backend = resolve_backend(menu)?;
    let menu = backend.menu().to_string();
    let mut editor = MenuEditor::new(backend);
    editor.load().await?;

    if let OutputFormat::Text = output_format {
        println!("Editing menu '{}'. Type 'help' for commands.", menu);
        print_tree(editor.tree(), false, &output_format)?;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&mut editor, stdin, &output_format).await
}

/// Read commands line by line until `quit` or end of input. Failed commands
/// are reported and the session carries on.
pub async fn run_session<B, R>(editor: &mut MenuEditor<B>, input: R, output_format: &OutputFormat) -> anyhow::Result<()>
where
    B: MenuBackend,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    prompt(editor.is_dirty(), output_format)?;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(ReplCommand::Help)) => println!("{}", HELP),
            Ok(Some(ReplCommand::Show)) => print_tree(editor.tree(), editor.is_dirty(), output_format)?,
            Ok(Some(command)) => match apply(editor, command).await {
                Ok(message) => {
                    output_success(output_format, &message, None)?;
                    if let OutputFormat::Text = output_format {
                        print_tree(editor.tree(), editor.is_dirty(), output_format)?;
                    }
                }
                Err(e) => output_error(output_format, &e.to_string(), Some(e.error_code()))?,
            },
            Err(message) => output_error(output_format, &message, Some("PARSE_ERROR"))?,
        }
        prompt(editor.is_dirty(), output_format)?;
    }

    if editor.is_dirty() {
        tracing::warn!("Leaving editor with an unsaved reorder, it was discarded");
    }
    Ok(())
}

async fn apply<B: MenuBackend>(editor: &mut MenuEditor<B>, command: ReplCommand) -> MenuResult<String> {
    let message = match command {
        ReplCommand::Add { parent, title, url } => match editor.add(parent, &title, url).await? {
            Some(_) => format!("Added '{}'", title.trim()),
            None => "Parent not found, nothing added".to_string(),
        },
        ReplCommand::Rename { id, title, url } => {
            if editor.rename(id, &title, url).await?.applied() {
                format!("Renamed #{} to '{}'", id, title.trim())
            } else {
                format!("Entry #{} not found", id)
            }
        }
        ReplCommand::Delete(id) => {
            if editor.delete(id).await?.applied() {
                format!("Deleted #{}", id)
            } else {
                format!("Entry #{} not found", id)
            }
        }
        ReplCommand::Move(id, direction) => {
            let label = match direction {
                Direction::Up => "up",
                Direction::Down => "down",
            };
            if editor.move_node(id, direction).applied() {
                format!("Moved #{} {} (use 'save' or 'cancel')", id, label)
            } else {
                format!("#{} cannot move {}", id, label)
            }
        }
        ReplCommand::Drag { active, over } => {
            if editor.drag_move(active, over).await?.applied() {
                format!("Moved #{} to the position of #{}", active, over)
            } else {
                "Nothing moved, entries must share a parent".to_string()
            }
        }
        ReplCommand::Save => {
            if editor.is_dirty() {
                editor.confirm().await?;
                "Order saved".to_string()
            } else {
                "Nothing to save".to_string()
            }
        }
        ReplCommand::Cancel => {
            if editor.is_dirty() {
                editor.cancel();
                "Reorder discarded".to_string()
            } else {
                "Nothing to cancel".to_string()
            }
        }
        ReplCommand::Reload => {
            editor.load().await?;
            format!("Reloaded {} items", editor.tree().len())
        }
        ReplCommand::Show | ReplCommand::Help | ReplCommand::Quit => String::new(),
    };
    Ok(message)
}

fn print_tree(tree: &Tree, dirty: bool, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "items": flatten(tree), "dirty": dirty }))?
            );
        }
        OutputFormat::Text => {
            if tree.is_empty() {
                println!("Menu is empty");
            } else {
                print!("{}", render_tree(tree));
            }
            if dirty {
                println!("(unsaved reorder pending)");
            }
        }
    }
    Ok(())
}

fn prompt(dirty: bool, output_format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Text = output_format {
        print!("{}", if dirty { "menu*> " } else { "menu> " });
        std::io::stdout().flush()?;
    }
    Ok(())
}
