//! Line commands accepted by `menu edit`.

use crate::menu::{Direction, LocalId};

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Show,
    Add {
        parent: Option<LocalId>,
        title: String,
        url: Option<String>,
    },
    Rename {
        id: LocalId,
        title: String,
        url: Option<String>,
    },
    Delete(LocalId),
    Move(LocalId, Direction),
    Drag {
        active: LocalId,
        over: LocalId,
    },
    Save,
    Cancel,
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  show                              print the menu tree
  add <parent|-> <title> [--url U]  add an entry (- for top level)
  rename <id> <title> [--url U]     change title and link
  delete <id>                       delete an entry and its children
  up <id> | down <id>               reorder among siblings (then save or cancel)
  drag <id> <over-id>               move an entry onto a sibling's position
  save                              save pending up/down reordering
  cancel                            discard pending up/down reordering
  reload                            reload the menu from the server
  help                              show this help
  quit                              leave the editor";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    let verb = words.remove(0).to_ascii_lowercase();

    let command = match verb.as_str() {
        "show" | "ls" => ReplCommand::Show,
        "add" => {
            let (words, url) = take_url(words)?;
            let (parent, title) = words
                .split_first()
                .ok_or_else(|| "usage: add <parent|-> <title> [--url U]".to_string())?;
            let parent = match *parent {
                "-" => None,
                id => Some(id.parse()?),
            };
            ReplCommand::Add {
                parent,
                title: title.join(" "),
                url,
            }
        }
        "rename" | "edit" => {
            let (words, url) = take_url(words)?;
            let (id, title) = words
                .split_first()
                .ok_or_else(|| "usage: rename <id> <title> [--url U]".to_string())?;
            ReplCommand::Rename {
                id: id.parse()?,
                title: title.join(" "),
                url,
            }
        }
        "delete" | "rm" => ReplCommand::Delete(single_id(&words, "delete <id>")?),
        "up" => ReplCommand::Move(single_id(&words, "up <id>")?, Direction::Up),
        "down" => ReplCommand::Move(single_id(&words, "down <id>")?, Direction::Down),
        "drag" => match words.as_slice() {
            [active, over] => ReplCommand::Drag {
                active: active.parse()?,
                over: over.parse()?,
            },
            _ => return Err("usage: drag <id> <over-id>".to_string()),
        },
        "save" | "confirm" => ReplCommand::Save,
        "cancel" => ReplCommand::Cancel,
        "reload" => ReplCommand::Reload,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn single_id(words: &[&str], usage: &str) -> Result<LocalId, String> {
    match words {
        [id] => id.parse(),
        _ => Err(format!("usage: {}", usage)),
    }
}

/// Pull `--url VALUE` out of the word list
fn take_url(words: Vec<&str>) -> Result<(Vec<&str>, Option<String>), String> {
    let Some(pos) = words.iter().position(|w| *w == "--url") else {
        return Ok((words, None));
    };
    let url = words
        .get(pos + 1)
        .map(|u| u.to_string())
        .ok_or_else(|| "--url needs a value".to_string())?;
    let rest = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pos && *i != pos + 1)
        .map(|(_, w)| *w)
        .collect();
    Ok((rest, Some(url)))
}
