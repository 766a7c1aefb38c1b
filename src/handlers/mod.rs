use std::fmt::Write;

use crate::{
    models::{Note, NoteState},
    repository::NotesApi,
    service::NoteManager,
};

pub const USAGE: &str = "\
Commands:
  list              reload notes from the store
  show <id>         fetch one note from the store
  edit <id>         copy a listed note into the form
  title <text>      set the form title
  content <text>    set the form content
  clear             discard the form
  save              create or update the note in the form
  delete <id>       delete a note
  help              show this message
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(i64),
    Edit(i64),
    Title(String),
    Content(String),
    Clear,
    Save,
    Delete(i64),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' expects a note id")]
    MissingId(&'static str),

    #[error("Invalid note id '{0}'")]
    InvalidId(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match name {
            "" => Err(ParseError::Empty),
            "list" => Ok(Self::List),
            "show" => parse_id("show", rest).map(Self::Show),
            "edit" => parse_id("edit", rest).map(Self::Edit),
            "delete" => parse_id("delete", rest).map(Self::Delete),
            "title" => Ok(Self::Title(rest.to_string())),
            "content" => Ok(Self::Content(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "save" => Ok(Self::Save),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(command: &'static str, arg: &str) -> Result<i64, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingId(command));
    }
    arg.parse()
        .map_err(|_| ParseError::InvalidId(arg.to_string()))
}

/// Runs one command. Returns text to print before the screen is redrawn, if any.
pub async fn execute<A: NotesApi>(manager: &NoteManager<A>, command: Command) -> Option<String> {
    match command {
        Command::List => manager.load_all().await,
        Command::Show(id) => {
            return Some(match manager.fetch(id).await {
                Ok(note) => render_note(&note),
                Err(e) => format!("Could not fetch note {id}: {e}"),
            });
        }
        Command::Edit(id) => {
            if !manager.edit(id).await {
                return Some(format!("No note with id {id} in the list"));
            }
        }
        Command::Title(title) => manager.set_title(title).await,
        Command::Content(content) => manager.set_content(content).await,
        Command::Clear => manager.clear().await,
        Command::Save => manager.submit().await,
        Command::Delete(id) => manager.remove(id).await,
        Command::Help => return Some(USAGE.to_string()),
        Command::Quit => {}
    }
    None
}

fn render_note(note: &Note) -> String {
    format!("#{} {}\n    {}", note.id, note.title, note.content)
}

pub fn render(state: &NoteState) -> String {
    let mut out = String::new();

    if let Some(status) = &state.status {
        let _ = writeln!(out, "[{status}]");
    }

    let draft = state.editing.clone().unwrap_or_default();
    let heading = if draft.is_persisted() {
        format!("Editing note #{}", draft.id)
    } else {
        "New note".to_string()
    };
    let _ = writeln!(out, "-- {heading} --");
    let _ = writeln!(out, "title:   {}", draft.title);
    let _ = writeln!(out, "content: {}", draft.content);

    let _ = writeln!(out, "-- Notes --");
    if state.loading {
        let _ = writeln!(out, "(loading...)");
    }
    if state.notes.is_empty() {
        let _ = writeln!(out, "No notes yet.");
    }
    for note in &state.notes {
        let _ = writeln!(out, "{}", render_note(note));
    }

    out
}
