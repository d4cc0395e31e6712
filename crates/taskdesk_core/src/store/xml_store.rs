//! XML task file codec.
//!
//! # Responsibility
//! - Write one `<tarefa>` node per task under a `<tarefas>` root.
//! - Parse such files back into `Task` values with their historical
//!   timestamp and state.
//!
//! # Invariants
//! - Each task node holds exactly five leaves: `titulo`, `descricao`,
//!   `dataCriacao`, `prioridade`, `estado`. No attributes are used.
//! - Leaf text is kept verbatim on load; no trimming.
//! - Written text is well-formed XML 1.0: `\r` is a character reference and
//!   other C0 controls are refused.
//! - A missing file loads as an empty collection.
//! - Decoding either yields every task or fails; there is no partial result.

use crate::model::task::{
    format_timestamp, parse_timestamp, ParsePriorityError, ParseTaskStateError, Priority, Task,
    TaskState,
};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

const ROOT_ELEMENT: &str = "tarefas";
const TASK_ELEMENT: &str = "tarefa";
const TITLE_ELEMENT: &str = "titulo";
const DESCRIPTION_ELEMENT: &str = "descricao";
const CREATED_AT_ELEMENT: &str = "dataCriacao";
const PRIORITY_ELEMENT: &str = "prioridade";
const STATE_ELEMENT: &str = "estado";
const INDENT_SIZE: usize = 2;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for task file save/load.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while reading, writing or creating directories.
    #[error("i/o failure on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// XML document could not be built.
    #[error("failed to build task document: {0}")]
    Encode(String),
    /// Document is not a well-formed task file.
    #[error("malformed task file: {0}")]
    Malformed(String),
    /// `dataCriacao` does not match the timestamp format.
    #[error("invalid creation timestamp `{value}`: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    UnknownPriority(#[from] ParsePriorityError),
    #[error(transparent)]
    UnknownState(#[from] ParseTaskStateError),
}

impl StoreError {
    /// Filesystem-level failure, as opposed to a serialization failure.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Writes `tasks` to `path`, creating missing parent directories.
///
/// # Errors
/// - `StoreError::Encode` when the document cannot be built.
/// - `StoreError::Io` when a directory or the file cannot be written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> StoreResult<()> {
    let document = encode_tasks(tasks)?;

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, document).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every task stored at `path`, in file order.
///
/// Returns an empty `Vec` when the file does not exist.
pub fn load_tasks(path: &Path) -> StoreResult<Vec<Task>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let text = String::from_utf8(bytes)
        .map_err(|err| StoreError::Malformed(format!("file is not valid UTF-8: {err}")))?;
    decode_tasks(&text)
}

/// Builds the XML document for `tasks` with 2-space indentation.
pub fn encode_tasks(tasks: &[Task]) -> StoreResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(encode_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(encode_error)?;

    for task in tasks {
        writer
            .write_event(Event::Start(BytesStart::new(TASK_ELEMENT)))
            .map_err(encode_error)?;
        write_leaf(&mut writer, TITLE_ELEMENT, task.title())?;
        write_leaf(&mut writer, DESCRIPTION_ELEMENT, task.description())?;
        write_leaf(
            &mut writer,
            CREATED_AT_ELEMENT,
            &format_timestamp(task.created_at()),
        )?;
        write_leaf(&mut writer, PRIORITY_ELEMENT, task.priority().as_str())?;
        write_leaf(&mut writer, STATE_ELEMENT, task.state().as_str())?;
        writer
            .write_event(Event::End(BytesEnd::new(TASK_ELEMENT)))
            .map_err(encode_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(encode_error)?;

    let mut document = String::from_utf8(writer.into_inner())
        .map_err(|err| StoreError::Encode(err.to_string()))?;
    document.push('\n');
    Ok(document)
}

/// Parses a task document produced by `encode_tasks`.
pub fn decode_tasks(xml: &str) -> StoreResult<Vec<Task>> {
    let mut reader = Reader::from_str(xml);
    let mut parser = DocumentParser::default();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|err| StoreError::Malformed(format!("at byte {position}: {err}")))?;

        match event {
            Event::Start(element) => parser.open(element_name(element.name().as_ref())?)?,
            Event::Empty(element) => {
                let name = element_name(element.name().as_ref())?;
                parser.open(name)?;
                parser.close()?;
            }
            Event::End(_) => parser.close()?,
            Event::Text(text) => {
                if parser.collecting() {
                    let value = text
                        .unescape()
                        .map_err(|err| StoreError::Malformed(err.to_string()))?;
                    parser.push_text(&value);
                }
            }
            Event::CData(cdata) => {
                if parser.collecting() {
                    let bytes = cdata.into_inner();
                    let value = std::str::from_utf8(&bytes)
                        .map_err(|err| StoreError::Malformed(err.to_string()))?;
                    parser.push_text(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    parser.finish()
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> StoreResult<()> {
    let escaped = escape_leaf_text(name, value)?;
    writer
        .create_element(name)
        .write_text_content(BytesText::from_escaped(escaped))
        .map_err(encode_error)?;
    Ok(())
}

/// Escapes markup and `\r` so conforming parsers read the text back unchanged.
///
/// C0 controls other than tab, LF and CR cannot appear in XML 1.0 at all.
fn escape_leaf_text(name: &str, value: &str) -> StoreResult<String> {
    if let Some(control) = value
        .chars()
        .find(|ch| matches!(ch, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}'))
    {
        return Err(StoreError::Encode(format!(
            "`{name}` contains control character U+{:04X}",
            u32::from(control)
        )));
    }
    Ok(escape(value).replace('\r', "&#13;"))
}

fn encode_error(err: impl Display) -> StoreError {
    StoreError::Encode(err.to_string())
}

fn element_name(raw: &[u8]) -> StoreResult<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| StoreError::Malformed(format!("element name is not UTF-8: {err}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Title,
    Description,
    CreatedAt,
    Priority,
    State,
}

impl Leaf {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            TITLE_ELEMENT => Some(Self::Title),
            DESCRIPTION_ELEMENT => Some(Self::Description),
            CREATED_AT_ELEMENT => Some(Self::CreatedAt),
            PRIORITY_ELEMENT => Some(Self::Priority),
            STATE_ELEMENT => Some(Self::State),
            _ => None,
        }
    }
}

/// Raw leaf text of one task node; the first occurrence of a leaf wins.
#[derive(Debug, Default)]
struct TaskFields {
    title: Option<String>,
    description: Option<String>,
    created_at: Option<String>,
    priority: Option<String>,
    state: Option<String>,
}

impl TaskFields {
    fn set(&mut self, leaf: Leaf, value: String) {
        let slot = match leaf {
            Leaf::Title => &mut self.title,
            Leaf::Description => &mut self.description,
            Leaf::CreatedAt => &mut self.created_at,
            Leaf::Priority => &mut self.priority,
            Leaf::State => &mut self.state,
        };
        slot.get_or_insert(value);
    }

    fn into_task(self) -> StoreResult<Task> {
        let created_text = self.created_at.unwrap_or_default();
        let created_at =
            parse_timestamp(&created_text).map_err(|source| StoreError::InvalidTimestamp {
                value: created_text.clone(),
                source,
            })?;
        let priority = self.priority.unwrap_or_default().parse::<Priority>()?;
        let state = self.state.unwrap_or_default().parse::<TaskState>()?;

        Ok(Task::restore(
            self.title.unwrap_or_default(),
            self.description.unwrap_or_default(),
            created_at,
            priority,
            state,
        ))
    }
}

/// Event-driven state for one document.
///
/// Depth 1 is the root, depth 2 a task node, depth 3 a leaf.
#[derive(Debug, Default)]
struct DocumentParser {
    depth: usize,
    root_seen: bool,
    current: Option<TaskFields>,
    leaf: Option<(Leaf, usize, String)>,
    tasks: Vec<Task>,
}

impl DocumentParser {
    fn open(&mut self, name: String) -> StoreResult<()> {
        self.depth += 1;

        match self.depth {
            1 => {
                if self.root_seen {
                    return Err(StoreError::Malformed(
                        "document has more than one root element".to_string(),
                    ));
                }
                if name != ROOT_ELEMENT {
                    return Err(StoreError::Malformed(format!(
                        "expected root element `{ROOT_ELEMENT}`, found `{name}`"
                    )));
                }
                self.root_seen = true;
            }
            2 if name == TASK_ELEMENT => self.current = Some(TaskFields::default()),
            3 if self.current.is_some() => {
                if let Some(leaf) = Leaf::from_name(&name) {
                    self.leaf = Some((leaf, self.depth, String::new()));
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.depth == 0 {
            return Err(StoreError::Malformed(
                "closing tag without matching opening tag".to_string(),
            ));
        }

        if matches!(self.leaf, Some((_, depth, _)) if depth == self.depth) {
            if let (Some((leaf, _, value)), Some(fields)) = (self.leaf.take(), self.current.as_mut())
            {
                fields.set(leaf, value);
            }
        } else if self.depth == 2 {
            if let Some(fields) = self.current.take() {
                self.tasks.push(fields.into_task()?);
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn collecting(&self) -> bool {
        self.leaf.is_some()
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, _, value)) = self.leaf.as_mut() {
            value.push_str(text);
        }
    }

    fn finish(self) -> StoreResult<Vec<Task>> {
        if !self.root_seen {
            return Err(StoreError::Malformed(format!(
                "missing root element `{ROOT_ELEMENT}`"
            )));
        }
        if self.depth != 0 {
            return Err(StoreError::Malformed(
                "unexpected end of document".to_string(),
            ));
        }
        Ok(self.tasks)
    }
}
