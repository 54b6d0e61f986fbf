//! Reads and rewrites Android `strings.xml` documents without disturbing
//! anything the tool did not touch.

use std::io::Write;
use std::path::{Path, PathBuf};

use droidloc_core::{Result, StringResourceAdapter};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// File name of a string resource document inside a `values*` directory.
pub const STRINGS_DOC: &str = "strings.xml";

const ROOT_TAG: &str = "resources";
const STRING_TAG: &str = "string";
const NAME_ATTR: &str = "name";
const INDENT: &str = "    ";

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml in {}: {1}", .0.display())]
    Parse(PathBuf, String),
    #[error("no <resources> root element in {}", .0.display())]
    MissingRoot(PathBuf),
}

/// Production [`StringResourceAdapter`] backed by quick-xml streaming.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlResourceAdapter;

impl StringResourceAdapter for XmlResourceAdapter {
    fn read_entries(&self, doc: &Path) -> Result<Vec<(String, String)>> {
        read_entries(doc)
    }

    fn upsert_entry(&self, doc: &Path, key: &str, value: &str) -> Result<()> {
        upsert_entry(doc, key, value)
    }
}

/// `name` attribute of a `<string>` tag. Malformed attributes count as
/// absent, so the entry is skipped rather than aborting the scan.
fn name_attr(e: &BytesStart) -> Option<String> {
    let attr = e.try_get_attribute(NAME_ATTR).ok()??;
    Some(attr.unescape_value().ok()?.into_owned())
}

/// Extract every `<string name="...">` entry under `<resources>`, in
/// document order. Values are entity-unescaped; markup nested inside a value
/// contributes only its text. A document with a different root element holds
/// no string resources and yields an empty list.
pub fn read_entries(doc: &Path) -> Result<Vec<(String, String)>> {
    let xml = std::fs::read_to_string(doc)?;
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out: Vec<(String, String)> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current_key: Option<String> = None;
    let mut current_val = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() && name != ROOT_TAG {
                    return Ok(Vec::new());
                }
                if stack.len() == 1 && name == STRING_TAG {
                    if let Some(key) = name_attr(&e) {
                        current_key = Some(key);
                        current_val.clear();
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() && name != ROOT_TAG {
                    return Ok(Vec::new());
                }
                // Self-closing <string name="k"/> is a present, empty value.
                if stack.len() == 1 && name == STRING_TAG {
                    if let Some(key) = name_attr(&e) {
                        out.push((key, String::new()));
                    }
                }
            }
            Ok(Event::End(_)) => {
                let popped = stack.pop();
                if stack.len() == 1 && popped.as_deref() == Some(STRING_TAG) {
                    if let Some(key) = current_key.take() {
                        out.push((key, std::mem::take(&mut current_val)));
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if current_key.is_some() {
                    current_val.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Ok(Event::CData(t)) => {
                if current_key.is_some() {
                    current_val.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlError::Parse(doc.to_path_buf(), e.to_string()).into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Replace the value of `key` in place, or append a fresh entry before the
/// closing `</resources>` tag. Every event the edit does not touch streams
/// through byte-identical, so sibling entries, comments, and whitespace keep
/// their exact formatting. The result replaces the document atomically.
pub fn upsert_entry(doc: &Path, key: &str, value: &str) -> Result<()> {
    let input = std::fs::read_to_string(doc)?;
    let mut reader = Reader::from_str(&input);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out = Writer::new(Vec::new());
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut done = false;
    let mut last_text_ended_line = false;
    // While Some(n), old value content of the matched entry is being dropped;
    // n tracks markup nesting inside it.
    let mut skip_nested: Option<usize> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if let Some(n) = skip_nested.as_mut() {
                    *n += 1;
                    buf.clear();
                    continue;
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if depth == 0 && name == ROOT_TAG {
                    saw_root = true;
                }
                let matches = saw_root
                    && depth == 1
                    && name == STRING_TAG
                    && !done
                    && name_attr(&e).as_deref() == Some(key);
                out.write_event(Event::Start(e.to_owned()))?;
                if matches {
                    out.write_event(Event::Text(BytesText::new(value)))?;
                    done = true;
                    skip_nested = Some(0);
                }
                depth += 1;
                last_text_ended_line = false;
            }
            Ok(Event::Empty(e)) => {
                if skip_nested.is_some() {
                    buf.clear();
                    continue;
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if depth == 0 && name == ROOT_TAG {
                    // Bare <resources/> grows into a full element around the
                    // new entry.
                    saw_root = true;
                    done = true;
                    out.write_event(Event::Start(e.to_owned()))?;
                    write_new_entry(&mut out, key, value, false)?;
                    out.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
                } else if saw_root
                    && depth == 1
                    && name == STRING_TAG
                    && !done
                    && name_attr(&e).as_deref() == Some(key)
                {
                    out.write_event(Event::Start(e.to_owned()))?;
                    out.write_event(Event::Text(BytesText::new(value)))?;
                    out.write_event(Event::End(BytesEnd::new(STRING_TAG)))?;
                    done = true;
                } else {
                    out.write_event(Event::Empty(e.to_owned()))?;
                }
                last_text_ended_line = false;
            }
            Ok(Event::End(e)) => {
                match skip_nested.as_mut() {
                    Some(0) => {
                        out.write_event(Event::End(e.to_owned()))?;
                        skip_nested = None;
                        depth -= 1;
                    }
                    Some(n) => *n -= 1,
                    None => {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        depth -= 1;
                        if depth == 0 && name == ROOT_TAG && !done {
                            write_new_entry(&mut out, key, value, last_text_ended_line)?;
                            done = true;
                        }
                        out.write_event(Event::End(e.to_owned()))?;
                    }
                }
                last_text_ended_line = false;
            }
            Ok(Event::Text(t)) => {
                if skip_nested.is_none() {
                    last_text_ended_line = t.ends_with(b"\n");
                    out.write_event(Event::Text(t))?;
                }
            }
            Ok(Event::CData(t)) => {
                if skip_nested.is_none() {
                    out.write_event(Event::CData(t))?;
                    last_text_ended_line = false;
                }
            }
            Ok(Event::Decl(d)) => out.write_event(Event::Decl(d))?,
            Ok(Event::PI(pi)) => out.write_event(Event::PI(pi))?,
            Ok(Event::Comment(c)) => {
                if skip_nested.is_none() {
                    out.write_event(Event::Comment(c))?;
                    last_text_ended_line = false;
                }
            }
            Ok(Event::DocType(d)) => out.write_event(Event::DocType(d))?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlError::Parse(doc.to_path_buf(), e.to_string()).into()),
        }
        buf.clear();
    }

    if !saw_root {
        return Err(XmlError::MissingRoot(doc.to_path_buf()).into());
    }
    if depth != 0 || skip_nested.is_some() {
        return Err(XmlError::Parse(doc.to_path_buf(), "truncated document".into()).into());
    }

    write_atomic(doc, &out.into_inner())
}

/// The appended node sits on its own indented line so the grown document
/// still reads like hand-written resource XML.
fn write_new_entry(
    out: &mut Writer<Vec<u8>>,
    key: &str,
    value: &str,
    at_line_start: bool,
) -> Result<()> {
    let lead = if at_line_start {
        INDENT.to_string()
    } else {
        format!("\n{INDENT}")
    };
    out.write_event(Event::Text(BytesText::new(&lead)))?;
    let mut elem = BytesStart::new(STRING_TAG);
    elem.push_attribute((NAME_ATTR, key));
    out.write_event(Event::Start(elem))?;
    out.write_event(Event::Text(BytesText::new(value)))?;
    out.write_event(Event::End(BytesEnd::new(STRING_TAG)))?;
    out.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}

/// Readers never observe a half-written document: bytes land in a temp file
/// in the same directory and replace the target via rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)?;
    Ok(())
}
