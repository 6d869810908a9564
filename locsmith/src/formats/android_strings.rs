//! Support for Android `strings.xml` catalogs.
//!
//! Only `<string>` elements become catalog entries. A self-closing
//! `<string name="x"/>` is a key without a value. Inline markup inside a
//! string is flattened to its text in the entry.
//!
//! A parsed [`Format`] also keeps the rest of the document: the declaration,
//! comments, `<plurals>`, `<string-array>` and any other sibling, plus the
//! raw body of every `<string>`. [`Format::with_catalog`] swaps in new entry
//! values and [`Parser::to_writer`] re-emits everything else untouched.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    traits::Parser,
    types::{Catalog, ResourceEntry},
};

const INDENT: &str = "    ";

/// Upper bound on the alignment table used to move inline markup into a
/// changed string value.
const MAX_ALIGNMENT_CELLS: usize = 1 << 20;

#[derive(Debug, Default)]
pub struct Format {
    pub strings: Vec<StringResource>,
    /// Document nodes in file order. Empty for a catalog that was never read
    /// from a file.
    layout: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Xml(Event<'static>),
    /// Index into [`Format::strings`].
    String(usize),
    EmptyRoot(BytesStart<'static>),
    RootEnd(BytesEnd<'static>),
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut layout = Vec::new();
        let mut depth = 0usize;
        let mut saw_root = false;

        loop {
            buf.clear();
            let event = xml_reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) | Event::Empty(e)
                    if depth == 1 && e.name().as_ref() == b"string" =>
                {
                    let self_closing = matches!(event, Event::Empty(_));
                    let sr = parse_string_resource(e, &mut xml_reader, self_closing)?;
                    layout.push(Node::String(strings.len()));
                    strings.push(sr);
                }
                Event::Start(e) | Event::Empty(e) if depth == 0 => {
                    if e.name().as_ref() != b"resources" {
                        return Err(Error::InvalidResource(
                            "root element must be <resources>".to_string(),
                        ));
                    }
                    saw_root = true;
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                        layout.push(Node::Xml(event.clone().into_owned()));
                    } else {
                        layout.push(Node::EmptyRoot(e.clone().into_owned()));
                    }
                }
                Event::Start(_) => {
                    depth += 1;
                    layout.push(Node::Xml(event.clone().into_owned()));
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        layout.push(Node::RootEnd(e.clone().into_owned()));
                    } else {
                        layout.push(Node::Xml(event.clone().into_owned()));
                    }
                }
                Event::Eof => break,
                _ => layout.push(Node::Xml(event.clone().into_owned())),
            }
        }

        if !saw_root {
            return Err(Error::InvalidResource(
                "missing <resources> root element".to_string(),
            ));
        }
        if depth != 0 {
            return Err(Error::InvalidResource(
                "unexpected end of file inside an element".to_string(),
            ));
        }
        Ok(Format { strings, layout })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);
        if self.layout.is_empty() {
            return self.write_fresh(&mut xml_writer);
        }

        let pending: Vec<&StringResource> = self
            .strings
            .iter()
            .filter(|sr| sr.source.is_none())
            .collect();
        let mut line_start = true;
        for node in &self.layout {
            match node {
                Node::Xml(event) => {
                    line_start = matches!(event, Event::Text(t) if t.ends_with(b"\n"));
                    xml_writer.write_event(event.clone())?;
                }
                Node::String(index) => {
                    write_string(&mut xml_writer, &self.strings[*index])?;
                    line_start = false;
                }
                Node::EmptyRoot(start) if pending.is_empty() => {
                    xml_writer.write_event(Event::Empty(start.clone()))?;
                }
                Node::EmptyRoot(start) => {
                    xml_writer.write_event(Event::Start(start.clone()))?;
                    write_appended(&mut xml_writer, &pending, false)?;
                    xml_writer.write_event(Event::End(start.to_end()))?;
                }
                Node::RootEnd(end) => {
                    write_appended(&mut xml_writer, &pending, line_start)?;
                    xml_writer.write_event(Event::End(end.clone()))?;
                }
            }
        }
        Ok(())
    }
}

impl Format {
    /// Replaces the string entries with those of `catalog`, keeping every
    /// other node of the document in place.
    ///
    /// Strings whose key is still in the catalog stay where they are, with
    /// their original body when the value is unchanged. Strings no longer
    /// in the catalog are dropped. New keys go before `</resources>` in
    /// catalog order.
    pub fn with_catalog(self, catalog: &Catalog) -> Self {
        let Format { strings, layout } = self;
        let mut slots: Vec<Option<StringResource>> = strings.into_iter().map(Some).collect();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut nodes = Vec::with_capacity(layout.len());

        for node in layout {
            let Node::String(index) = node else {
                nodes.push(node);
                continue;
            };
            let Some(mut sr) = slots.get_mut(index).and_then(Option::take) else {
                continue;
            };
            match catalog.entry(&sr.name) {
                Some(entry) if seen.insert(sr.name.clone()) => {
                    sr.value = entry.text.clone();
                    sr.translatable = entry.translatable;
                    nodes.push(Node::String(kept.len()));
                    kept.push(sr);
                }
                _ => {
                    if matches!(
                        nodes.last(),
                        Some(Node::Xml(Event::Text(t))) if t.iter().all(u8::is_ascii_whitespace)
                    ) {
                        nodes.pop();
                    }
                }
            }
        }

        kept.extend(
            catalog
                .entries()
                .iter()
                .filter(|entry| !seen.contains(&entry.key))
                .map(StringResource::from_entry),
        );
        Format {
            strings: kept,
            layout: nodes,
        }
    }

    fn write_fresh<W: Write>(&self, xml_writer: &mut Writer<W>) -> Result<(), Error> {
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        let strings: Vec<&StringResource> = self.strings.iter().collect();
        write_appended(xml_writer, &strings, true)?;
        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

impl From<&Catalog> for Format {
    fn from(value: &Catalog) -> Self {
        Self {
            strings: value
                .entries()
                .iter()
                .map(StringResource::from_entry)
                .collect(),
            layout: Vec::new(),
        }
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        Catalog::from_entries(value.strings.into_iter().map(StringResource::into_entry))
    }
}

#[derive(Debug, Clone)]
pub struct StringResource {
    pub name: String,
    pub value: Option<String>,
    pub translatable: Option<bool>,
    source: Option<SourceElement>,
}

/// A `<string>` element as it was read.
#[derive(Debug, Clone)]
struct SourceElement {
    start: BytesStart<'static>,
    value: Option<String>,
    translatable: Option<bool>,
    body: Vec<Event<'static>>,
    /// Nested tags, comments and instructions keyed by the character offset
    /// in the flattened value where they occur.
    markup: Vec<(usize, Event<'static>)>,
}

impl StringResource {
    fn into_entry(self) -> ResourceEntry {
        ResourceEntry {
            key: self.name,
            text: self.value,
            translatable: self.translatable,
        }
    }

    fn from_entry(entry: &ResourceEntry) -> Self {
        StringResource {
            name: entry.key.clone(),
            value: entry.text.clone(),
            translatable: entry.translatable,
            source: None,
        }
    }
}

fn parse_string_resource<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
    self_closing: bool,
) -> Result<StringResource, Error> {
    let mut name = None;
    let mut translatable = None;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => {
                let v = attr.unescape_value()?.to_string();
                translatable = Some(v == "true");
            }
            _ => {}
        }
    }
    let name =
        name.ok_or_else(|| Error::InvalidResource("string tag missing 'name'".to_string()))?;

    let mut source = SourceElement {
        start: e.clone().into_owned(),
        value: None,
        translatable,
        body: Vec::new(),
        markup: Vec::new(),
    };
    if self_closing {
        return Ok(StringResource {
            name,
            value: None,
            translatable,
            source: Some(source),
        });
    }

    let mut buf = Vec::new();
    let mut value = String::new();
    let mut nested = 0usize;
    loop {
        buf.clear();
        let event = xml_reader.read_event_into(&mut buf)?;
        match &event {
            Event::Text(e) => value.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Event::CData(e) => value.push_str(&String::from_utf8_lossy(e)),
            Event::End(e) if nested == 0 => {
                if e.name().as_ref() != b"string" {
                    return Err(Error::InvalidResource(format!(
                        "string '{}' is not closed",
                        name
                    )));
                }
                break;
            }
            Event::Eof => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            other => {
                match other {
                    Event::Start(_) => nested += 1,
                    Event::End(_) => nested -= 1,
                    _ => {}
                }
                source
                    .markup
                    .push((value.chars().count(), event.clone().into_owned()));
            }
        }
        source.body.push(event.into_owned());
    }

    source.value = Some(value.clone());
    Ok(StringResource {
        name,
        value: Some(value),
        translatable,
        source: Some(source),
    })
}

/// Writes strings that have no place in the document yet, one per line.
fn write_appended<W: Write>(
    xml_writer: &mut Writer<W>,
    strings: &[&StringResource],
    mut line_start: bool,
) -> Result<(), Error> {
    for sr in strings {
        if !line_start {
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }
        xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
        write_string(xml_writer, sr)?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        line_start = true;
    }
    Ok(())
}

fn write_string<W: Write>(xml_writer: &mut Writer<W>, sr: &StringResource) -> Result<(), Error> {
    let start = match &sr.source {
        Some(source) if source.translatable == sr.translatable => source.start.clone(),
        Some(source) => restamp_translatable(&source.start, sr.translatable)?,
        None => {
            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", sr.name.as_str()));
            if let Some(trans) = sr.translatable {
                elem.push_attribute(("translatable", if trans { "true" } else { "false" }));
            }
            elem
        }
    };

    let Some(value) = &sr.value else {
        xml_writer.write_event(Event::Empty(start))?;
        return Ok(());
    };
    xml_writer.write_event(Event::Start(start))?;
    match &sr.source {
        Some(source) if source.value.as_deref() == Some(value.as_str()) => {
            for event in &source.body {
                xml_writer.write_event(event.clone())?;
            }
        }
        Some(source) if !source.markup.is_empty() => {
            write_with_markup(xml_writer, value, source)?;
        }
        _ => write_text(xml_writer, value)?,
    }
    xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
    Ok(())
}

fn restamp_translatable(
    start: &BytesStart,
    translatable: Option<bool>,
) -> Result<BytesStart<'static>, Error> {
    let mut elem = BytesStart::new("string");
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        if attr.key.as_ref() != b"translatable" {
            elem.push_attribute(attr);
        }
    }
    if let Some(trans) = translatable {
        elem.push_attribute(("translatable", if trans { "true" } else { "false" }));
    }
    Ok(elem)
}

fn write_text<W: Write>(xml_writer: &mut Writer<W>, text: &str) -> Result<(), Error> {
    if !text.is_empty() {
        // Only `<`, `>` and `&` need escaping in element text;
        // apostrophes and quotes keep their Android escapes.
        let escaped = partial_escape(text);
        xml_writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
    }
    Ok(())
}

/// Writes a changed value, putting each piece of inline markup back at the
/// matching position of the new text.
fn write_with_markup<W: Write>(
    xml_writer: &mut Writer<W>,
    value: &str,
    source: &SourceElement,
) -> Result<(), Error> {
    let old: Vec<char> = source.value.as_deref().unwrap_or_default().chars().collect();
    let new: Vec<char> = value.chars().collect();
    let anchors = align(&old, &new);

    let mut cursor = 0;
    for (offset, event) in &source.markup {
        let at = map_position(&anchors, *offset, old.len(), new.len()).max(cursor);
        write_text(xml_writer, &new[cursor..at].iter().collect::<String>())?;
        xml_writer.write_event(event.clone())?;
        cursor = at;
    }
    write_text(xml_writer, &new[cursor..].iter().collect::<String>())
}

/// Matched character pairs between `old` and `new`, in increasing order.
fn align(old: &[char], new: &[char]) -> Vec<(usize, usize)> {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();
    if old_mid.len().saturating_mul(new_mid.len()) <= MAX_ALIGNMENT_CELLS {
        pairs.extend(
            longest_common_subsequence(old_mid, new_mid)
                .into_iter()
                .map(|(a, b)| (a + prefix, b + prefix)),
        );
    }
    let (old_tail, new_tail) = (old.len() - suffix, new.len() - suffix);
    pairs.extend((0..suffix).map(|i| (old_tail + i, new_tail + i)));
    pairs
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> Vec<(usize, usize)> {
    let width = b.len() + 1;
    let mut table = vec![0u32; (a.len() + 1) * width];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    let mut pairs = Vec::new();
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Maps a position between characters of the old text to the new text.
///
/// Inside a changed run of equal length the offset carries over one to one;
/// inside a run whose length changed the position snaps to the start of
/// the run.
fn map_position(pairs: &[(usize, usize)], offset: usize, old_len: usize, new_len: usize) -> usize {
    let index = pairs.partition_point(|&(a, _)| a < offset);
    let (prev_old, prev_new) = match index.checked_sub(1) {
        Some(i) => (pairs[i].0 as isize, pairs[i].1 as isize),
        None => (-1, -1),
    };
    let (next_old, next_new) = pairs
        .get(index)
        .map_or((old_len as isize, new_len as isize), |&(a, b)| {
            (a as isize, b as isize)
        });
    let mapped = if next_old - prev_old == next_new - prev_new {
        prev_new + (offset as isize - prev_old)
    } else {
        prev_new + 1
    };
    mapped as usize
}
