//! Streaming engine
//!
//! Single forward pass over a quick-xml token stream. Only the record
//! currently being built and the accumulated matches are held in memory.
//!
//! Supports:
//! - attribute enumeration in the same pass style
//! - filtering, with results rebuilt from extracted fields

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use scholar_traits::{
    matches, xml_trim, AttributeCollector, AttributeKey, Criteria, Error, FilterAttributes,
    MatchMode, Rank, Result, ScientistQuery, ScientistRecord, DEFAULT_MATCH_MODE, RECORD_ELEMENT,
};

use crate::serializer::ResultWriter;

// ============== Tokens ==============

/// One token of the linear document stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    End {
        name: String,
    },
}

impl Token {
    /// Attribute value of a start token
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Token::Start { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Well-formedness checked token iterator over a document.
///
/// Empty elements are expanded into a start and end token, CDATA is
/// reported as text, and markup with no bearing on records (comments,
/// processing instructions, the XML declaration) is skipped. Line endings
/// and attribute values are normalized as an XML processor must, so values
/// read here equal those seen through a parsed tree. Documents carrying a
/// DTD are rejected.
pub struct Tokens<'a> {
    reader: Reader<&'a [u8]>,
    depth: usize,
    seen_root: bool,
    finished: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(document: &'a str) -> Self {
        let mut reader = Reader::from_str(document);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;
        Self {
            reader,
            depth: 0,
            seen_root: false,
            finished: false,
        }
    }

    fn error(&self, msg: impl std::fmt::Display) -> Error {
        Error::parse(format!("{} (at byte {})", msg, self.reader.buffer_position()))
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    if self.depth == 0 && self.seen_root {
                        return Err(self.error("multiple root elements"));
                    }
                    self.seen_root = true;
                    self.depth += 1;
                    let attributes = self.read_attributes(&e)?;
                    return Ok(Some(Token::Start {
                        name: decode_name(e.name().as_ref()),
                        attributes,
                    }));
                }
                Ok(Event::End(e)) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Some(Token::End {
                        name: decode_name(e.name().as_ref()),
                    }));
                }
                Ok(Event::Text(e)) => {
                    let raw = std::str::from_utf8(&e).map_err(|err| self.error(err))?;
                    let raw = normalize_line_endings(raw);
                    let text = unescape(&raw).map_err(|err| self.error(err))?;
                    if self.depth == 0 {
                        if xml_trim(&text).is_empty() {
                            continue;
                        }
                        return Err(self.error("character data outside the root element"));
                    }
                    return Ok(Some(Token::Text(text.into_owned())));
                }
                Ok(Event::CData(e)) => {
                    if self.depth == 0 {
                        return Err(self.error("CDATA outside the root element"));
                    }
                    let text = String::from_utf8_lossy(&e);
                    return Ok(Some(Token::Text(normalize_line_endings(&text).into_owned())));
                }
                Ok(Event::DocType(_)) => return Err(self.error("DTD is not supported")),
                Ok(Event::Eof) => {
                    if !self.seen_root {
                        return Err(self.error("document has no root element"));
                    }
                    if self.depth > 0 {
                        return Err(self.error(format!(
                            "unexpected end of document, {} element(s) left open",
                            self.depth
                        )));
                    }
                    return Ok(None);
                }
                Ok(_) => continue,
                Err(e) => return Err(self.error(e)),
            }
        }
    }

    fn read_attributes(&self, start: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
        start
            .attributes()
            .map(|attr| {
                let attr = attr.map_err(|e| self.error(e))?;
                let raw = std::str::from_utf8(&attr.value).map_err(|e| self.error(e))?;
                let raw = normalize_attribute_value(raw);
                let value = unescape(&raw).map_err(|e| self.error(e))?;
                Ok((decode_name(attr.key.as_ref()), value.into_owned()))
            })
            .collect()
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn decode_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// `\r\n` and a lone `\r` both become `\n`
fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Literal whitespace characters in an attribute value each become a space.
/// Applied before unescaping, so character references such as `&#9;` survive.
fn normalize_attribute_value(raw: &str) -> Cow<'_, str> {
    let raw = normalize_line_endings(raw);
    if raw.contains(['\t', '\n']) {
        Cow::Owned(raw.replace(['\t', '\n'], " "))
    } else {
        raw
    }
}

// ============== Record state machine ==============

/// Single-valued record fields taken from direct child elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FullName,
    Faculty,
    Department,
    Degree,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "FullName" => Some(Field::FullName),
            "Faculty" => Some(Field::Faculty),
            "Department" => Some(Field::Department),
            "Degree" => Some(Field::Degree),
            _ => None,
        }
    }
}

/// Field element currently collecting text
#[derive(Debug)]
struct OpenField {
    field: Field,
    depth: usize,
    text: String,
}

/// A record under construction. Never handed out before its closing tag.
#[derive(Debug)]
struct RecordBuilder {
    record: ScientistRecord,
    depth: usize,
    current_field: Option<OpenField>,
    seen: Vec<Field>,
}

impl RecordBuilder {
    fn open(token: &Token, depth: usize) -> Self {
        let record = ScientistRecord {
            id: token.attribute("id").unwrap_or_default().to_string(),
            ..ScientistRecord::default()
        };
        Self {
            record,
            depth,
            current_field: None,
            seen: Vec::with_capacity(4),
        }
    }

    fn on_start(&mut self, name: &str, token: &Token, depth: usize) {
        if name == "Rank" {
            self.record.ranks.push(Rank::new(
                token.attribute("title").unwrap_or_default(),
                token.attribute("date").unwrap_or_default(),
            ));
        }

        if depth != self.depth + 1 || self.current_field.is_some() {
            return;
        }
        let Some(field) = Field::from_name(name) else {
            return;
        };
        // The first occurrence of a field wins.
        if self.seen.contains(&field) {
            return;
        }
        self.seen.push(field);
        if field == Field::Degree {
            self.record.degree_type = token.attribute("type").unwrap_or_default().to_string();
        }
        self.current_field = Some(OpenField {
            field,
            depth,
            text: String::new(),
        });
    }

    fn on_text(&mut self, text: &str) {
        if let Some(open) = self.current_field.as_mut() {
            open.text.push_str(text);
        }
    }

    /// Returns the finished record when `depth` closes the record element
    fn on_end(&mut self, depth: usize) -> Option<ScientistRecord> {
        if self.current_field.as_ref().is_some_and(|open| open.depth == depth) {
            if let Some(open) = self.current_field.take() {
                let value = xml_trim(&open.text).to_string();
                match open.field {
                    Field::FullName => self.record.full_name = value,
                    Field::Faculty => self.record.faculty = value,
                    Field::Department => self.record.department = value,
                    Field::Degree => self.record.degree_value = value,
                }
            }
        }
        (depth == self.depth).then(|| std::mem::take(&mut self.record))
    }
}

#[derive(Debug)]
enum ReaderState {
    Outside,
    InsideRecord(RecordBuilder),
}

/// Drive the record state machine over `document`, handing every
/// completed record to `on_record`. Returns the number of records seen.
fn scan_records<F>(document: &str, mut on_record: F) -> Result<usize>
where
    F: FnMut(ScientistRecord) -> Result<()>,
{
    let mut state = ReaderState::Outside;
    let mut depth = 0usize;
    let mut scanned = 0usize;

    for token in Tokens::new(document) {
        let token = token?;
        match &token {
            Token::Start { name, .. } => {
                depth += 1;
                match &mut state {
                    ReaderState::Outside if name == RECORD_ELEMENT => {
                        state = ReaderState::InsideRecord(RecordBuilder::open(&token, depth));
                    }
                    ReaderState::Outside => {}
                    ReaderState::InsideRecord(builder) => builder.on_start(name, &token, depth),
                }
            }
            Token::Text(text) => {
                if let ReaderState::InsideRecord(builder) = &mut state {
                    builder.on_text(text);
                }
            }
            Token::End { .. } => {
                if let ReaderState::InsideRecord(builder) = &mut state {
                    if let Some(record) = builder.on_end(depth) {
                        state = ReaderState::Outside;
                        scanned += 1;
                        on_record(record)?;
                    }
                }
                depth -= 1;
            }
        }
    }

    Ok(scanned)
}

/// Every record of `document`, in document order
pub fn extract_records(document: &str) -> Result<Vec<ScientistRecord>> {
    let mut records = Vec::new();
    scan_records(document, |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

// ============== Engine ==============

/// Streaming engine wrapper
#[derive(Debug, Clone, Copy)]
pub struct StreamingEngine {
    mode: MatchMode,
}

impl Default for StreamingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingEngine {
    pub fn new() -> Self {
        Self::with_mode(DEFAULT_MATCH_MODE)
    }

    pub fn with_mode(mode: MatchMode) -> Self {
        Self { mode }
    }
}

impl ScientistQuery for StreamingEngine {
    fn name(&self) -> &'static str {
        "Streaming (SAX)"
    }

    fn match_mode(&self) -> MatchMode {
        self.mode
    }

    fn filter_attributes(&self, document: &str) -> Result<FilterAttributes> {
        let mut collector = AttributeCollector::new();
        // Open Faculty/Department elements with the depth they opened at
        let mut captures: Vec<(AttributeKey, usize, String)> = Vec::new();
        let mut depth = 0usize;

        for token in Tokens::new(document) {
            let token = token?;
            match &token {
                Token::Start { name, .. } => {
                    depth += 1;
                    match name.as_str() {
                        "Faculty" => captures.push((AttributeKey::Faculty, depth, String::new())),
                        "Department" => {
                            captures.push((AttributeKey::Department, depth, String::new()))
                        }
                        "Degree" => {
                            if let Some(kind) = token.attribute("type") {
                                collector.insert(AttributeKey::DegreeType, kind);
                            }
                        }
                        "Rank" => {
                            if let Some(title) = token.attribute("title") {
                                collector.insert(AttributeKey::Rank, title);
                            }
                        }
                        _ => {}
                    }
                }
                Token::Text(text) => {
                    for (_, _, buffer) in captures.iter_mut() {
                        buffer.push_str(text);
                    }
                }
                Token::End { .. } => {
                    if captures.last().is_some_and(|(_, open, _)| *open == depth) {
                        if let Some((key, _, value)) = captures.pop() {
                            collector.insert(key, &value);
                        }
                    }
                    depth -= 1;
                }
            }
        }

        let attributes = collector.finish();
        tracing::debug!(
            strategy = self.name(),
            values = attributes.len(),
            "collected filter attributes"
        );
        Ok(attributes)
    }

    fn search(&self, document: &str, criteria: &Criteria) -> Result<String> {
        let mut writer = ResultWriter::new();
        let mode = self.mode;

        let scanned = scan_records(document, |record| {
            let matched = matches(&record, criteria, mode);
            tracing::trace!(id = %record.id, matched, "record complete");
            if matched {
                writer.write_record(&record)?;
            }
            Ok(())
        })?;

        tracing::debug!(
            strategy = self.name(),
            scanned,
            matched = writer.len(),
            criteria = criteria.len(),
            "search complete"
        );
        writer.finish()
    }
}
