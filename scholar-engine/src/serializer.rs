//! Canonical result document writer
//!
//! Every strategy funnels its matches through [`ResultWriter`] so that the
//! collection element is written the same way whether records are rebuilt
//! from extracted fields or passed through as original markup.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use scholar_traits::{Error, Result, ScientistRecord, RECORD_ELEMENT, RESULTS_ELEMENT};

/// Streaming writer for a `ScientistsResults` document
pub struct ResultWriter {
    writer: Writer<Vec<u8>>,
    records: usize,
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            records: 0,
        }
    }

    /// Number of records written so far
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Write one record in the canonical shape.
    ///
    /// Empty fields still produce an (empty) element and `Ranks` is always
    /// present, so downstream templates see a stable shape.
    pub fn write_record(&mut self, record: &ScientistRecord) -> Result<()> {
        self.open_collection()?;

        self.event(Event::Start(
            BytesStart::new(RECORD_ELEMENT).with_attributes([("id", record.id.as_str())]),
        ))?;
        self.text_element(BytesStart::new("FullName"), &record.full_name)?;
        self.text_element(BytesStart::new("Faculty"), &record.faculty)?;
        self.text_element(BytesStart::new("Department"), &record.department)?;
        self.text_element(
            BytesStart::new("Degree").with_attributes([("type", record.degree_type.as_str())]),
            &record.degree_value,
        )?;

        self.event(Event::Start(BytesStart::new("Ranks")))?;
        for rank in &record.ranks {
            self.event(Event::Empty(BytesStart::new("Rank").with_attributes([
                ("title", rank.title.as_str()),
                ("date", rank.date.as_str()),
            ])))?;
        }
        self.event(Event::End(BytesEnd::new("Ranks")))?;

        self.event(Event::End(BytesEnd::new(RECORD_ELEMENT)))?;
        self.records += 1;
        Ok(())
    }

    /// Pass through an already serialized record element unchanged
    pub fn write_raw(&mut self, element_xml: &str) -> Result<()> {
        self.open_collection()?;
        self.event(Event::Text(BytesText::from_escaped(element_xml)))?;
        self.records += 1;
        Ok(())
    }

    /// Close the collection and return the document text
    pub fn finish(mut self) -> Result<String> {
        if self.records == 0 {
            self.event(Event::Empty(BytesStart::new(RESULTS_ELEMENT)))?;
        } else {
            self.event(Event::End(BytesEnd::new(RESULTS_ELEMENT)))?;
        }
        String::from_utf8(self.writer.into_inner()).map_err(|e| Error::serialize(e.to_string()))
    }

    fn open_collection(&mut self) -> Result<()> {
        if self.records == 0 {
            self.event(Event::Start(BytesStart::new(RESULTS_ELEMENT)))?;
        }
        Ok(())
    }

    fn text_element(&mut self, start: BytesStart<'_>, text: &str) -> Result<()> {
        let end = start.to_end().into_owned();
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(end))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::serialize(e.to_string()))
    }
}

/// Serialize reconstructed records into a canonical result document
pub fn serialize<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a ScientistRecord>,
{
    let mut writer = ResultWriter::new();
    for record in records {
        writer.write_record(record)?;
    }
    writer.finish()
}
