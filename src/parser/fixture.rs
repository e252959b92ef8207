//! Reading fixture files record by record.
//!
//! A fixture is either a top-level JSON array or a sequence of
//! whitespace-separated JSON objects (JSONL). Records are handed to a sink
//! one at a time, so a streamed file is never materialised in memory.

use anyhow::{anyhow, Context, Result};
use serde::de::{Error as _, SeqAccess, Visitor};
use serde::Deserializer as _;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Decoded form of the placeholder the fixtures use for a missing value
pub const NULL_SENTINEL: &str = "\\N";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Replace the JSON-escaped `\N` sentinel with `null` and collapse any
/// quoted `"null"` left behind into a bare `null`.
pub fn sanitize_nulls(json: &str) -> String {
    json.replace("\\\\N", "null").replace("\"null\"", "null")
}

/// Turn sentinel strings in a record's fields into JSON nulls
pub fn scrub_sentinels(record: &mut Value) {
    if let Value::Object(fields) = record {
        for value in fields.values_mut() {
            if matches!(value, Value::String(s) if s == NULL_SENTINEL || s == "null") {
                *value = Value::Null;
            }
        }
    }
}

/// Read every record of a fixture file into `sink`.
///
/// With `streamed` the file is read incrementally from disk; otherwise the
/// whole text is loaded and sanitized first. Returns the number of records.
pub fn read_fixture<F>(path: &Path, streamed: bool, sink: F) -> Result<u64>
where
    F: FnMut(Value) -> Result<()>,
{
    if streamed {
        let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
        read_records(BufReader::new(file), sink)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let text = sanitize_nulls(&text);
        read_records(text.as_bytes(), sink)
    }
}

/// Read records from a JSON array or JSONL stream
pub fn read_records<R, F>(mut reader: R, mut sink: F) -> Result<u64>
where
    R: BufRead,
    F: FnMut(Value) -> Result<()>,
{
    let mut deliver = |mut record: Value| {
        scrub_sentinels(&mut record);
        sink(record)
    };

    match first_significant_byte(&mut reader)? {
        None => Ok(0),
        Some(b'[') => read_array(reader, &mut deliver),
        Some(_) => read_lines(reader, &mut deliver),
    }
}

fn read_array<R, F>(reader: R, sink: &mut F) -> Result<u64>
where
    R: BufRead,
    F: FnMut(Value) -> Result<()>,
{
    let mut sink_error = None;
    let mut de = serde_json::Deserializer::from_reader(reader);
    let visitor = RecordVisitor {
        sink,
        sink_error: &mut sink_error,
    };

    match (&mut de).deserialize_seq(visitor) {
        Ok(count) => {
            de.end().context("Trailing characters after JSON array")?;
            Ok(count)
        }
        Err(err) => match sink_error {
            Some(sink_err) => Err(sink_err),
            None => Err(anyhow!(err).context("Malformed JSON array")),
        },
    }
}

fn read_lines<R, F>(reader: R, sink: &mut F) -> Result<u64>
where
    R: BufRead,
    F: FnMut(Value) -> Result<()>,
{
    let mut count = 0;
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Value>();

    for record in stream {
        let record = record.with_context(|| format!("Malformed JSON record #{}", count + 1))?;
        sink(record)?;
        count += 1;
    }

    Ok(count)
}

/// Peek at the first byte that is not whitespace or a byte-order mark
fn first_significant_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    let mut at_start = true;
    loop {
        let buf = reader.fill_buf().context("Failed to read fixture")?;
        if buf.is_empty() {
            return Ok(None);
        }
        if at_start && buf.starts_with(UTF8_BOM) {
            reader.consume(UTF8_BOM.len());
            at_start = false;
            continue;
        }
        at_start = false;

        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(idx) => {
                let byte = buf[idx];
                reader.consume(idx);
                return Ok(Some(byte));
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Pushes array elements into the sink as they are parsed
struct RecordVisitor<'a, F> {
    sink: &'a mut F,
    sink_error: &'a mut Option<anyhow::Error>,
}

impl<'de, F> Visitor<'de> for RecordVisitor<'_, F>
where
    F: FnMut(Value) -> Result<()>,
{
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of fixture records")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<u64, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let sink = self.sink;
        let mut count = 0;
        while let Some(record) = seq.next_element::<Value>()? {
            if let Err(err) = sink(record) {
                *self.sink_error = Some(err);
                return Err(A::Error::custom("record rejected"));
            }
            count += 1;
        }
        Ok(count)
    }
}
