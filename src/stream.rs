//! Reading and writing the binary position record stream.
//!
//! A stream is a plain sequence of records, read until end of file, with no header, count or
//! length prefixes. All values are little-endian:
//!
//! | field | size | encoding |
//! |---|---|---|
//! | identifier | 4 bytes | `i32` |
//! | label | variable | single-byte characters terminated by `0x00` |
//! | latitude | 4 bytes | `f32` |
//! | longitude | 4 bytes | `f32` |
//! | timestamp | 8 bytes | `u64` |
//!
//! A stream that ends exactly between two records is complete. A stream that ends inside a
//! record is malformed and fails with [`QuadtreeError::MalformedRecordStream`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{QuadtreeError, RecordField, Result};
use crate::geometry::Point;
use crate::quadtree::QuadtreeBuilder;
use crate::record::PositionRecord;

/// Decodes [`PositionRecord`]s from a binary record stream.
///
/// The iterator yields records until the end of the stream, or yields a single error and stops.
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: R,
    /// Bytes consumed so far.
    offset: u64,
    /// Records decoded so far.
    record: usize,
    done: bool,
}

impl RecordReader<BufReader<File>> {
    /// Open a record file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Read records from any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            record: 0,
            done: false,
        }
    }

    /// The number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next record, or return `None` at the end of the stream.
    pub fn read_record(&mut self) -> Result<Option<PositionRecord<f32>>> {
        let start = self.offset;

        let mut id_buf = [0; 4];
        let n = read_up_to(&mut self.reader, &mut id_buf)?;
        self.offset += n as u64;
        match n {
            0 => return Ok(None),
            4 => {}
            _ => return Err(self.malformed(start, RecordField::Identifier)),
        }
        let id = LittleEndian::read_i32(&id_buf);

        let mut label = vec![];
        let n = self.reader.read_until(0, &mut label)?;
        self.offset += n as u64;
        if label.pop() != Some(0) {
            return Err(self.malformed(start, RecordField::Label));
        }
        let label: String = label.into_iter().map(char::from).collect();

        let latitude = self.read_field(start, RecordField::Latitude, 4, |r| {
            r.read_f32::<LittleEndian>()
        })?;
        let longitude = self.read_field(start, RecordField::Longitude, 4, |r| {
            r.read_f32::<LittleEndian>()
        })?;
        let timestamp = self.read_field(start, RecordField::Timestamp, 8, |r| {
            r.read_u64::<LittleEndian>()
        })?;

        self.record += 1;
        Ok(Some(PositionRecord::new(
            id,
            label,
            Point::new(latitude, longitude),
            timestamp,
        )))
    }

    fn read_field<T>(
        &mut self,
        start: u64,
        field: RecordField,
        size: u64,
        read: impl FnOnce(&mut R) -> io::Result<T>,
    ) -> Result<T> {
        match read(&mut self.reader) {
            Ok(value) => {
                self.offset += size;
                Ok(value)
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(self.malformed(start, field))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn malformed(&self, start: u64, field: RecordField) -> QuadtreeError {
        QuadtreeError::MalformedRecordStream {
            record: self.record,
            offset: start,
            field,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<PositionRecord<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Fill `buf` from `reader`, stopping early only at the end of the stream. Returns the number of
/// bytes read.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Decode every record of a stream. Fails without returning any record if the stream is
/// malformed.
pub fn read_records(reader: impl BufRead) -> Result<Vec<PositionRecord<f32>>> {
    RecordReader::new(reader).collect()
}

/// Counts reported by [`load_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Records decoded from the stream.
    pub read: usize,
    /// Records stored in the tree.
    pub stored: usize,
    /// Records dropped because they fell outside the tree's bounds.
    pub dropped: usize,
}

/// Decode a record stream straight into a builder.
///
/// Records are added as they are decoded. If the stream turns out to be malformed the error is
/// returned and the truncated record is not added; records decoded before it remain in the
/// builder.
pub fn load_into<R: BufRead>(
    reader: RecordReader<R>,
    builder: &mut QuadtreeBuilder<f32>,
) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();
    for record in reader {
        let record = record?;
        summary.read += 1;
        if builder.add(record) {
            summary.stored += 1;
        } else {
            summary.dropped += 1;
        }
    }
    debug!(
        read = summary.read,
        stored = summary.stored,
        dropped = summary.dropped,
        "loaded position records"
    );
    Ok(summary)
}

/// Encodes [`PositionRecord`]s into a binary record stream.
#[derive(Debug)]
pub struct RecordWriter<W> {
    writer: W,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap a writer. Wrap unbuffered writers in a [`std::io::BufWriter`] first.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Append one record to the stream.
    ///
    /// Fails with [`QuadtreeError::InvalidLabel`] if the label contains a NUL or a character
    /// above U+00FF, and writes nothing in that case.
    pub fn write_record(&mut self, record: &PositionRecord<f32>) -> Result<()> {
        let label = encode_label(record.label())?;
        self.writer.write_i32::<LittleEndian>(record.id())?;
        self.writer.write_all(&label)?;
        self.writer.write_u8(0)?;
        self.writer
            .write_f32::<LittleEndian>(record.position().latitude())?;
        self.writer
            .write_f32::<LittleEndian>(record.position().longitude())?;
        self.writer.write_u64::<LittleEndian>(record.timestamp())?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Encode every record into `writer`.
pub fn write_records<'a, W: Write>(
    writer: W,
    records: impl IntoIterator<Item = &'a PositionRecord<f32>>,
) -> Result<W> {
    let mut writer = RecordWriter::new(writer);
    for record in records {
        writer.write_record(record)?;
    }
    writer.into_inner()
}

fn encode_label(label: &str) -> Result<Vec<u8>> {
    label
        .chars()
        .map(|c| match u8::try_from(c) {
            Ok(b) if b != 0 => Ok(b),
            _ => Err(QuadtreeError::InvalidLabel(label.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::test::record;

    fn encode(records: &[PositionRecord<f32>]) -> Vec<u8> {
        write_records(vec![], records).unwrap()
    }

    #[test]
    fn encodes_little_endian_layout() {
        let record = PositionRecord::new(1, "AB", Point::new(1.0, 2.0), 5);
        let bytes = encode(&[record]);
        let fields: [&[u8]; 5] = [
            &[1, 0, 0, 0],
            b"AB\0",
            &[0x00, 0x00, 0x80, 0x3f],
            &[0x00, 0x00, 0x00, 0x40],
            &[5, 0, 0, 0, 0, 0, 0, 0],
        ];
        let expected = fields.concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn decodes_written_records() {
        let records = vec![
            record(7, 34.544909, -102.100843),
            PositionRecord::new(-3, "", Point::new(-1.5, 179.0), u64::MAX),
        ];
        let decoded = read_records(encode(&records).as_slice()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn empty_stream_has_no_records() {
        let mut reader = RecordReader::new(&b""[..]);
        assert!(reader.read_record().unwrap().is_none());
        assert!(reader.next().is_none());
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn labels_are_single_byte_characters() {
        let mut bytes = vec![9, 0, 0, 0, b'C', 0xe9, 0];
        bytes.extend_from_slice(&[0; 16]);
        let decoded = read_records(bytes.as_slice()).unwrap();
        assert_eq!(decoded[0].label(), "C\u{e9}");
        assert_eq!(encode(&decoded), bytes);
    }

    #[test]
    fn unterminated_label_is_malformed() {
        let mut bytes = encode(&[record(1, 1.0, 1.0)]);
        let first_len = bytes.len() as u64;
        bytes.extend_from_slice(&[2, 0, 0, 0]);
        bytes.extend_from_slice(b"ABC");

        let err = read_records(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            QuadtreeError::MalformedRecordStream {
                record: 1,
                offset,
                field: RecordField::Label,
            } if offset == first_len
        ));
    }

    #[test]
    fn malformed_record_is_not_inserted() {
        let bytes = [2, 0, 0, 0, b'A', b'B', b'C'];
        let mut builder = QuadtreeBuilder::new(Rectangle::world());
        let err = load_into(RecordReader::new(bytes.as_slice()), &mut builder).unwrap_err();
        assert!(matches!(
            err,
            QuadtreeError::MalformedRecordStream {
                record: 0,
                offset: 0,
                field: RecordField::Label,
            }
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn truncated_fields_are_malformed() {
        let full = encode(&[record(1, 1.0, 2.0)]);
        // identifier (4) + "REG00001\0" (9) + latitude (4) + longitude (4) + timestamp (8)
        assert_eq!(full.len(), 29);
        let cases = [
            (2, RecordField::Identifier),
            (4, RecordField::Label),
            (13, RecordField::Latitude),
            (15, RecordField::Latitude),
            (17, RecordField::Longitude),
            (21, RecordField::Timestamp),
            (28, RecordField::Timestamp),
        ];
        for (len, expected) in cases {
            let err = read_records(&full[..len]).unwrap_err();
            match err {
                QuadtreeError::MalformedRecordStream { record, field, .. } => {
                    assert_eq!(record, 0);
                    assert_eq!(field, expected, "truncated at {len}");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn reader_stops_after_error() {
        let mut bytes = encode(&[record(1, 1.0, 1.0), record(2, 2.0, 2.0)]);
        bytes.push(3);
        let mut reader = RecordReader::new(bytes.as_slice());
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn load_counts_dropped_records() {
        let records = [record(1, 1.0, 1.0), record(2, 50.0, 50.0), record(3, 2.0, 2.0)];
        let bytes = encode(&records);
        let mut builder = QuadtreeBuilder::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let summary = load_into(RecordReader::new(bytes.as_slice()), &mut builder).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                read: 3,
                stored: 2,
                dropped: 1
            }
        );
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn writer_rejects_unencodable_labels() {
        for label in ["A\0B", "\u{142}odz"] {
            let record = PositionRecord::new(1, label, Point::new(0.0, 0.0), 0);
            let mut writer = RecordWriter::new(vec![]);
            assert!(matches!(
                writer.write_record(&record),
                Err(QuadtreeError::InvalidLabel(_))
            ));
            assert!(writer.into_inner().unwrap().is_empty());
        }
    }
}
