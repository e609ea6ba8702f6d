//! Decoding one raw record into a snapshot
//!
//! The decoder walks the layout in wire order over a flat little-endian
//! element sequence. Every field consumes its full element count, reserved
//! or not: skipping a reserved field's bytes without decoding them would
//! shift the offset of every field after it.

use crate::error::{Result, TelemetryError};
use crate::schema::{ElementKind, RecordLayout};
use crate::snapshot::{TelemetrySnapshot, TelemetryValue};

/// Cursor over the flat element sequence of one record
struct ElementCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ElementCursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn take(&mut self) -> [u8; 4] {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        raw
    }

    #[inline]
    fn next_int(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    #[inline]
    fn next_float(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Decode one raw record against its layout
///
/// `buf` must be exactly `layout.byte_size()` bytes; anything else fails
/// with [`TelemetryError::LayoutMismatch`] before any decoding. A conforming
/// buffer always decodes completely: same input, same snapshot, no partial
/// results.
pub fn decode_record(layout: &RecordLayout, buf: &[u8]) -> Result<TelemetrySnapshot> {
    let expected = layout.byte_size();
    if buf.len() != expected {
        return Err(TelemetryError::LayoutMismatch {
            expected,
            got: buf.len(),
        });
    }

    let mut cursor = ElementCursor::new(buf);
    let mut snapshot = TelemetrySnapshot::with_capacity(layout.fields().len());

    for field in layout.fields() {
        let n = field.element_count();
        let value = match field.kind {
            ElementKind::Int32 => {
                if field.count > 1 {
                    TelemetryValue::Ints((0..n).map(|_| cursor.next_int()).collect())
                } else {
                    TelemetryValue::Int(cursor.next_int())
                }
            }
            ElementKind::Float32 => {
                if field.count > 1 {
                    TelemetryValue::Floats((0..n).map(|_| cursor.next_float()).collect())
                } else {
                    TelemetryValue::Float(cursor.next_float())
                }
            }
        };

        // Reserved fields were decoded only to advance the cursor
        if field.available {
            snapshot.insert(field.name, value);
        }
    }

    debug_assert_eq!(cursor.remaining(), 0);
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;

    fn record(elements: &[(&str, f64)]) -> Vec<u8> {
        // build a raw buffer from (kind, value) pairs; "i" ints, "f" floats
        let mut buf = Vec::new();
        for (kind, value) in elements {
            match *kind {
                "i" => buf.extend_from_slice(&(*value as i32).to_le_bytes()),
                "f" => buf.extend_from_slice(&(*value as f32).to_le_bytes()),
                _ => unreachable!(),
            }
        }
        buf
    }

    static MIXED: &[FieldDescriptor] = &[
        FieldDescriptor::int("a"),
        FieldDescriptor::floats("b", 3).reserved(),
        FieldDescriptor::float("c"),
    ];

    #[test]
    fn reserved_fields_consume_but_stay_hidden() {
        let layout = RecordLayout::new(MIXED).unwrap();
        let buf = record(&[
            ("i", 42.0),
            ("f", 1.0),
            ("f", 2.0),
            ("f", 3.0),
            ("f", 9.5),
        ]);

        let snapshot = decode_record(&layout, &buf).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a"), Some(&TelemetryValue::Int(42)));
        assert_eq!(snapshot.get("c"), Some(&TelemetryValue::Float(9.5)));
        assert_eq!(snapshot.get("b"), None);
    }

    #[test]
    fn short_buffer_fails_before_decoding() {
        let layout = RecordLayout::new(MIXED).unwrap();
        let buf = vec![0u8; layout.byte_size() - 1];

        let err = decode_record(&layout, &buf).unwrap_err();
        match err {
            TelemetryError::LayoutMismatch { expected, got } => {
                assert_eq!(expected, 20);
                assert_eq!(got, 19);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_buffer_rejected() {
        let layout = RecordLayout::new(MIXED).unwrap();
        let buf = vec![0u8; layout.byte_size() + 4];
        assert!(matches!(
            decode_record(&layout, &buf),
            Err(TelemetryError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn array_elements_keep_wire_order() {
        static FIELDS: &[FieldDescriptor] = &[FieldDescriptor::floats("corners", 4)];
        let layout = RecordLayout::new(FIELDS).unwrap();
        let buf = record(&[("f", 4.0), ("f", 3.0), ("f", 2.0), ("f", 1.0)]);

        let snapshot = decode_record(&layout, &buf).unwrap();
        assert_eq!(
            snapshot.get("corners"),
            Some(&TelemetryValue::Floats(vec![4.0, 3.0, 2.0, 1.0]))
        );
    }

    #[test]
    fn int_arrays_decode() {
        static FIELDS: &[FieldDescriptor] = &[FieldDescriptor::ints("flags", 2)];
        let layout = RecordLayout::new(FIELDS).unwrap();
        let buf = record(&[("i", -1.0), ("i", 7.0)]);

        let snapshot = decode_record(&layout, &buf).unwrap();
        assert_eq!(
            snapshot.get("flags"),
            Some(&TelemetryValue::Ints(vec![-1, 7]))
        );
    }

    #[test]
    fn all_reserved_layout_yields_empty_snapshot() {
        static FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::int("x").reserved(),
            FieldDescriptor::floats("y", 2).reserved(),
        ];
        let layout = RecordLayout::new(FIELDS).unwrap();
        let buf = vec![0u8; layout.byte_size()];

        let snapshot = decode_record(&layout, &buf).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn decoding_is_deterministic() {
        let layout = RecordLayout::new(MIXED).unwrap();
        let buf = record(&[
            ("i", 1.0),
            ("f", 0.1),
            ("f", 0.2),
            ("f", 0.3),
            ("f", 0.4),
        ]);

        let first = decode_record(&layout, &buf).unwrap();
        let second = decode_record(&layout, &buf).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn physics_record_roundtrip() {
        let layout = crate::schema::physics_layout();
        let mut buf = Vec::with_capacity(layout.byte_size());
        for field in layout.fields() {
            for i in 0..field.element_count() {
                match field.kind {
                    ElementKind::Int32 => buf.extend_from_slice(&(i as i32).to_le_bytes()),
                    ElementKind::Float32 => {
                        buf.extend_from_slice(&(i as f32 + 0.5).to_le_bytes())
                    }
                }
            }
        }

        let snapshot = decode_record(layout, &buf).unwrap();
        let available = layout.fields().iter().filter(|f| f.available).count();
        assert_eq!(snapshot.len(), available);

        // reserved protocol fields never leak into the snapshot
        assert!(snapshot.get("tyreTempI").is_none());
        assert!(snapshot.get("P2PStatus").is_none());

        assert_eq!(snapshot.get("packetId"), Some(&TelemetryValue::Int(0)));
        assert_eq!(
            snapshot.get("velocity"),
            Some(&TelemetryValue::Floats(vec![0.5, 1.5, 2.5]))
        );
    }
}
