//! Group fields: start and end tags, nesting and additive merging.

use protofield::{DecodeError, Message};
use protofield_conformance::Envelope;
use protofield_conformance::envelope::Header;

#[test]
fn test_group_tags() {
    let mut m = Envelope::default();
    m.header_mut().set_title("hi");

    let bytes = m.encode_to_vec();
    assert_eq!(bytes, [0x83, 0x01, 0x0A, 0x02, b'h', b'i', 0x84, 0x01]);
    assert_eq!(m.calculate_size(), bytes.len());
}

#[test]
fn test_empty_group() {
    let mut m = Envelope::default();
    m.header_mut();
    assert!(m.has_header());
    assert_eq!(m.encode_to_vec(), [0x83, 0x01, 0x84, 0x01]);
    assert_eq!(m.calculate_size(), 4);
}

#[test]
fn test_nested_group() {
    let mut m = Envelope::default();
    m.header_mut().meta_mut().set_author("a");

    let bytes = m.encode_to_vec();
    assert_eq!(
        bytes,
        [0x83, 0x01, 0x1B, 0x0A, 0x01, b'a', 0x1C, 0x84, 0x01]
    );
    assert_eq!(m.calculate_size(), bytes.len());

    let decoded = Envelope::decode(&bytes[..]).unwrap();
    assert_eq!(decoded.header().meta().author(), "a");
    assert_eq!(decoded, m);
}

#[test]
fn test_decode_encode_is_byte_identical() {
    let bytes = [
        0x08, 0x09, // id: 9
        0x83, 0x01, // header {
        0x0A, 0x01, b't', // title: "t"
        0x10, 0x02, // priority: 2
        0x1B, 0x10, 0x03, 0x1C, // meta { revision: 3 }
        0x84, 0x01, // }
    ];
    let m = Envelope::decode(&bytes[..]).unwrap();
    assert_eq!(m.header().meta().revision(), 3);
    assert_eq!(m.encode_to_vec(), bytes);
}

#[test]
fn test_absent_group_reads_as_default() {
    let m = Envelope::default();
    assert!(!m.has_header());
    assert_eq!(m.header().title(), "");
    assert!(std::ptr::eq(m.header(), Header::default_instance()));
}

#[test]
fn test_set_and_clear() {
    let mut header = Header::default();
    header.set_priority(4);

    let mut m = Envelope::default();
    m.set_header(header.clone());
    assert_eq!(m.header(), &header);

    m.clear_header();
    assert!(!m.has_header());
}

#[test]
fn test_repeated_occurrences_merge() {
    let bytes = [
        0x83, 0x01, 0x0A, 0x01, b'a', 0x84, 0x01, // header { title: "a" }
        0x83, 0x01, 0x10, 0x05, 0x84, 0x01, // header { priority: 5 }
    ];
    let m = Envelope::decode(&bytes[..]).unwrap();
    assert_eq!(m.header().title(), "a");
    assert_eq!(m.header().priority(), 5);
}

#[test]
fn test_merge_is_additive() {
    let mut a = Envelope::default();
    a.header_mut().set_title("t");
    a.header_mut().meta_mut().set_revision(1);

    let mut b = Envelope::default();
    b.header_mut().set_priority(2);
    b.header_mut().meta_mut().set_author("b");

    a.merge_from(&b);
    assert_eq!(a.header().title(), "t");
    assert_eq!(a.header().priority(), 2);
    assert_eq!(a.header().meta().revision(), 1);
    assert_eq!(a.header().meta().author(), "b");
}

#[test]
fn test_merge_from_absent_group() {
    let mut a = Envelope::default();
    a.merge_from(&Envelope::default());
    assert!(!a.has_header());
}

#[test]
fn test_mismatched_end_group() {
    // header opened, closed with the end tag of field 17.
    let bytes = [0x83, 0x01, 0x0A, 0x00, 0x8C, 0x01];
    assert_eq!(
        Envelope::decode(&bytes[..]),
        Err(DecodeError::MismatchedEndGroup {
            expected: 132,
            actual: 140,
        })
    );
}

#[test]
fn test_truncated_group() {
    let bytes = [0x83, 0x01, 0x0A, 0x00];
    assert_eq!(
        Envelope::decode(&bytes[..]),
        Err(DecodeError::TruncatedGroup { field_number: 16 })
    );
}

#[test]
fn test_stray_end_group() {
    let bytes = [0x84, 0x01];
    assert_eq!(
        Envelope::decode(&bytes[..]),
        Err(DecodeError::UnexpectedEndGroup { field_number: 16 })
    );
}

#[test]
fn test_unknown_group_is_skipped() {
    // field 30 group holding a varint, then `id`.
    let bytes = [0xF3, 0x01, 0x08, 0x01, 0xF4, 0x01, 0x08, 0x02];
    let m = Envelope::decode(&bytes[..]).unwrap();
    assert_eq!(m.id(), 2);
}

#[test]
fn test_display() {
    let mut m = Envelope::default();
    m.set_id(1);
    m.header_mut().set_title("t");
    assert_eq!(m.to_string(), r#"{ "id": 1, "header": { "title": "t" } }"#);
}
