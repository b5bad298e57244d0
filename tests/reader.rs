mod common;

use common::{EsmBuilder, Fields};
use encoding_rs::{WINDOWS_1251, WINDOWS_1252};
use esm_catalogue::esm::format::{EsmReader, RecordReader, header};
use esm_catalogue::esm::resolver::FileContext;
use esm_catalogue::esm::types::models::{FormId, HeaderVariant, RecordFlags, RecordHeader};
use esm_catalogue::esm::types::tags::{self, Tag, TagRole, rec};
use esm_catalogue::{LoadError, parse_encoding};

fn door_header(payload: &[u8]) -> RecordHeader {
    RecordHeader {
        kind: rec::DOOR,
        data_size: payload.len() as u32,
        flags: RecordFlags::default(),
        form_id: 0x0000_0010,
        revision: 0,
        form_version: None,
    }
}

#[test]
fn sub_chunks_are_consumed_exactly() {
    let fields = Fields::new()
        .string(b"EDID", "DoorA")
        .u32(b"SCRI", 7)
        .raw(b"MODT", &[1, 2, 3]);
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(fields.bytes()), fields.bytes(), &context, WINDOWS_1252);

    let sub = reader.next_sub_chunk().expect("EDID header").expect("EDID present");
    assert_eq!(sub.tag, tags::EDID);
    assert_eq!(sub.len, 6);
    assert_eq!(reader.read_string().unwrap(), "DoorA");
    assert_eq!(reader.remaining(), 0);

    let sub = reader.next_sub_chunk().unwrap().unwrap();
    assert_eq!(sub.tag, tags::SCRI);
    assert_eq!(reader.read_form_id().unwrap(), Some(FormId::new(0, 7)));

    // Left unread on purpose: moving on discards it
    let sub = reader.next_sub_chunk().unwrap().unwrap();
    assert_eq!(sub.tag, tags::MODT);
    assert_eq!(sub.len, 3);

    assert!(reader.next_sub_chunk().unwrap().is_none());
    assert_eq!(reader.take_references(), vec![FormId::new(0, 7)]);
}

#[test]
fn reads_are_bounded_by_the_sub_chunk() {
    let fields = Fields::new().raw(b"DATA", &[1, 2]).u32(b"FNAM", 9);
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(fields.bytes()), fields.bytes(), &context, WINDOWS_1252);

    reader.next_sub_chunk().unwrap();
    let err = reader.read_value::<u32>().unwrap_err();
    match err {
        LoadError::TruncatedRecord { kind, tag, need, have } => {
            assert_eq!(kind, rec::DOOR);
            assert_eq!(tag, tags::DATA);
            assert_eq!(need, 4);
            assert_eq!(have, 2);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn sub_chunk_overrunning_the_record_is_truncated() {
    let mut payload = Fields::new().raw(b"FULL", b"Iron Door\0").bytes().to_vec();
    payload.truncate(payload.len() - 3);
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(&payload), &payload, &context, WINDOWS_1252);

    let err = reader.next_sub_chunk().unwrap_err();
    assert!(
        matches!(err, LoadError::TruncatedRecord { need: 10, have: 7, .. }),
        "unexpected error {:?}",
        err
    );
}

#[test]
fn trailing_fragment_is_corrupt_framing() {
    let mut payload = Fields::new().u32(b"SCRI", 1).bytes().to_vec();
    payload.extend_from_slice(b"ED");
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(&payload), &payload, &context, WINDOWS_1252);

    reader.next_sub_chunk().unwrap();
    let err = reader.next_sub_chunk().unwrap_err();
    assert!(matches!(err, LoadError::CorruptFraming { .. }), "unexpected error {:?}", err);
}

#[test]
fn oversize_marker_sets_the_next_length() {
    let long_text = "x".repeat(70_000);
    let mut data = long_text.as_bytes().to_vec();
    data.push(0);
    let fields = Fields::new().oversize(b"DESC", &data).string(b"EDID", "Tome");
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(fields.bytes()), fields.bytes(), &context, WINDOWS_1252);

    let sub = reader.next_sub_chunk().unwrap().unwrap();
    assert_eq!(sub.tag, tags::DESC);
    assert_eq!(sub.len, 70_001);
    assert_eq!(reader.read_string().unwrap().len(), 70_000);

    let sub = reader.next_sub_chunk().unwrap().unwrap();
    assert_eq!(sub.tag, tags::EDID);
    assert_eq!(reader.read_string().unwrap(), "Tome");
    assert!(reader.next_sub_chunk().unwrap().is_none());
}

#[test]
fn zero_reference_is_none_and_not_recorded() {
    let fields = Fields::new().u32(b"SCRI", 0);
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(fields.bytes()), fields.bytes(), &context, WINDOWS_1252);

    reader.next_sub_chunk().unwrap();
    assert_eq!(reader.read_form_id().unwrap(), None);
    assert!(reader.take_references().is_empty());
}

#[test]
fn strings_use_the_configured_encoding() {
    // "Дверь" in windows-1251
    let fields = Fields::new().raw(b"FULL", &[0xC4, 0xE2, 0xE5, 0xF0, 0xFC, 0x00]);
    let context = FileContext::standalone("Test.esm", 0);
    let mut reader = RecordReader::new(door_header(fields.bytes()), fields.bytes(), &context, WINDOWS_1251);

    reader.next_sub_chunk().unwrap();
    assert_eq!(reader.read_string().unwrap(), "Дверь");
    assert_eq!(parse_encoding("win1251"), Some(WINDOWS_1251));
    assert_eq!(parse_encoding("cp1252"), Some(WINDOWS_1252));
    assert_eq!(parse_encoding("klingon"), None);
}

#[test]
fn walks_nested_groups_in_file_order() {
    let data = EsmBuilder::new(&[])
        .begin_group(b"DOOR")
        .record(b"DOOR", 1, common::door("DoorA", "Iron Door", 0))
        .record(b"DOOR", 2, common::door("DoorB", "Oak Door", 0))
        .end_group()
        .begin_group(b"CELL")
        .begin_group(b"\0\0\0\0")
        .record(b"CELL", 3, common::interior_cell("Guild"))
        .end_group()
        .begin_group(b"\0\0\0\0")
        .end_group()
        .end_group()
        .record(b"STAT", 4, Fields::new().string(b"EDID", "Rock"))
        .build();

    let mut reader = EsmReader::new(&data);
    assert_eq!(reader.variant(), HeaderVariant::Long);
    let file = header::parse(&mut reader, "Test.esm", WINDOWS_1252).expect("file header");
    assert_eq!(file.author.as_deref(), Some("tests"));

    let mut seen = Vec::new();
    while let Some(record) = reader.next_record().expect("well-formed file") {
        seen.push((record.kind(), record.header.form_id, reader.depth()));
    }
    assert_eq!(
        seen,
        vec![
            (rec::DOOR, 1, 1),
            (rec::DOOR, 2, 1),
            (rec::CELL, 3, 2),
            (rec::STAT, 4, 0),
        ]
    );
}

#[test]
fn group_overrunning_its_parent_is_corrupt() {
    let mut data = EsmBuilder::new(&[])
        .begin_group(b"DOOR")
        .record(b"DOOR", 1, common::door("DoorA", "Iron Door", 0))
        .end_group()
        .build();
    // Claim a group size past the end of the file
    let group_start = data.len() - 24 - common::door("DoorA", "Iron Door", 0).bytes().len() - 24;
    data[group_start + 4..group_start + 8].copy_from_slice(&10_000u32.to_le_bytes());

    let mut reader = EsmReader::new(&data);
    header::parse(&mut reader, "Test.esm", WINDOWS_1252).unwrap();
    let err = reader.next_record().unwrap_err();
    assert!(matches!(err, LoadError::CorruptFraming { .. }), "unexpected error {:?}", err);
}

#[test]
fn short_headers_are_detected() {
    let data = EsmBuilder::short(&[])
        .record(b"STAT", 9, Fields::new().string(b"EDID", "Rock"))
        .build();
    assert_eq!(&data[20..24], b"HEDR");

    let mut reader = EsmReader::new(&data);
    assert_eq!(reader.variant(), HeaderVariant::Short);
    let file = header::parse(&mut reader, "Old.esm", WINDOWS_1252).unwrap();
    assert_eq!(file.variant, HeaderVariant::Short);

    let record = reader.next_record().unwrap().expect("STAT record");
    assert_eq!(record.kind(), rec::STAT);
    assert_eq!(record.header.form_id, 9);
    assert_eq!(record.header.form_version, None);
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn compressed_payload_inflates_transparently() {
    let fields = common::door("DoorA", "Iron Door", 0);
    let data = EsmBuilder::new(&[])
        .compressed_record(b"DOOR", 1, fields.clone())
        .build();

    let mut reader = EsmReader::new(&data);
    header::parse(&mut reader, "Test.esm", WINDOWS_1252).unwrap();
    let record = reader.next_record().unwrap().unwrap();
    assert!(record.header.flags.is_compressed());
    assert_eq!(&*record.body().unwrap(), fields.bytes());
}

#[test]
fn compressed_payload_with_wrong_size_fails() {
    let mut data = EsmBuilder::new(&[])
        .compressed_record(b"DOOR", 1, common::door("DoorA", "Iron Door", 0))
        .build();
    // The size prefix sits right after the header that follows TES4
    let tes4_len = 24 + u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize;
    let prefix = tes4_len + 24;
    data[prefix..prefix + 4].copy_from_slice(&3u32.to_le_bytes());

    let mut reader = EsmReader::new(&data);
    header::parse(&mut reader, "Test.esm", WINDOWS_1252).unwrap();
    let record = reader.next_record().unwrap().unwrap();
    let err = record.body().unwrap_err();
    assert!(
        matches!(err, LoadError::SizeMismatch { expected: 3, .. }),
        "unexpected error {:?}",
        err
    );
}

#[test]
fn file_must_start_with_a_header_record() {
    let data = EsmBuilder::new(&[]).build();
    let mut bad = data.clone();
    bad[..4].copy_from_slice(b"TES3");

    let mut reader = EsmReader::new(&bad);
    let err = header::parse(&mut reader, "Bad.esm", WINDOWS_1252).unwrap_err();
    match err {
        LoadError::InvalidMagic { expected, found } => {
            assert_eq!(expected, rec::TES4);
            assert_eq!(found, Tag::new(b"TES3"));
        }
        other => panic!("expected InvalidMagic, got {:?}", other),
    }
}

#[test]
fn header_lists_masters_in_order() {
    let data = EsmBuilder::new(&["Base.esm", "Expansion.esm"]).build();
    let mut reader = EsmReader::new(&data);
    let file = header::parse(&mut reader, "Patch.esp", WINDOWS_1252).unwrap();

    let names: Vec<&str> = file.masters.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Base.esm", "Expansion.esm"]);
    assert_eq!(file.version, 1.0);
    assert_eq!(file.next_object_id, 0x800);
    assert!(!file.is_master());
}

#[test]
fn tags_describe_themselves() {
    assert_eq!(TagRole::of(tags::EDID), Some(TagRole::EditorId));
    assert_eq!(tags::SCRI.role(), Some(TagRole::ScriptReference));
    assert_eq!(TagRole::of(Tag::new(b"ZZZZ")), None);
    assert_eq!(tags::describe(rec::CELL), "cell");
    assert_eq!(tags::describe(tags::FULL), "display name");
    assert_eq!(rec::DOOR.to_string(), "DOOR");
    assert_eq!(Tag([0, 1, 2, 3]).to_string(), "0x03020100");
}
