use bigdecimal::BigDecimal;
use collex::{from_reader, from_str, Base64Codec, CodecError, Document, Error, OpaqueCodec, Value};
use std::io::Cursor;
use std::sync::Arc;

#[test]
fn test_end_to_end_document() {
    let mut doc = from_str(r#"<name: "Ann"; age: 30; tags: "x", "y";>"#).unwrap();

    assert_eq!(doc.values("name").unwrap(), &[Value::Text("Ann".into())]);
    assert_eq!(doc.values("age").unwrap(), &[Value::Int32(30)]);
    assert_eq!(
        doc.values("tags").unwrap(),
        &[Value::Text("x".into()), Value::Text("y".into())]
    );

    let rendered = doc.render(0).unwrap();
    let mut back = from_str(&rendered).unwrap();
    back.materialize().unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_numeric_boundaries_through_parse() {
    let mut doc = from_str(
        "<small: 2147483647; big: 2147483648; frac: 1.5; precise: 0.1000000000000000000001;>",
    )
    .unwrap();

    assert_eq!(doc.values("small").unwrap(), &[Value::Int32(i32::MAX)]);
    assert_eq!(doc.values("big").unwrap(), &[Value::Int64(2_147_483_648)]);
    assert_eq!(doc.values("frac").unwrap(), &[Value::Float64(1.5)]);
    assert_eq!(
        doc.values("precise").unwrap(),
        &[Value::Decimal(
            "0.1000000000000000000001".parse::<BigDecimal>().unwrap()
        )]
    );
}

#[test]
fn test_duplicate_key_is_syntax_error() {
    let err = from_str("<a: 1; a: 2;>").unwrap_err();
    assert!(matches!(err, Error::Syntax { key: Some(ref k), .. } if k == "a"));
}

#[test]
fn test_timestamps_round_trip_with_offset() {
    let mut doc = from_str("<when: 2024-01-15T10:30:00+0130;>").unwrap();
    let stamps = doc.timestamps("when").unwrap();
    assert_eq!(stamps.len(), 1);
    assert_eq!(stamps[0].offset().local_minus_utc(), 90 * 60);

    let rendered = doc.render(0).unwrap();
    assert!(rendered.contains("2024-01-15T10:30:00+0130"));
    let mut back = from_str(&rendered).unwrap();
    assert_eq!(back.timestamps("when").unwrap(), stamps);
}

#[test]
fn test_nested_collections() {
    let mut doc = from_str(r#"<user: <name: "Ann"; roles: "admin", "dev";>; version: 2;>"#).unwrap();
    let mut users = doc.collections("user").unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].strings("roles").unwrap(), vec!["admin", "dev"]);

    let pretty = doc.render(4).unwrap();
    let mut back = from_str(&pretty).unwrap();
    assert_eq!(back.render(0).unwrap(), doc.render(0).unwrap());
}

#[test]
fn test_opaque_round_trip_with_default_codec() {
    let payload = vec![0u8, 7, 42, 255];
    let mut doc = Document::new();
    doc.put_one("blob", Value::Opaque(payload.clone())).unwrap();

    let rendered = doc.render(0).unwrap();
    assert!(rendered.contains("i[\""));

    let mut back = from_str(&rendered).unwrap();
    assert_eq!(back.opaques("blob").unwrap(), vec![payload]);
}

#[test]
fn test_opaque_decode_failure_is_object_error() {
    let mut doc = from_str("<blob: i[\"*** not base64 ***\"];>").unwrap();
    let err = doc.values("blob").unwrap_err();
    assert!(matches!(err, Error::Object { ref key, .. } if key == "blob"));
}

/// Uppercase-hex codec standing in for a host serializer.
struct HexCodec;

impl OpaqueCodec for HexCodec {
    fn to_text(&self, bytes: &[u8]) -> Result<String, CodecError> {
        Ok(bytes.iter().map(|b| format!("{b:02X}")).collect())
    }

    fn from_text(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        if text.len() % 2 != 0 {
            return Err("odd-length hex payload".into());
        }
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&text[i..i + 2], 16).map_err(Into::into))
            .collect()
    }
}

#[test]
fn test_injected_codec_reaches_nested_documents() {
    let mut doc =
        Document::parse_with_codec("<outer: <blob: i[\"00FF\"];>;>", Arc::new(HexCodec)).unwrap();
    let mut nested = doc.collections("outer").unwrap();
    assert_eq!(nested[0].opaques("blob").unwrap(), vec![vec![0x00, 0xFF]]);

    // The same payload is not valid base64-decodable content under the
    // default codec arrangement it was never encoded with.
    let mut doc = Document::parse_with_codec("<blob: i[\"0F\"];>", Arc::new(HexCodec)).unwrap();
    assert_eq!(doc.opaques("blob").unwrap(), vec![vec![0x0F]]);
}

#[test]
fn test_kind_mismatch_carries_key_and_index() {
    let mut doc = from_str(r#"<mixed: 1, "two", 3;>"#).unwrap();
    let err = doc.ints("mixed").unwrap_err();
    assert_eq!(err, Error::kind_mismatch("mixed", 1, "int32", "text"));
}

#[test]
fn test_typed_accessors_on_absent_key_are_empty() {
    let mut doc = Document::new();
    assert!(doc.strings("nope").unwrap().is_empty());
    assert!(doc.ints("nope").unwrap().is_empty());
    assert!(doc.collections("nope").unwrap().is_empty());
}

#[test]
fn test_longs_widen_int32() {
    let mut doc = from_str("<nums: 1, 4294967296;>").unwrap();
    assert_eq!(doc.longs("nums").unwrap(), vec![1, 4_294_967_296]);
    // but ints() on the same set fails on the wide element
    assert_eq!(
        doc.ints("nums").unwrap_err(),
        Error::kind_mismatch("nums", 1, "int32", "int64")
    );
}

#[test]
fn test_mutation_flow() {
    let mut doc = from_str("<tags: \"a\";>").unwrap();
    doc.append("tags", Value::from("b")).unwrap();
    doc.put_one("count", Value::from(2)).unwrap();
    assert_eq!(doc.strings("tags").unwrap(), vec!["a", "b"]);

    doc.remove_at("tags", 0).unwrap();
    assert_eq!(doc.strings("tags").unwrap(), vec!["b"]);
    doc.remove_at("tags", 0).unwrap();
    assert!(!doc.has("tags"));

    let err = doc.remove_at("count", 5).unwrap_err();
    assert_eq!(err, Error::bounds("count", 5, 1));

    doc.remove("count");
    assert!(doc.is_empty());
}

#[test]
fn test_from_reader() {
    let text = r#"<name: "Ann";>"#;
    let mut a = from_str(text).unwrap();
    let mut b = from_reader(Cursor::new(text.as_bytes())).unwrap();
    a.materialize().unwrap();
    b.materialize().unwrap();
    assert_eq!(a, b);

    let c = collex::from_reader_with_codec(Cursor::new(text.as_bytes()), Arc::new(Base64Codec));
    assert!(c.is_ok());
}

#[test]
fn test_serde_json_interop() {
    let mut doc = from_str(r#"<name: "Ann"; age: 30; tags: "x", "y"; active: true;>"#).unwrap();
    doc.materialize().unwrap();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Ann",
            "age": 30,
            "tags": ["x", "y"],
            "active": true,
        })
    );

    let back: Document = serde_json::from_value(json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_serde_rejects_list_of_lists() {
    let json = serde_json::json!({ "grid": [[1, 2], [3, 4]] });
    let result: Result<Document, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn test_serde_rejects_unmaterialized_documents() {
    let doc = from_str("<a: 1;>").unwrap();
    assert!(serde_json::to_value(&doc).is_err());
}

#[test]
fn test_serde_nested_objects() {
    let json = serde_json::json!({
        "user": { "name": "Ann", "scores": [1, 2] },
        "version": 7,
    });
    let mut doc: Document = serde_json::from_value(json).unwrap();
    let mut users = doc.collections("user").unwrap();
    assert_eq!(users[0].ints("scores").unwrap(), vec![1, 2]);
    assert_eq!(doc.ints("version").unwrap(), vec![7]);

    // And the deserialized tree renders as ordinary notation.
    let text = doc.render(0).unwrap();
    assert!(from_str(&text).is_ok());
}
