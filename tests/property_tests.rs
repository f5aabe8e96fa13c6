use collex::{from_str, text, Document, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Values whose rendered form parses back to the same kind. Int64 is drawn
/// outside the i32 range because smaller values re-narrow on parse.
fn stable_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".*".prop_map(Value::Text),
        any::<i32>().prop_map(Value::Int32),
        ((i32::MAX as i64 + 1)..i64::MAX).prop_map(Value::Int64),
        ((i64::MIN + 1)..(i32::MIN as i64)).prop_map(Value::Int64),
        (-1.0e12f64..1.0e12).prop_map(Value::Float64),
        any::<bool>().prop_map(Value::Bool),
        proptest::collection::vec(any::<u8>(), 0..64).prop_map(Value::Opaque),
    ]
}

/// Keys are generated without leading or trailing spaces, which the parser
/// would trim away.
fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z_ -]{0,10}[a-z]|[a-z]"
}

fn entries() -> impl Strategy<Value = BTreeMap<String, Vec<Value>>> {
    proptest::collection::btree_map(key(), proptest::collection::vec(stable_value(), 1..5), 0..8)
}

proptest! {
    #[test]
    fn escape_unescape_round_trip(s in ".*") {
        let escaped = text::escape(&s);
        prop_assert_eq!(text::unescape(&escaped).unwrap(), s);
    }

    #[test]
    fn escaped_text_has_no_raw_specials(s in ".*") {
        let escaped = text::escape(&s);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\t'));
        prop_assert!(!escaped.contains('\r'));
        // every double quote is preceded by a backslash
        let bytes = escaped.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'"' {
                prop_assert!(i > 0 && bytes[i - 1] == b'\\');
            }
        }
    }

    #[test]
    fn documents_round_trip_inline(map in entries()) {
        let mut doc = Document::new();
        for (k, vs) in &map {
            doc.put(k, vs.clone()).unwrap();
        }

        let rendered = doc.render(0).unwrap();
        let mut back = from_str(&rendered).unwrap();
        back.materialize().unwrap();
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn documents_round_trip_pretty(map in entries(), indent in 1usize..8) {
        let mut doc = Document::new();
        for (k, vs) in &map {
            doc.put(k, vs.clone()).unwrap();
        }

        let rendered = doc.render(indent).unwrap();
        let mut back = from_str(&rendered).unwrap();
        back.materialize().unwrap();
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn inline_rendering_is_single_line(map in entries()) {
        let mut doc = Document::new();
        for (k, vs) in &map {
            doc.put(k, vs.clone()).unwrap();
        }
        let rendered = doc.render(0).unwrap();
        prop_assert!(!rendered.contains('\n'));
        prop_assert!(rendered.starts_with('<') && rendered.ends_with('>'));
    }

    #[test]
    fn nested_documents_round_trip(inner in entries(), indent in 0usize..5) {
        let mut child = Document::new();
        for (k, vs) in &inner {
            child.put(k, vs.clone()).unwrap();
        }
        let mut doc = Document::new();
        doc.put_one("nested", Value::Collection(child)).unwrap();
        doc.put_one("marker", Value::from(true)).unwrap();

        let rendered = doc.render(indent).unwrap();
        let mut back = from_str(&rendered).unwrap();
        back.materialize().unwrap();
        doc.materialize().unwrap();
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn integers_survive_reparse_with_exact_kind(n in any::<i64>()) {
        let mut doc = Document::new();
        let original = if let Ok(small) = i32::try_from(n) {
            Value::Int32(small)
        } else {
            Value::Int64(n)
        };
        doc.put_one("n", original.clone()).unwrap();

        let rendered = doc.render(0).unwrap();
        let mut back = from_str(&rendered).unwrap();
        prop_assert_eq!(back.values("n").unwrap(), &[original][..]);
    }

    #[test]
    fn finite_floats_survive_reparse(f in -1.0e15f64..1.0e15) {
        let mut doc = Document::new();
        doc.put_one("f", Value::Float64(f)).unwrap();

        let rendered = doc.render(0).unwrap();
        let mut back = from_str(&rendered).unwrap();
        match back.values("f").unwrap() {
            [Value::Float64(g)] => prop_assert_eq!(*g, f),
            other => prop_assert!(false, "reparsed as {:?}", other),
        }
    }

    #[test]
    fn keys_preserve_insertion_order(ks in proptest::collection::btree_set(key(), 1..10)) {
        let mut doc = Document::new();
        for k in &ks {
            doc.put_one(k, Value::from(1)).unwrap();
        }
        let inserted: Vec<&str> = ks.iter().map(String::as_str).collect();
        prop_assert_eq!(doc.keys().collect::<Vec<_>>(), inserted);
    }
}
