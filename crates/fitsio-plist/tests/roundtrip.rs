//! Property-based round trip: any list of distinct keys survives
//! `serialize` followed by `load`, up to the written float precision.

use fitsio_plist::{load, serialize, CardWriter, HeaderBuffer, Property, PropertyList, Value};
use proptest::prelude::*;

/// Values that fit on one card together with a short comment.
fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int),
        (-1.0e12f64..1.0e12).prop_map(Value::Double),
        prop::string::string_regex("[A-Za-z0-9 '._-]{0,20}")
            .unwrap()
            .prop_map(|s| Value::String(s.trim_end().to_string())),
    ]
}

/// Comments as they read back: no trailing spaces, never empty.
fn comment() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::string::string_regex("[A-Za-z0-9 ._-]{0,20}").unwrap()).prop_map(
        |c| {
            c.map(|c| c.trim_end().to_string())
                .filter(|c| !c.is_empty())
        },
    )
}

fn property_list() -> impl Strategy<Value = PropertyList> {
    prop::collection::vec((value(), comment()), 0..30).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (value, comment))| {
                let mut property = Property::new(format!("KEY{i}"), value).unwrap();
                property.set_comment(comment);
                property
            })
            .collect()
    })
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => {
            x == y || (x - y).abs() <= 1e-14 * x.abs().max(y.abs())
        }
        _ => a == b,
    }
}

proptest! {
    #[test]
    fn serialize_then_load(list in property_list()) {
        let mut writer = CardWriter::new();
        serialize(&mut writer, &list, None).unwrap();
        let bytes = writer.into_header_bytes();

        if list.is_empty() {
            prop_assert!(load(&mut HeaderBuffer::new(bytes), 0, None).is_err());
            return Ok(());
        }

        let loaded = load(&mut HeaderBuffer::new(bytes), 0, None).unwrap();
        prop_assert_eq!(loaded.len(), list.len());
        for (original, read) in list.iter().zip(loaded.iter()) {
            prop_assert_eq!(original.name(), read.name());
            prop_assert_eq!(original.comment(), read.comment());
            prop_assert!(
                same_value(original.value(), read.value()),
                "{} != {}",
                original,
                read
            );
        }
    }
}
