//! Emits a [`PropertyList`] into a [`HeaderSink`].

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::filter::Filter;
use crate::list::PropertyList;
use crate::property::{Property, Value, HISTORY};
use crate::source::{Commentary, HeaderSink, KeyMode};
use crate::unique::UniquenessTracker;
use crate::writer::{string_fits, DOUBLE_PRECISION, FLOAT_PRECISION};

/// Write every property of `list` to `sink` in list order.
///
/// Properties whose name `exclude` matches are skipped. A name seen earlier
/// in the same call is written with [`KeyMode::Update`]. The first failing
/// property aborts the call; cards already written stay in the sink.
pub fn serialize<S>(sink: &mut S, list: &PropertyList, exclude: Option<&Filter>) -> Result<()>
where
    S: HeaderSink + ?Sized,
{
    debug!(properties = list.len(), "serializing header");

    let total = list.len();
    let mut tracker = UniquenessTracker::new();
    let mut warned = false;
    let mut written = 0usize;

    for (index, property) in list.iter().enumerate() {
        let name = property.name();
        if exclude.is_some_and(|filter| filter.matches(name)) {
            trace!(key = name, "property excluded");
            continue;
        }

        if property.is_commentary() {
            sink.put_commentary(commentary_keyword(name), property.as_str()?)?;
            written += 1;
            continue;
        }

        let mode = if tracker.check_and_record(name, total - index - 1) {
            warn!(key = name, "duplicate key, updating the earlier card");
            KeyMode::Update
        } else {
            KeyMode::Write
        };

        if let Value::String(s) = property.value() {
            if !string_fits(name, s) {
                if !warned {
                    warn!(key = name, "using the long string convention");
                    sink.put_long_string_warning()?;
                    warned = true;
                }
                sink.put_long_string(mode, name, s, property.comment())?;
                written += 1;
                continue;
            }
        }

        put_typed(sink, mode, property)?;
        written += 1;
    }

    debug!(written, "header serialized");
    Ok(())
}

fn commentary_keyword(name: &str) -> Commentary {
    match name.trim_end() {
        "" => Commentary::Blank,
        HISTORY => Commentary::History,
        _ => Commentary::Comment,
    }
}

fn put_typed<S>(sink: &mut S, mode: KeyMode, property: &Property) -> Result<()>
where
    S: HeaderSink + ?Sized,
{
    let name = property.name();
    let comment = property.comment();
    match *property.value() {
        Value::Char(c) => sink.put_string(mode, name, &char::from(c).to_string(), comment),
        Value::Bool(b) => sink.put_logical(mode, name, b, comment),
        Value::Int(n) => sink.put_integer(mode, name, i64::from(n), comment),
        Value::Long(n) | Value::LongLong(n) => sink.put_integer(mode, name, n, comment),
        Value::Float(x) => sink.put_float(mode, name, f64::from(x), FLOAT_PRECISION, comment),
        Value::Double(x) => sink.put_float(mode, name, x, DOUBLE_PRECISION, comment),
        Value::String(ref s) => sink.put_string(mode, name, s, comment),
        Value::FloatComplex(re, im) => sink.put_complex(
            mode,
            name,
            (f64::from(re), f64::from(im)),
            FLOAT_PRECISION,
            comment,
        ),
        Value::DoubleComplex(re, im) => {
            sink.put_complex(mode, name, (re, im), DOUBLE_PRECISION, comment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::property::COMMENT;

    /// Records each call as a line of text.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn push(&mut self, mode: KeyMode, name: &str, what: String) -> Result<()> {
            if self.fail_on == Some(name) {
                return Err(Error::IllegalInput(format!("refusing {name}")));
            }
            self.calls.push(format!("{mode:?} {name} {what}"));
            Ok(())
        }
    }

    impl HeaderSink for Recorder {
        fn put_logical(
            &mut self,
            mode: KeyMode,
            name: &str,
            value: bool,
            _: Option<&str>,
        ) -> Result<()> {
            self.push(mode, name, format!("bool {value}"))
        }

        fn put_integer(
            &mut self,
            mode: KeyMode,
            name: &str,
            value: i64,
            _: Option<&str>,
        ) -> Result<()> {
            self.push(mode, name, format!("int {value}"))
        }

        fn put_float(
            &mut self,
            mode: KeyMode,
            name: &str,
            value: f64,
            precision: usize,
            _: Option<&str>,
        ) -> Result<()> {
            self.push(mode, name, format!("float {value} p{precision}"))
        }

        fn put_string(
            &mut self,
            mode: KeyMode,
            name: &str,
            value: &str,
            _: Option<&str>,
        ) -> Result<()> {
            self.push(mode, name, format!("string {value}"))
        }

        fn put_commentary(&mut self, keyword: Commentary, text: &str) -> Result<()> {
            self.calls.push(format!("{keyword:?} {text}"));
            Ok(())
        }
    }

    fn list(props: Vec<Property>) -> PropertyList {
        props.into_iter().collect()
    }

    fn prop(name: &str, value: Value) -> Property {
        Property::new(name, value).unwrap()
    }

    #[test]
    fn dispatch_by_type() {
        let mut sink = Recorder::default();
        let plist = list(vec![
            prop("SIMPLE", Value::Bool(true)),
            prop("NAXIS", Value::Int(0)),
            prop("BIG", Value::LongLong(1 << 40)),
            prop("F", Value::Float(0.5)),
            prop("D", Value::Double(0.25)),
            prop("C", Value::Char(b'x')),
            prop("S", Value::String(String::from("text"))),
            prop(COMMENT, Value::String(String::from("hello"))),
            prop(HISTORY, Value::String(String::from("done"))),
        ]);
        serialize(&mut sink, &plist, None).unwrap();
        assert_eq!(
            sink.calls,
            vec![
                "Write SIMPLE bool true",
                "Write NAXIS int 0",
                "Write BIG int 1099511627776",
                "Write F float 0.5 p7",
                "Write D float 0.25 p15",
                "Write C string x",
                "Write S string text",
                "Comment hello",
                "History done",
            ]
        );
    }

    #[test]
    fn duplicate_uses_update() {
        let mut sink = Recorder::default();
        let plist = list(vec![
            prop("FOO", Value::Int(1)),
            prop(COMMENT, Value::String(String::from("a"))),
            prop(COMMENT, Value::String(String::from("b"))),
            prop("FOO", Value::Int(2)),
        ]);
        serialize(&mut sink, &plist, None).unwrap();
        assert_eq!(sink.calls[0], "Write FOO int 1");
        assert_eq!(sink.calls[3], "Update FOO int 2");
    }

    #[test]
    fn exclude_filter_skips_matches() {
        let mut sink = Recorder::default();
        let plist = list(vec![prop("A", Value::Int(1)), prop("B", Value::Int(2))]);
        let filter = Filter::exact(["A"], false);
        serialize(&mut sink, &plist, Some(&filter)).unwrap();
        assert_eq!(sink.calls, vec!["Write B int 2"]);
    }

    #[test]
    fn complex_unsupported_by_default() {
        let mut sink = Recorder::default();
        let plist = list(vec![
            prop("A", Value::Int(1)),
            prop("Z", Value::DoubleComplex(1.0, 2.0)),
            prop("B", Value::Int(2)),
        ]);
        let err = serialize(&mut sink, &plist, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode(_)));
        assert_eq!(sink.calls, vec!["Write A int 1"]);
    }

    #[test]
    fn long_string_needs_support() {
        let mut sink = Recorder::default();
        let plist = list(vec![prop("LONG", Value::String("x".repeat(100)))]);
        assert!(matches!(
            serialize(&mut sink, &plist, None),
            Err(Error::UnsupportedMode(_))
        ));
    }

    #[test]
    fn failure_aborts_remaining() {
        let mut sink = Recorder {
            fail_on: Some("B"),
            ..Recorder::default()
        };
        let plist = list(vec![
            prop("A", Value::Int(1)),
            prop("B", Value::Int(2)),
            prop("C", Value::Int(3)),
        ]);
        assert!(serialize(&mut sink, &plist, None).is_err());
        assert_eq!(sink.calls, vec!["Write A int 1"]);
    }

    #[test]
    fn commentary_must_be_text() {
        let mut sink = Recorder::default();
        let plist = list(vec![prop(COMMENT, Value::Int(3))]);
        assert!(matches!(
            serialize(&mut sink, &plist, None),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
