use std::panic::{catch_unwind, AssertUnwindSafe};

use rstest::rstest;
use serde_json::json;
use jsonview::{
    parse_lazy_str, parse_lazy_str_with_options, with_lazy_slice, with_lazy_str, Error, ErrorKind,
    LazyValue, NullRepr, ParseOptions, Value,
};

const DOC: &str = r#"{"b":1,"a":[10,20,30],"c":{"d":"e","n":null},"x":1,"x":2}"#;

#[rstest]
fn object_get_and_misses() {
    let root = parse_lazy_str(DOC).unwrap();
    let object = root.as_object().unwrap();
    assert_eq!(object.get("b").unwrap(), LazyValue::UInt(1));
    assert_eq!(object.get("x").unwrap(), LazyValue::UInt(2));

    let err = object.get("zzz").unwrap_err();
    assert_eq!(err.kind, ErrorKind::KeyNotFound);
    assert!(object.find("zzz").unwrap().is_none());
    assert!(object.contains_key("c").unwrap());
    assert!(!object.contains_key("C").unwrap());
}

#[rstest]
fn object_enumerates_in_source_order() {
    let root = parse_lazy_str(r#"{"b":1,"a":2,"c":3}"#).unwrap();
    let object = root.as_object().unwrap();
    assert_eq!(object.keys().unwrap(), vec!["b", "a", "c"]);

    let entries: Vec<(String, LazyValue)> = object.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        entries,
        vec![
            ("b".to_string(), LazyValue::UInt(1)),
            ("a".to_string(), LazyValue::UInt(2)),
            ("c".to_string(), LazyValue::UInt(3)),
        ]
    );
}

#[rstest]
fn array_bounds_are_checked() {
    let root = parse_lazy_str("[1,2,3]").unwrap();
    let array = root.as_array().unwrap();
    assert_eq!(array.len().unwrap(), 3);
    assert_eq!(array.get(2).unwrap(), LazyValue::UInt(3));

    let err = array.get(3).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IndexOutOfRange);
    assert_eq!(err.to_string(), "index 3 out of range for array of length 3");

    // An index of -1 cannot be expressed; the closest a caller gets is a
    // wrapped usize, which must stay out of range.
    let wrapped = 0usize.wrapping_sub(1);
    assert_eq!(array.get(wrapped).unwrap_err().kind, ErrorKind::IndexOutOfRange);

    assert_eq!(array.first().unwrap(), Some(LazyValue::UInt(1)));
    assert_eq!(array.last().unwrap(), Some(LazyValue::UInt(3)));
}

#[rstest]
fn empty_containers() {
    let root = parse_lazy_str(r#"{"o":{},"a":[]}"#).unwrap();
    let object = root.as_object().unwrap();
    let inner = object.get("o").unwrap();
    assert!(inner.as_object().unwrap().is_empty().unwrap());
    let array = object.get("a").unwrap();
    assert!(array.as_array().unwrap().is_empty().unwrap());
    assert_eq!(array.as_array().unwrap().first().unwrap(), None);
}

#[rstest]
fn nested_views_share_the_document() {
    let root = parse_lazy_str(DOC).unwrap();
    let nested = root.as_object().unwrap().get("c").unwrap();
    let nested = nested.as_object().unwrap();
    assert_eq!(nested.get("d").unwrap().as_str(), Some("e"));
    assert!(nested.get("n").unwrap().is_null());

    root.close();
    assert!(nested.is_closed());
    assert_eq!(nested.get("d").unwrap_err().kind, ErrorKind::ViewClosed);
}

#[rstest]
fn scalar_access_is_fresh_each_time() {
    let root = parse_lazy_str(r#"{"s":"value"}"#).unwrap();
    let object = root.as_object().unwrap();
    let first = object.get("s").unwrap();
    let second = object.get("s").unwrap();
    assert_eq!(first, second);
    root.close();
    assert_eq!(first.as_str(), Some("value"));
}

#[rstest]
#[case("/a/1", Some(Value::UInt(20)))]
#[case("/c/d", Some(Value::from("e")))]
#[case("/a/3", None)]
#[case("/a/-1", None)]
#[case("/missing", None)]
#[case("/b/0", None)]
#[case("", Some(Value::from(json!({"b":1,"a":[10,20,30],"c":{"d":"e","n":null},"x":2}))))]
fn pointer_walks_lazily(#[case] pointer: &str, #[case] expected: Option<Value>) {
    let root = parse_lazy_str(DOC).unwrap();
    let found = root.pointer(pointer).unwrap();
    assert_eq!(found.map(|value| value.to_value().unwrap()), expected);
}

#[rstest]
fn to_value_materializes_subtree() {
    let options = ParseOptions::new().with_null(NullRepr::Missing);
    let root = parse_lazy_str_with_options(DOC, &options).unwrap();
    let nested = root.as_object().unwrap().get("c").unwrap();
    let value = nested.to_value().unwrap();
    assert_eq!(value["n"], Value::Missing);
    root.close();
    assert_eq!(value["d"].as_str(), Some("e"));
}

#[rstest]
fn scalar_roots_need_no_close() {
    let root = parse_lazy_str("  3.5 ").unwrap();
    assert_eq!(root, LazyValue::Float(3.5));
    root.close();
    assert!(!root.is_closed());
}

#[rstest]
fn scoped_returns_body_result_and_closes() {
    let mut leaked = None;
    let len = with_lazy_str(DOC, &ParseOptions::new(), |root| {
        leaked = Some(root.clone());
        root.as_object().unwrap().len()
    })
    .unwrap();
    assert_eq!(len, 5);
    let leaked = leaked.unwrap();
    assert!(leaked.is_closed());
    assert_eq!(
        leaked.as_object().unwrap().get("b").unwrap_err().kind,
        ErrorKind::ViewClosed
    );
}

#[rstest]
fn scoped_propagates_body_errors() {
    let mut leaked = None;
    let err = with_lazy_slice(DOC.as_bytes(), &ParseOptions::new(), |root| {
        leaked = Some(root.clone());
        root.as_object().unwrap().get("nope")
    })
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::KeyNotFound);
    assert!(leaked.unwrap().is_closed());
}

#[rstest]
fn scoped_reports_parse_errors() {
    let err = with_lazy_str("[1,", &ParseOptions::new(), |_| Ok::<_, Error>(())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
}

#[rstest]
fn scoped_panic_releases_its_own_document() {
    let mut leaked = None;
    let result = catch_unwind(AssertUnwindSafe(|| {
        let _: Result<(), Error> = with_lazy_str(DOC, &ParseOptions::new(), |inner| {
            leaked = Some(inner.clone());
            panic!("body failed");
        });
    }));
    assert!(result.is_err());
    assert!(leaked.unwrap().is_closed());
}

#[rstest]
fn lazy_from_path_and_reader() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, r#"{"k":[true]}"#).unwrap();

    let options = ParseOptions::new();
    let root = jsonview::open_lazy_path(&path, &options).unwrap();
    assert_eq!(root.pointer("/k/0").unwrap(), Some(LazyValue::Bool(true)));

    let count = jsonview::with_lazy_path(&path, &options, |root| root.as_object().unwrap().len())
        .unwrap();
    assert_eq!(count, 1);

    let root = jsonview::lazy_from_reader(std::io::Cursor::new(b"[null]"), &options).unwrap();
    assert!(root.as_array().unwrap().get(0).unwrap().is_null());
}

#[rstest]
fn scoped_reader_closes_after_body() {
    let mut leaked = None;
    let name = jsonview::with_lazy_reader(
        std::io::Cursor::new(br#"{"user":{"name":"Ada"}}"#),
        &ParseOptions::new(),
        |root| {
            leaked = Some(root.clone());
            root.pointer("/user/name")
        },
    )
    .unwrap();
    assert_eq!(name, Some(LazyValue::String("Ada".to_string())));
    assert!(leaked.unwrap().is_closed());

    let err = jsonview::with_lazy_reader(std::io::Cursor::new(b"{"), &ParseOptions::new(), |_| {
        Ok::<_, Error>(())
    })
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
}

#[rstest]
fn scoped_vec_supports_in_place() {
    let options = ParseOptions::new().with_in_place(true);
    let input = br#"["a\"b", "c\\d"]"#.to_vec();
    let items = jsonview::with_lazy_vec(input, &options, |root| {
        root.as_array()
            .unwrap()
            .iter()
            .map(|item| item.map(|item| item.as_str().unwrap_or_default().to_string()))
            .collect::<Result<Vec<_>, Error>>()
    })
    .unwrap();
    assert_eq!(items, vec!["a\"b", "c\\d"]);
}
