use std::sync::{Arc, Barrier};
use std::thread;

use rstest::rstest;
use jsonview::{parse_lazy_str, parse_lazy_str_with_options, Allocator, ErrorKind, LazyValue, ParseOptions};

fn large_array(len: usize) -> String {
    let items: Vec<String> = (0..len).map(|i| format!("{{\"id\":{i},\"tag\":\"t{i}\"}}")).collect();
    format!("[{}]", items.join(","))
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn close_n_times_equals_close_once(#[case] times: usize) {
    let root = parse_lazy_str(r#"{"a":[1]}"#).unwrap();
    let object = root.as_object().unwrap().clone();
    for _ in 0..times {
        root.close();
    }
    assert!(object.is_closed());
    for _ in 0..3 {
        assert_eq!(object.get("a").unwrap_err().kind, ErrorKind::ViewClosed);
        assert_eq!(object.len().unwrap_err().kind, ErrorKind::ViewClosed);
        assert_eq!(object.to_value().unwrap_err().kind, ErrorKind::ViewClosed);
    }
}

#[rstest]
fn every_accessor_fails_after_close() {
    let root = parse_lazy_str(r#"{"a":[1,2],"b":{}}"#).unwrap();
    let object = root.as_object().unwrap().clone();
    let array = object.get("a").unwrap().as_array().unwrap().clone();
    object.close();

    let errors = [
        object.contains_key("a").unwrap_err(),
        object.keys().unwrap_err(),
        object.is_empty().unwrap_err(),
        array.get(0).unwrap_err(),
        array.first().unwrap_err(),
        array.last().unwrap_err(),
        array.len().unwrap_err(),
        root.pointer("/a/0").unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind, ErrorKind::ViewClosed);
    }
    assert_eq!(format!("{array:?}"), "ArrayView(closed)");
}

#[rstest]
fn iteration_stops_after_close() {
    let root = parse_lazy_str("[1,2,3]").unwrap();
    let array = root.as_array().unwrap();
    let mut items = array.iter();
    assert_eq!(items.next().unwrap().unwrap(), LazyValue::UInt(1));
    root.close();
    assert_eq!(items.next().unwrap().unwrap_err().kind, ErrorKind::ViewClosed);
    assert!(items.next().is_none());
}

#[rstest]
fn dropping_last_view_releases_to_allocator() {
    let allocator = Allocator::new();
    let options = ParseOptions::new().with_allocator(allocator.clone());
    let root = parse_lazy_str_with_options(r#"{"k":[1,2]}"#, &options).unwrap();
    let nested = root.as_object().unwrap().get("k").unwrap();
    drop(root);
    assert_eq!(allocator.retained(), 0);
    drop(nested);
    assert_eq!(allocator.retained(), 1);
}

#[rstest]
fn allocator_is_released_exactly_once() {
    let allocator = Allocator::with_limit(8);
    let options = ParseOptions::new().with_allocator(allocator.clone());
    let root = parse_lazy_str_with_options("[[1],[2]]", &options).unwrap();
    let clones: Vec<_> = (0..4).map(|_| root.clone()).collect();
    for clone in &clones {
        clone.close();
    }
    root.close();
    drop(clones);
    drop(root);
    assert_eq!(allocator.retained(), 1);
}

#[rstest]
fn allocator_buffers_are_reused_across_documents() {
    let allocator = Allocator::new();
    let options = ParseOptions::new().with_allocator(allocator.clone());
    for _ in 0..10 {
        let value = jsonview::parse_str_with_options(&large_array(50), &options).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 50);
        assert_eq!(allocator.retained(), 1);
    }
}

#[rstest]
fn concurrent_readers_see_the_same_values() {
    let root = parse_lazy_str(&large_array(500)).unwrap();
    let array = root.as_array().unwrap().clone();
    let sums: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let array = array.clone();
                scope.spawn(move || {
                    let mut sum = 0;
                    for item in &array {
                        let item = item.unwrap();
                        sum += item.as_object().unwrap().get("id").unwrap().as_u64().unwrap();
                    }
                    sum
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    let expected: u64 = (0..500).sum();
    assert!(sums.iter().all(|sum| *sum == expected));
    root.close();
}

#[rstest]
fn close_racing_reads_never_reads_freed_memory() {
    let root = parse_lazy_str(&large_array(2000)).unwrap();
    let array = root.as_array().unwrap().clone();
    let barrier = Arc::new(Barrier::new(5));

    thread::scope(|scope| {
        for _ in 0..4 {
            let array = array.clone();
            let barrier = Arc::clone(&barrier);
            scope.spawn(move || {
                barrier.wait();
                for index in 0..2000 {
                    match array.get(index) {
                        Ok(item) => {
                            let id = item.as_object().unwrap().get("id");
                            match id {
                                Ok(id) => assert_eq!(id.as_u64(), Some(index as u64)),
                                Err(err) => assert_eq!(err.kind, ErrorKind::ViewClosed),
                            }
                        }
                        Err(err) => {
                            assert_eq!(err.kind, ErrorKind::ViewClosed);
                            break;
                        }
                    }
                }
            });
        }
        let closer = array.clone();
        scope.spawn(move || {
            barrier.wait();
            closer.close();
        });
    });

    assert!(root.is_closed());
}
