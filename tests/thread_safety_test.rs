//! Tests for sharing constraint trees across threads and parallel descent.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use waymark::{
    constraints, from_fn, reflect_record, rules, validate, Constraint, Elements, Fields,
};

struct User {
    name: String,
    age: u32,
}

reflect_record!(User { name, age });

fn user_constraints() -> Fields {
    Fields::new()
        .field("name", constraints![rules::required(), rules::max_length(12)])
        .field("age", rules::max(150.0))
}

#[test]
fn test_concurrent_validation_with_shared_constraints() {
    let constraints: Arc<dyn Constraint> = Arc::new(user_constraints());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let constraints = Arc::clone(&constraints);
            thread::spawn(move || {
                let user = User {
                    name: if i % 2 == 0 { format!("User{}", i) } else { String::new() },
                    age: 20 + i,
                };
                validate(&user, &constraints).unwrap().len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
}

#[test]
fn test_parallel_elements_visit_every_item() {
    let visited = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let visited = Arc::clone(&visited);
        from_fn(move |ctx| {
            visited.lock().push(ctx.path());
            Ok(Vec::new())
        })
    };

    let users: Vec<User> = (0..100)
        .map(|i| User {
            name: format!("u{}", i),
            age: i,
        })
        .collect();

    validate(&users, &Elements::new().with(recorder).parallel()).unwrap();

    let mut visited = visited.lock().clone();
    visited.sort();
    let mut expected: Vec<String> = (0..100).map(|i| format!(".[{}]", i)).collect();
    expected.sort();
    assert_eq!(visited, expected);
}

#[test]
fn test_parallel_and_sequential_results_match() {
    let users: Vec<User> = (0..200u32)
        .map(|i| User {
            name: if i % 7 == 0 { String::new() } else { format!("user-{}", i) },
            age: if i % 11 == 0 { 200 } else { i % 90 },
        })
        .collect();

    let sequential = validate(&users, &Elements::new().with(user_constraints())).unwrap();
    let parallel =
        validate(&users, &Elements::new().with(user_constraints()).parallel()).unwrap();

    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
}
