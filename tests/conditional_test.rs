//! Tests for conditionally applied constraints.

use waymark::{constraints, reflect_record, rules, validate, when, when_fn, Fields};

struct Listing {
    published: bool,
    title: String,
    price: f64,
}

reflect_record!(Listing { published, title, price });

fn listing(published: bool) -> Listing {
    Listing {
        published,
        title: String::new(),
        price: -1.0,
    }
}

#[test]
fn test_when_applies_constraints_fixed_at_construction() {
    let strict = true;
    let constraints = Fields::new()
        .field("title", when(strict, constraints![rules::required()]))
        .field("price", when(!strict, constraints![rules::min(0.0)]));

    let violations = validate(&listing(false), &constraints).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, ".title");
}

#[test]
fn test_when_fn_gates_on_the_validated_value() {
    // Drafts may be incomplete; published listings may not.
    let constraints = when_fn(
        |ctx| {
            ctx.node()
                .field("published")
                .and_then(|p| p.as_bool())
                .unwrap_or(false)
        },
        constraints![Fields::new()
            .field("title", rules::required())
            .field("price", rules::min(0.0))],
    );

    assert!(validate(&listing(false), &constraints).unwrap().is_empty());

    let violations = validate(&listing(true), &constraints).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec![".price", ".title"]);
}

#[test]
fn test_when_fn_sees_the_full_path() {
    let constraints = Fields::new().field(
        "title",
        when_fn(
            |ctx| ctx.path() == ".title" && ctx.depth() == 2,
            constraints![rules::required()],
        ),
    );

    assert_eq!(validate(&listing(true), &constraints).unwrap().len(), 1);
}
