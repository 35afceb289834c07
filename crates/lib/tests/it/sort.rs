//! Sort specification, dispatch and deferred-resort tests.

use shelf::{SortDirection, SortKind, SortSpec};

use crate::helpers::*;

#[test]
fn numeric_descending_is_strict_inverse_of_ascending() {
    let mut collection = product_collection();
    for (key, price) in [("a", 30), ("b", 10), ("c", 50), ("d", 20)] {
        collection
            .insert(key, product(price, &format!("p{price}")))
            .unwrap();
    }

    collection
        .sort_by("price", SortDirection::Ascending, SortKind::Numeric)
        .unwrap();
    let ascending = page_names(&mut collection);
    assert_eq!(ascending, vec!["p10", "p20", "p30", "p50"]);

    collection
        .sort_by("price", SortDirection::Descending, SortKind::Numeric)
        .unwrap();
    let mut descending = page_names(&mut collection);
    descending.reverse();
    assert_eq!(descending, ascending);
}

#[test]
fn lexicographic_directions() {
    let mut collection = product_collection();
    collection.insert("k1", product(0, "b")).unwrap();
    collection.insert("k2", product(0, "a")).unwrap();

    collection
        .sort_by("name", SortDirection::Descending, SortKind::Lexicographic)
        .unwrap();
    assert_eq!(page_names(&mut collection), vec!["b", "a"]);

    collection
        .sort_by("name", SortDirection::Ascending, SortKind::Lexicographic)
        .unwrap();
    assert_eq!(page_names(&mut collection), vec!["a", "b"]);
}

#[test]
fn sorting_is_idempotent() {
    let mut collection = seeded(6);
    collection
        .sort_by("price", SortDirection::Descending, SortKind::Numeric)
        .unwrap();
    let once = page_names(&mut collection);

    collection
        .sort_by("price", SortDirection::Descending, SortKind::Numeric)
        .unwrap();
    let twice = page_names(&mut collection);
    assert_eq!(once, twice);
}

#[test]
fn equal_values_keep_insertion_order() {
    let mut collection = product_collection();
    collection.insert("first", product(1, "first")).unwrap();
    collection.insert("second", product(1, "second")).unwrap();
    collection.insert("third", product(1, "third")).unwrap();

    collection
        .sort_by("price", SortDirection::Ascending, SortKind::Numeric)
        .unwrap();
    assert_eq!(
        page_names(&mut collection),
        vec!["first", "second", "third"]
    );
}

#[test]
fn sorting_by_unknown_member_is_an_invalid_argument() {
    let mut collection = seeded(2);
    let err = collection
        .sort_by("rating", SortDirection::Ascending, SortKind::Numeric)
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.module(), "sort");
}

#[test]
fn assigning_an_unknown_spec_is_an_invalid_argument() {
    let mut collection = seeded(2);
    let err = collection
        .set_sort_spec(Some(SortSpec::new(
            "rating",
            SortDirection::Ascending,
            SortKind::Numeric,
        )))
        .unwrap_err();
    assert!(err.is_invalid_argument());

    // None is always a valid assignment
    collection.set_sort_spec(None).unwrap();
}

#[test]
fn named_comparator_must_be_registered() {
    let mut collection = seeded(2);
    let err = collection
        .sort_by(
            "price",
            SortDirection::Ascending,
            SortKind::Named("popularity".into()),
        )
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn registered_named_comparator_is_dispatched() {
    let mut collection = product_collection();
    collection.insert("a", product(12, "twelve")).unwrap();
    collection.insert("b", product(21, "twenty-one")).unwrap();
    collection.insert("c", product(3, "three")).unwrap();

    // sort by the last digit of the price
    let spec = SortSpec::new(
        "price",
        SortDirection::Ascending,
        SortKind::Named("last_digit".into()),
    );
    collection.register_comparator(spec.clone(), |a, b| {
        let digit = |record: &shelf::sort::OrderRecord| {
            record
                .get("price")
                .and_then(|v| v.as_i64())
                .map(|p| p % 10)
                .unwrap_or(0)
        };
        digit(a).cmp(&digit(b))
    });

    collection
        .sort_by("price", spec.direction, spec.kind.clone())
        .unwrap();
    assert_eq!(
        page_names(&mut collection),
        vec!["twenty-one", "twelve", "three"]
    );
}

#[test]
fn exact_spec_registration_overrides_builtin() {
    let mut collection = product_collection();
    collection.insert("a", product(1, "one")).unwrap();
    collection.insert("b", product(2, "two")).unwrap();

    let spec = SortSpec::new("price", SortDirection::Ascending, SortKind::Numeric);
    // registered comparator wins over the built-in numeric one
    collection.register_comparator(spec, |a, b| {
        let price = |record: &shelf::sort::OrderRecord| {
            record.get("price").and_then(|v| v.as_i64()).unwrap_or(0)
        };
        price(b).cmp(&price(a))
    });
    collection
        .sort_by("price", SortDirection::Ascending, SortKind::Numeric)
        .unwrap();
    assert_eq!(page_names(&mut collection), vec!["two", "one"]);
}

#[test]
fn stale_spec_resorts_lazily_on_next_access() {
    let mut collection = seeded(3);
    collection
        .sort_by("price", SortDirection::Ascending, SortKind::Numeric)
        .unwrap();
    assert_eq!(
        page_names(&mut collection),
        vec!["product 0", "product 1", "product 2"]
    );

    // a plain assignment does not rebuild; re-iterating does
    collection
        .set_sort_spec(Some(SortSpec::new(
            "price",
            SortDirection::Descending,
            SortKind::Numeric,
        )))
        .unwrap();
    assert_eq!(
        page_names(&mut collection),
        vec!["product 2", "product 1", "product 0"]
    );
}

#[test]
fn incremental_collection_defers_sorting_until_fully_loaded() {
    let mut collection = product_collection();
    collection.set_count_override(Some(5));
    for i in 0..3 {
        collection
            .insert(format!("item{i}"), product(10 - i, &format!("product {i}")))
            .unwrap();
    }

    // not fully loaded: the resort is deferred, the stale order dropped
    collection
        .sort_by("price", SortDirection::Ascending, SortKind::Numeric)
        .unwrap();
    assert_eq!(page_names(&mut collection), Vec::<String>::new());

    for i in 3..5 {
        collection
            .insert(format!("item{i}"), product(10 - i, &format!("product {i}")))
            .unwrap();
    }

    // fully loaded: next access applies the pending spec over all items
    assert_eq!(
        page_names(&mut collection),
        vec![
            "product 4",
            "product 3",
            "product 2",
            "product 1",
            "product 0"
        ]
    );
}
