//! Sorting, pagination and projection of in-memory results

use crate::types::{SortDirection, SortSpec};
use crate::value::{Record, Value, NULL};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Compare two records along the sort keys, in key order.
///
/// The first key whose values differ decides; records tied on every key
/// compare equal.
pub fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    for (field, direction) in sort.keys() {
        let left = a.get(field).unwrap_or(&NULL);
        let right = b.get(field).unwrap_or(&NULL);

        let ordering = match direction {
            SortDirection::Ascending => left.sort_cmp(right),
            SortDirection::Descending => right.sort_cmp(left),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Stable sort; ties keep their input order
pub fn sort_records<R: Borrow<Record>>(records: &mut [R], sort: &SortSpec) {
    if sort.is_empty() {
        return;
    }

    records.sort_by(|a, b| compare_records(a.borrow(), b.borrow(), sort));
}

/// Apply offset then limit. No offset starts at zero, no limit takes the rest.
pub fn paginate<R>(records: Vec<R>, offset: Option<usize>, limit: Option<usize>) -> Vec<R> {
    if offset.is_none() && limit.is_none() {
        return records;
    }

    let iter = records.into_iter().skip(offset.unwrap_or(0));

    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

/// Copy the requested fields out of a record.
///
/// Requested fields missing from the source come back as `Null`; without a
/// field list the whole record is copied.
pub fn project(record: &Record, fields: Option<&[String]>) -> Record {
    match fields {
        None => record.clone(),
        Some(fields) => fields
            .iter()
            .map(|field| {
                let value = record.get(field).cloned().unwrap_or(Value::Null);
                (field.clone(), value)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn names(records: &[&Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_multi_key_sort_descending() {
        let a = record! { "id" => "A", "size" => 10, "name" => "x" };
        let b = record! { "id" => "B", "size" => 10, "name" => "y" };
        let c = record! { "id" => "C", "size" => 5, "name" => "z" };

        let mut records = vec![&a, &b, &c];
        sort_records(&mut records, &SortSpec::new().descending("size").descending("name"));

        assert_eq!(names(&records), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_multi_key_sort_mixed_directions() {
        let a = record! { "size" => 20, "name" => "Hawaii" };
        let b = record! { "size" => 30, "name" => "Vegetarian" };
        let c = record! { "size" => 20, "name" => "Calzone" };

        let mut records = vec![&a, &b, &c];
        sort_records(&mut records, &SortSpec::new().descending("size").ascending("name"));

        assert_eq!(names(&records), vec!["Vegetarian", "Calzone", "Hawaii"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let a = record! { "size" => 1, "name" => "first" };
        let b = record! { "size" => 1, "name" => "second" };

        let mut records = vec![&a, &b];
        sort_records(&mut records, &SortSpec::new().descending("size"));

        assert_eq!(names(&records), vec!["first", "second"]);
    }

    #[test]
    fn test_missing_sort_field_orders_first_ascending() {
        let a = record! { "name" => "with", "rank" => 1 };
        let b = record! { "name" => "without" };

        let mut records = vec![&a, &b];
        sort_records(&mut records, &SortSpec::new().ascending("rank"));

        assert_eq!(names(&records), vec!["without", "with"]);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<i32> = (1..=5).collect();

        assert_eq!(paginate(items.clone(), None, None), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(items.clone(), None, Some(2)), vec![1, 2]);
        assert_eq!(paginate(items.clone(), Some(2), None), vec![3, 4, 5]);
        assert_eq!(paginate(items.clone(), Some(1), Some(2)), vec![2, 3]);
        assert!(paginate(items, Some(10), Some(2)).is_empty());
    }

    #[test]
    fn test_project() {
        let record = record! { "id" => "1", "name" => "Margherita", "folded" => false };

        let fields = vec!["id".to_string(), "folded".to_string(), "price".to_string()];
        let projected = project(&record, Some(&fields));

        assert_eq!(projected.len(), 3);
        assert_eq!(projected["id"], Value::from("1"));
        assert_eq!(projected["folded"], Value::Bool(false));
        assert!(projected["price"].is_null());

        assert_eq!(project(&record, None), record);
    }
}
