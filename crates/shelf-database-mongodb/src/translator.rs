//! Translation of query statements into MongoDB documents
//!
//! Everything here is pure: statements, sort keys, projections and records
//! go in, `bson` documents come out (and back for results). The canonical
//! identity field `id` maps to `_id` in both directions.

use crate::error::TranslationError;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Bson, Document};
use shelf_query::predicate::validate_operand;
use shelf_query::{
    Expression, ExpressionStatement, Operator, QueryStatement, Record, SortDirection, SortSpec,
    Value, ID,
};

/// MongoDB's reserved identity field
pub const MONGO_ID: &str = "_id";

/// Storage name of a field
pub fn field_name(field: &str) -> &str {
    if field == ID {
        MONGO_ID
    } else {
        field
    }
}

/// Canonical name of a stored field
pub fn record_field_name(field: &str) -> &str {
    if field == MONGO_ID {
        ID
    } else {
        field
    }
}

pub fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => Bson::Int64(*i),
        Value::Float(x) => Bson::Double(*x),
        Value::String(s) => Bson::String(s.clone()),
        Value::Date(d) => Bson::DateTime(mongodb::bson::DateTime::from_millis(d.timestamp_millis())),
        Value::List(items) => Bson::Array(items.iter().map(to_bson).collect()),
    }
}

pub fn from_bson(bson: Bson) -> Value {
    match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Int(i64::from(i)),
        Bson::Int64(i) => Value::Int(i),
        Bson::Double(x) => Value::Float(x),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
            .map(Value::Date)
            .unwrap_or(Value::Null),
        Bson::Array(items) => Value::List(items.into_iter().map(from_bson).collect()),
        other => Value::String(other.to_string()),
    }
}

/// Translate a statement into a filter document
pub fn translate_query(statement: &QueryStatement) -> Result<Document, TranslationError> {
    match statement {
        QueryStatement::Expression(expression) => translate_expression_statement(expression),
        // $and/$or reject empty arrays
        QueryStatement::And(statements) if statements.is_empty() => Ok(Document::new()),
        QueryStatement::Or(statements) if statements.is_empty() => {
            Ok(doc! { MONGO_ID: { "$in": [] } })
        }
        QueryStatement::And(statements) => Ok(doc! { "$and": translate_all(statements)? }),
        QueryStatement::Or(statements) => Ok(doc! { "$or": translate_all(statements)? }),
    }
}

fn translate_all(statements: &[QueryStatement]) -> Result<Vec<Document>, TranslationError> {
    statements.iter().map(translate_query).collect()
}

fn translate_expression_statement(
    statement: &ExpressionStatement,
) -> Result<Document, TranslationError> {
    let mut clauses = Vec::new();
    let mut split = false;

    for (field, expression) in &statement.fields {
        let field_clauses = translate_expression(field, expression)?;
        split |= field_clauses.len() > 1;
        clauses.extend(field_clauses);
    }

    // A field with several string-match operators needs one clause per
    // pattern; only then the clauses are combined with $and.
    if split {
        Ok(doc! { "$and": clauses })
    } else {
        Ok(clauses.into_iter().flatten().collect())
    }
}

/// Clauses for one field. An empty expression constrains nothing and yields
/// no clause, since `{ field: {} }` would match only an empty document.
fn translate_expression(
    field: &str,
    expression: &Expression,
) -> Result<Vec<Document>, TranslationError> {
    let key = field_name(field);
    let mut operators = Document::new();
    let mut patterns = Vec::new();

    for (operator, literal) in expression {
        validate_operand(field, *operator, literal)?;

        match operator {
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                patterns.push(pattern(*operator, literal.as_str().unwrap_or_default()));
            }
            _ => {
                operators.insert(operator_keyword(*operator), to_bson(literal));
            }
        }
    }

    if patterns.len() <= 1 {
        if let Some(pattern) = patterns.pop() {
            operators.insert("$regex", pattern);
        }
        if operators.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![doc! { key: operators }]);
    }

    let mut clauses = Vec::new();
    if !operators.is_empty() {
        clauses.push(doc! { key: operators });
    }
    for pattern in patterns {
        clauses.push(doc! { key: { "$regex": pattern } });
    }

    Ok(clauses)
}

fn operator_keyword(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "$eq",
        Operator::NotEquals => "$ne",
        Operator::LessThan => "$lt",
        Operator::LessThanOrEquals => "$lte",
        Operator::GreaterThan => "$gt",
        Operator::GreaterThanOrEquals => "$gte",
        Operator::In => "$in",
        Operator::NotIn => "$nin",
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => "$regex",
    }
}

/// Regex for a string-match operator; the literal always matches verbatim
fn pattern(operator: Operator, literal: &str) -> String {
    let escaped = regex::escape(literal);

    match operator {
        Operator::StartsWith => format!("^{}", escaped),
        Operator::EndsWith => format!("{}$", escaped),
        _ => escaped,
    }
}

/// Sort document with keys in tie-break order
pub fn translate_sort(sort: &SortSpec) -> Document {
    sort.keys()
        .map(|(field, direction)| {
            let order = match direction {
                SortDirection::Ascending => 1,
                SortDirection::Descending => -1,
            };
            (field_name(field).to_string(), Bson::Int32(order))
        })
        .collect()
}

/// Projection document for the requested fields
pub fn translate_projection(fields: &[String]) -> Document {
    let mut projection: Document = fields
        .iter()
        .map(|field| (field_name(field).to_string(), Bson::Int32(1)))
        .collect();

    if !projection.contains_key(MONGO_ID) {
        projection.insert(MONGO_ID, 0);
    }

    projection
}

/// Record to storage document
pub fn translate_record(record: Record) -> Document {
    record
        .into_iter()
        .map(|(field, value)| (field_name(&field).to_string(), to_bson(&value)))
        .collect()
}

/// Storage document to record.
///
/// With a field list the record holds exactly those fields, missing ones as
/// `Null`; without, every stored field is returned.
pub fn translate_document(document: Document, fields: Option<&[String]>) -> Record {
    match fields {
        None => document
            .into_iter()
            .map(|(field, value)| (record_field_name(&field).to_string(), from_bson(value)))
            .collect(),
        Some(fields) => {
            let mut document = document;
            fields
                .iter()
                .map(|field| {
                    let value = document
                        .remove(field_name(field))
                        .map(from_bson)
                        .unwrap_or(Value::Null);
                    (field.clone(), value)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use shelf_query::{record, QueryError};

    #[test]
    fn test_empty_statement() {
        assert_eq!(translate_query(&QueryStatement::all()).unwrap(), doc! {});
    }

    #[test]
    fn test_comparison_operators() {
        let statement: QueryStatement = ExpressionStatement::new()
            .with("size", Operator::GreaterThanOrEquals, 15)
            .with("size", Operator::LessThan, 30)
            .with("name", Operator::NotEquals, "Hawaii")
            .into();

        let filter = translate_query(&statement).unwrap();
        assert_eq!(
            filter,
            doc! {
                "name": { "$ne": "Hawaii" },
                "size": { "$lt": 30_i64, "$gte": 15_i64 },
            }
        );
    }

    #[test]
    fn test_membership_operators() {
        let statement = QueryStatement::field("size", Operator::In, vec![15, 20]);
        assert_eq!(
            translate_query(&statement).unwrap(),
            doc! { "size": { "$in": [15_i64, 20_i64] } }
        );

        let statement = QueryStatement::field("name", Operator::NotIn, vec!["Hawaii"]);
        assert_eq!(
            translate_query(&statement).unwrap(),
            doc! { "name": { "$nin": ["Hawaii"] } }
        );
    }

    #[test]
    fn test_string_match_operators() {
        let filter = |op| translate_query(&QueryStatement::field("name", op, "Marg")).unwrap();

        assert_eq!(filter(Operator::StartsWith), doc! { "name": { "$regex": "^Marg" } });
        assert_eq!(filter(Operator::EndsWith), doc! { "name": { "$regex": "Marg$" } });
        assert_eq!(filter(Operator::Contains), doc! { "name": { "$regex": "Marg" } });
    }

    #[test]
    fn test_string_match_literal_is_escaped() {
        let statement = QueryStatement::field("file", Operator::EndsWith, "a.b(1)");
        assert_eq!(
            translate_query(&statement).unwrap(),
            doc! { "file": { "$regex": r"a\.b\(1\)$" } }
        );
    }

    #[test]
    fn test_several_patterns_on_one_field() {
        let statement: QueryStatement = ExpressionStatement::new()
            .with("name", Operator::StartsWith, "Pep")
            .with("name", Operator::EndsWith, "oni")
            .with("size", Operator::Equals, 18)
            .into();

        assert_eq!(
            translate_query(&statement).unwrap(),
            doc! {
                "$and": [
                    { "name": { "$regex": "^Pep" } },
                    { "name": { "$regex": "oni$" } },
                    { "size": { "$eq": 18_i64 } },
                ]
            }
        );
    }

    #[test]
    fn test_empty_field_expression_constrains_nothing() {
        let mut statement = ExpressionStatement::new().with("size", Operator::Equals, 18);
        statement.fields.insert("name".to_string(), Expression::new());

        assert_eq!(
            translate_query(&statement.into()).unwrap(),
            doc! { "size": { "$eq": 18_i64 } }
        );

        let mut only_empty = ExpressionStatement::new();
        only_empty.fields.insert("name".to_string(), Expression::new());
        assert_eq!(translate_query(&only_empty.into()).unwrap(), doc! {});
    }

    #[test]
    fn test_identity_is_remapped() {
        assert_eq!(
            translate_query(&QueryStatement::by_id("7")).unwrap(),
            doc! { "_id": { "$eq": "7" } }
        );
    }

    #[test]
    fn test_logical_statements() {
        let statement = QueryStatement::and(vec![
            QueryStatement::field("folded", Operator::Equals, true),
            QueryStatement::or(vec![
                QueryStatement::field("size", Operator::LessThan, 25),
                QueryStatement::field("price", Operator::GreaterThan, 12.5),
            ]),
        ]);

        assert_eq!(
            translate_query(&statement).unwrap(),
            doc! {
                "$and": [
                    { "folded": { "$eq": true } },
                    { "$or": [
                        { "size": { "$lt": 25_i64 } },
                        { "price": { "$gt": 12.5 } },
                    ] },
                ]
            }
        );
    }

    #[test]
    fn test_empty_logical_statements() {
        assert_eq!(translate_query(&QueryStatement::and(vec![])).unwrap(), doc! {});
        assert_eq!(
            translate_query(&QueryStatement::or(vec![])).unwrap(),
            doc! { "_id": { "$in": [] } }
        );
    }

    #[test]
    fn test_invalid_operand() {
        let statement = QueryStatement::or(vec![QueryStatement::field(
            "name",
            Operator::Contains,
            3,
        )]);

        let err = translate_query(&statement).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::InvalidOperand(QueryError::InvalidOperand { expected: "string", .. })
        ));
    }

    #[test]
    fn test_sort_keeps_key_order() {
        let sort = SortSpec::new().descending("size").ascending("id").descending("name");
        let document = translate_sort(&sort);

        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["size", "_id", "name"]);
        assert_eq!(document, doc! { "size": -1, "_id": 1, "name": -1 });
    }

    #[test]
    fn test_projection() {
        let fields = vec!["id".to_string(), "folded".to_string()];
        assert_eq!(translate_projection(&fields), doc! { "_id": 1, "folded": 1 });

        let fields = vec!["name".to_string()];
        assert_eq!(translate_projection(&fields), doc! { "name": 1, "_id": 0 });
    }

    #[test]
    fn test_record_round_trip_through_document() {
        let record = record! { "id" => "7", "name" => "Funghi", "size" => 25, "price" => 9.5 };

        let document = translate_record(record.clone());
        assert_eq!(document.get_str("_id").unwrap(), "7");
        assert!(!document.contains_key("id"));

        assert_eq!(translate_document(document, None), record);
    }

    #[test]
    fn test_document_shaping() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "name": "Margherita", "size": 15_i32 };

        let record = translate_document(document.clone(), None);
        assert_eq!(record["id"], Value::String(oid.to_hex()));
        assert_eq!(record["size"], Value::Int(15));

        let fields = vec!["id".to_string(), "folded".to_string()];
        let record = translate_document(document, Some(&fields));
        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], Value::String(oid.to_hex()));
        assert!(record["folded"].is_null());
    }

    #[test]
    fn test_dates_keep_millisecond_precision() {
        let date = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let value = Value::Date(date);

        assert_eq!(from_bson(to_bson(&value)), value);
    }
}
