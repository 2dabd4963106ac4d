use crate::value::{Value, ID};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Comparison operators supported by query expressions
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    /// Field value is one of the literal list's items
    In,
    /// Field value is none of the literal list's items
    NotIn,
    /// String field contains the literal ("%LIKE%")
    Contains,
    /// String field starts with the literal ("LIKE%")
    StartsWith,
    /// String field ends with the literal ("%LIKE")
    EndsWith,
}

impl Operator {
    /// Whether the operator only applies to string fields
    pub fn is_string_match(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equals => write!(f, "EQUALS"),
            Operator::NotEquals => write!(f, "NOT_EQUALS"),
            Operator::LessThan => write!(f, "LESS_THAN"),
            Operator::LessThanOrEquals => write!(f, "LESS_THAN_OR_EQUALS"),
            Operator::GreaterThan => write!(f, "GREATER_THAN"),
            Operator::GreaterThanOrEquals => write!(f, "GREATER_THAN_OR_EQUALS"),
            Operator::In => write!(f, "IN"),
            Operator::NotIn => write!(f, "NOT_IN"),
            Operator::Contains => write!(f, "CONTAINS"),
            Operator::StartsWith => write!(f, "STARTS_WITH"),
            Operator::EndsWith => write!(f, "ENDS_WITH"),
        }
    }
}

/// Operator/literal pairs applied to a single field, combined with AND
pub type Expression = BTreeMap<Operator, Value>;

/// Field name to expression mapping; multiple fields are an implicit AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpressionStatement {
    pub fields: BTreeMap<String, Expression>,
}

impl ExpressionStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operator/literal pair to a field's expression
    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(operator, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Logical combinator over nested statements, in its wire form
#[derive(Deserialize)]
enum LogicalStatement {
    #[serde(rename = "AND")]
    And(Vec<QueryStatement>),
    #[serde(rename = "OR")]
    Or(Vec<QueryStatement>),
}

#[derive(Serialize)]
enum LogicalStatementRef<'a> {
    #[serde(rename = "AND")]
    And(&'a [QueryStatement]),
    #[serde(rename = "OR")]
    Or(&'a [QueryStatement]),
}

/// A composable filter over records
///
/// Serialized as a mapping: `{"AND": [...]}`, `{"OR": [...]}` or
/// `{"<field>": {"<OPERATOR>": <value>, ...}, ...}`. The empty mapping
/// matches every record.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatement {
    Expression(ExpressionStatement),
    And(Vec<QueryStatement>),
    Or(Vec<QueryStatement>),
}

impl QueryStatement {
    /// The empty statement, matching every record
    pub fn all() -> Self {
        QueryStatement::Expression(ExpressionStatement::new())
    }

    /// Single field, single operator statement
    pub fn field(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        QueryStatement::Expression(ExpressionStatement::new().with(field, operator, value))
    }

    /// Match the record with the given identity
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::field(ID, Operator::Equals, Value::String(id.into()))
    }

    pub fn and(statements: Vec<QueryStatement>) -> Self {
        QueryStatement::And(statements)
    }

    pub fn or(statements: Vec<QueryStatement>) -> Self {
        QueryStatement::Or(statements)
    }

    /// Whether this is the empty, match-everything statement
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryStatement::Expression(expression) if expression.is_empty())
    }
}

impl Default for QueryStatement {
    fn default() -> Self {
        Self::all()
    }
}

impl From<ExpressionStatement> for QueryStatement {
    fn from(statement: ExpressionStatement) -> Self {
        QueryStatement::Expression(statement)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryStatementRepr {
    Logical(LogicalStatement),
    Expression(ExpressionStatement),
}

impl Serialize for QueryStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryStatement::Expression(expression) => expression.serialize(serializer),
            QueryStatement::And(statements) => {
                LogicalStatementRef::And(statements).serialize(serializer)
            }
            QueryStatement::Or(statements) => {
                LogicalStatementRef::Or(statements).serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for QueryStatement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match QueryStatementRepr::deserialize(deserializer)? {
            QueryStatementRepr::Logical(LogicalStatement::And(statements)) => {
                QueryStatement::And(statements)
            }
            QueryStatementRepr::Logical(LogicalStatement::Or(statements)) => {
                QueryStatement::Or(statements)
            }
            QueryStatementRepr::Expression(expression) => QueryStatement::Expression(expression),
        })
    }
}

/// Sort direction for a single key
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASCENDING"),
            SortDirection::Descending => write!(f, "DESCENDING"),
        }
    }
}

/// Ordered sort keys; the first key is primary, later keys break ties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<(String, SortDirection)>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tie-break key. A key that is already present keeps its
    /// position and takes the new direction.
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let field = field.into();
        match self.keys.iter_mut().find(|(key, _)| *key == field) {
            Some(entry) => entry.1 = direction,
            None => self.keys.push((field, direction)),
        }
        self
    }

    pub fn ascending(self, field: impl Into<String>) -> Self {
        self.then(field, SortDirection::Ascending)
    }

    pub fn descending(self, field: impl Into<String>) -> Self {
        self.then(field, SortDirection::Descending)
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.keys.iter().map(|(field, direction)| (field.as_str(), *direction))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (field, direction) in &self.keys {
            map.serialize_entry(field, direction)?;
        }
        map.end()
    }
}

struct SortSpecVisitor;

impl<'de> Visitor<'de> for SortSpecVisitor {
    type Value = SortSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a mapping of field names to sort directions")
    }

    // Entries are read in document order so the tie-break chain survives.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SortSpec, A::Error> {
        let mut spec = SortSpec::new();
        while let Some((field, direction)) = access.next_entry::<String, SortDirection>()? {
            spec = spec.then(field, direction);
        }
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SortSpecVisitor)
    }
}

/// Projection, sort and pagination applied to a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Fields to return; all fields when absent
    pub fields: Option<Vec<String>>,
    /// Sort order; backend order when absent
    pub sort: Option<SortSpec>,
    /// Maximum records to return
    pub limit: Option<usize>,
    /// Number of records to skip
    pub offset: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Options for reading a single record: same projection and sort, first match only
    pub fn single(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            sort: self.sort.clone(),
            limit: Some(1),
            offset: Some(0),
        }
    }
}
