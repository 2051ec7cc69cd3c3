//! Relational query description consumed by the SOQL compiler.
//!
//! Queries are expressed against a single root object; parent objects are
//! reached through chains of lookup fields rather than SQL joins, which is
//! the only join shape the remote query language supports.

use crate::domain::types::ObjectName;
use crate::domain::value::SoqlValue;

/// Reference to a column, optionally through a chain of lookup fields on
/// the root object (`path = ["AccountId"], name = "Name"` reads the name of
/// the related account).
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnRef {
    pub path: Vec<String>,
    pub name: String,
}

impl ColumnRef {
    /// A field of the root object itself.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            name: name.into(),
        }
    }

    /// A field reached through the given lookup fields.
    pub fn via<I, S>(path: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }
}

/// Aggregate functions available in the remote query language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::CountDistinct => "COUNT_DISTINCT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        }
    }
}

/// One entry of the select list.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectItem {
    Column(ColumnRef),
    Aggregate {
        func: AggregateFunc,
        /// `None` is only meaningful for `Count`, which then renders as the
        /// bare row-count form `COUNT()`.
        column: Option<ColumnRef>,
        alias: Option<String>,
    },
}

impl SelectItem {
    /// Bare `COUNT()`; the row count is reported through the payload's
    /// total size instead of a record column.
    pub fn count() -> Self {
        SelectItem::Aggregate {
            func: AggregateFunc::Count,
            column: None,
            alias: None,
        }
    }

    pub fn aggregate(func: AggregateFunc, column: ColumnRef, alias: Option<&str>) -> Self {
        SelectItem::Aggregate {
            func,
            column: Some(column),
            alias: alias.map(str::to_string),
        }
    }
}

/// Comparison operators supported by the remote query language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Like,
    In,
    NotIn,
    /// Multi-select picklist membership.
    Includes,
    Excludes,
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum CompareValue {
    One(SoqlValue),
    Many(Vec<SoqlValue>),
}

/// Left-hand side of a comparison: a column, or an aggregate expression
/// (the only shape HAVING accepts).
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Column(ColumnRef),
    Aggregate {
        func: AggregateFunc,
        column: Option<ColumnRef>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub operand: Operand,
    pub op: CompareOp,
    pub value: CompareValue,
}

/// Condition tree over a query. `MatchesAll` and `MatchesNone` are the
/// identity nodes the compiler short-circuits on: a filter known to match
/// nothing compiles the whole query away.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Cmp(Comparison),
    MatchesAll,
    MatchesNone,
}

impl Filter {
    fn cmp(column: ColumnRef, op: CompareOp, value: CompareValue) -> Self {
        Filter::Cmp(Comparison {
            operand: Operand::Column(column),
            op,
            value,
        })
    }

    /// Compare an aggregate expression, for HAVING clauses.
    pub fn aggregate_cmp(
        func: AggregateFunc,
        column: Option<ColumnRef>,
        op: CompareOp,
        value: impl Into<SoqlValue>,
    ) -> Self {
        Filter::Cmp(Comparison {
            operand: Operand::Aggregate { func, column },
            op,
            value: CompareValue::One(value.into()),
        })
    }

    pub fn eq(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::Eq, CompareValue::One(value.into()))
    }

    pub fn ne(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::NotEq, CompareValue::One(value.into()))
    }

    pub fn gt(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::Gt, CompareValue::One(value.into()))
    }

    pub fn gte(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::GtEq, CompareValue::One(value.into()))
    }

    pub fn lt(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::Lt, CompareValue::One(value.into()))
    }

    pub fn lte(column: ColumnRef, value: impl Into<SoqlValue>) -> Self {
        Self::cmp(column, CompareOp::LtEq, CompareValue::One(value.into()))
    }

    pub fn like(column: ColumnRef, pattern: impl Into<String>) -> Self {
        Self::cmp(
            column,
            CompareOp::Like,
            CompareValue::One(SoqlValue::String(pattern.into())),
        )
    }

    pub fn is_null(column: ColumnRef) -> Self {
        Self::cmp(column, CompareOp::Eq, CompareValue::One(SoqlValue::Null))
    }

    pub fn is_not_null(column: ColumnRef) -> Self {
        Self::cmp(column, CompareOp::NotEq, CompareValue::One(SoqlValue::Null))
    }

    pub fn in_list<I, V>(column: ColumnRef, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SoqlValue>,
    {
        Self::cmp(
            column,
            CompareOp::In,
            CompareValue::Many(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Combine with another condition; both must hold.
    pub fn and(self, other: Filter) -> Filter {
        match self {
            Filter::And(mut children) => {
                children.push(other);
                Filter::And(children)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Combine with another condition; either may hold.
    pub fn or(self, other: Filter) -> Filter {
        match self {
            Filter::Or(mut children) => {
                children.push(other);
                Filter::Or(children)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Filter {
        Filter::Not(Box::new(self))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub descending: bool,
    pub nulls: Option<NullsOrder>,
}

impl OrderBy {
    pub fn asc(column: ColumnRef) -> Self {
        Self {
            column,
            descending: false,
            nulls: None,
        }
    }

    pub fn desc(column: ColumnRef) -> Self {
        Self {
            column,
            descending: true,
            nulls: None,
        }
    }

    pub fn nulls(mut self, order: NullsOrder) -> Self {
        self.nulls = Some(order);
        self
    }
}

/// A relational `SELECT` against one root object.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectQuery {
    pub object: ObjectName,
    pub columns: Vec<SelectItem>,
    pub filter: Option<Filter>,
    pub group_by: Vec<ColumnRef>,
    pub having: Option<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SelectQuery {
    pub fn new(object: ObjectName) -> Self {
        Self {
            object,
            columns: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Select a field of the root object.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(SelectItem::Column(ColumnRef::new(name)));
        self
    }

    /// Select several fields of the root object.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(names.into_iter().map(|n| SelectItem::Column(ColumnRef::new(n))));
        self
    }

    /// Select an arbitrary item (parent field, aggregate).
    pub fn select(mut self, item: SelectItem) -> Self {
        self.columns.push(item);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    pub fn group_by(mut self, column: ColumnRef) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn having(mut self, filter: Filter) -> Self {
        self.having = Some(match self.having.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Per-call switches controlling how a query or DML request is issued.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    /// Include soft-deleted and archived rows (`queryAll` endpoint).
    pub query_all: bool,
    /// Atomicity of bulk DML calls; the platform default applies when unset.
    pub all_or_none: Option<bool>,
    /// Render field names without the root-object prefix. Forced for the
    /// handful of objects that reject prefixed fields.
    pub minimal_aliases: bool,
    /// Compile for the Tooling API object family.
    pub tooling_api: bool,
}

impl QueryOptions {
    pub fn query_all(mut self) -> Self {
        self.query_all = true;
        self
    }

    pub fn all_or_none(mut self, value: bool) -> Self {
        self.all_or_none = Some(value);
        self
    }

    pub fn minimal_aliases(mut self) -> Self {
        self.minimal_aliases = true;
        self
    }

    pub fn tooling_api(mut self) -> Self {
        self.tooling_api = true;
        self
    }
}
