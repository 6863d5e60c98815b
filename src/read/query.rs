use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, AttributeValue, Item},
};
use crate::error::{self, Error, Result};
use crate::proto;
use crate::read;

use bytes::Bytes;

/// Condition on the sort key of a query. Bounds compare bytewise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortKeyCondition {
    /// Sort key equals the value.
    EqualTo(Bytes),
    /// Sort key is less than the value.
    LessThan(Bytes),
    /// Sort key is less than or equal to the value.
    LessThanOrEqual(Bytes),
    /// Sort key is greater than the value.
    GreaterThan(Bytes),
    /// Sort key is greater than or equal to the value.
    GreaterThanOrEqual(Bytes),
    /// Sort key lies between both bounds (inclusive).
    Between(Bytes, Bytes),
    /// Sort key starts with the prefix.
    BeginsWith(Bytes),
}

impl SortKeyCondition {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Between(lower, upper) if lower > upper => Err(Error::validation(format!(
                "between bounds are inverted: {lower:?} > {upper:?}"
            ))),
            _ => Ok(()),
        }
    }
}

fn binary(value: Bytes) -> proto::Value {
    AttributeValue::Binary(value).into()
}

impl From<SortKeyCondition> for proto::SortKeyCondition {
    fn from(sort_key_condition: SortKeyCondition) -> Self {
        use proto::sort_key_condition::Condition;

        let condition = match sort_key_condition {
            SortKeyCondition::EqualTo(value) => Condition::EqualTo(binary(value)),
            SortKeyCondition::LessThan(value) => Condition::LessThan(binary(value)),
            SortKeyCondition::LessThanOrEqual(value) => Condition::LessThanOrEqual(binary(value)),
            SortKeyCondition::GreaterThan(value) => Condition::GreaterThan(binary(value)),
            SortKeyCondition::GreaterThanOrEqual(value) => {
                Condition::GreaterThanOrEqual(binary(value))
            }
            SortKeyCondition::Between(lower, upper) => Condition::Between(proto::BetweenCondition {
                lower: Some(binary(lower)),
                upper: Some(binary(upper)),
            }),
            SortKeyCondition::BeginsWith(value) => Condition::BeginsWith(binary(value)),
        };
        Self {
            condition: Some(condition),
        }
    }
}

/// A validated query request.
///
/// ```rust,no_run
/// use keystone_client::{Client, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query::builder("org#acme")
///     .with_sort_key_begins_with("user#")
///     .with_filter("active = :yes")
///     .with_binding(":yes", true)
///     .with_limit(10)
///     .build()?;
/// let page = query.send(client).await?;
/// println!("{} items, next page after {:?}", page.count, page.last_evaluated_key);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub(crate) partition_key: Bytes,
    pub(crate) sort_key_condition: Option<SortKeyCondition>,
    pub(crate) multiple_read_args: read::common::MultipleReadArgs,
    pub(crate) scan_forward: Option<bool>,
}

impl Query {
    /// Start building a query over the given partition key.
    pub fn builder(partition_key: impl Into<Bytes>) -> QueryBuilder {
        QueryBuilder {
            partition_key: partition_key.into(),
            sort_key_condition: None,
            multiple_read_args: read::common::MultipleReadArgs::default(),
            scan_forward: None,
        }
    }

    /// The queried partition key.
    pub fn partition_key(&self) -> &Bytes {
        &self.partition_key
    }

    /// Execute the query operation.
    pub async fn send(self, client: &Client) -> Result<QueryOutput> {
        client.query(self).await
    }
}

/// Accumulates a query request.
///
/// Sort-key mutators are mutually exclusive; the last one called wins.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuilder {
    partition_key: Bytes,
    sort_key_condition: Option<SortKeyCondition>,
    multiple_read_args: read::common::MultipleReadArgs,
    scan_forward: Option<bool>,
}

read::common::impl_multiple_read_mutators!(QueryBuilder);

impl QueryBuilder {
    /// Restrict the sort key.
    pub fn with_sort_key_condition(mut self, sort_key_condition: SortKeyCondition) -> Self {
        self.sort_key_condition = Some(sort_key_condition);
        self
    }

    /// Sort key equals `value`.
    pub fn with_sort_key_equal(self, value: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::EqualTo(value.into()))
    }

    /// Sort key is less than `value`.
    pub fn with_sort_key_less_than(self, value: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::LessThan(value.into()))
    }

    /// Sort key is less than or equal to `value`.
    pub fn with_sort_key_less_than_or_equal(self, value: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::LessThanOrEqual(value.into()))
    }

    /// Sort key is greater than `value`.
    pub fn with_sort_key_greater_than(self, value: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::GreaterThan(value.into()))
    }

    /// Sort key is greater than or equal to `value`.
    pub fn with_sort_key_greater_than_or_equal(self, value: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::GreaterThanOrEqual(value.into()))
    }

    /// Sort key lies in `lower..=upper`; inverted bounds fail at `build()`.
    pub fn with_sort_key_between(self, lower: impl Into<Bytes>, upper: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::Between(lower.into(), upper.into()))
    }

    /// Sort key starts with `prefix`.
    pub fn with_sort_key_begins_with(self, prefix: impl Into<Bytes>) -> Self {
        self.with_sort_key_condition(SortKeyCondition::BeginsWith(prefix.into()))
    }

    /// Read in ascending (`true`) or descending (`false`) sort-key order.
    pub fn with_scan_forward(mut self, scan_forward: bool) -> Self {
        self.scan_forward = Some(scan_forward);
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<Query> {
        if self.partition_key.is_empty() {
            return Err(Error::validation("partition key must not be empty"));
        }
        if let Some(sort_key_condition) = &self.sort_key_condition {
            sort_key_condition.validate()?;
        }
        self.multiple_read_args.validate()?;
        Ok(Query {
            partition_key: self.partition_key,
            sort_key_condition: self.sort_key_condition,
            multiple_read_args: self.multiple_read_args,
            scan_forward: self.scan_forward,
        })
    }
}

impl From<Query> for proto::QueryRequest {
    fn from(query: Query) -> Self {
        let multiple_read_input: read::common::MultipleReadInput = query.multiple_read_args.into();
        Self {
            partition_key: query.partition_key.to_vec(),
            sort_key_condition: query.sort_key_condition.map(Into::into),
            filter_expression: multiple_read_input.filter_expression,
            expression_values: multiple_read_input.expression_values,
            index_name: multiple_read_input.index_name,
            limit: multiple_read_input.limit,
            exclusive_start_key: multiple_read_input.exclusive_start_key,
            scan_forward: query.scan_forward,
        }
    }
}

/// One page of query results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOutput {
    /// Matching items in sort-key order.
    pub items: Vec<Item>,
    /// Number of items returned.
    pub count: u32,
    /// Number of items examined before filtering.
    pub scanned_count: u32,
    /// Cursor for the next page; `None` when the query is exhausted.
    pub last_evaluated_key: Option<Key>,
}

impl TryFrom<proto::QueryResponse> for QueryOutput {
    type Error = Error;

    fn try_from(response: proto::QueryResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        Ok(Self {
            items: value::from_proto_items(response.items)?,
            count: response.count,
            scanned_count: response.scanned_count,
            last_evaluated_key: response.last_evaluated_key.map(Into::into),
        })
    }
}
