//! SQL-like statements executed by the service.
//!
//! Statements use positional `?` parameters, counted outside single-quoted
//! string literals.

use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, AttributeValue, Item},
};
use crate::error::{self, Error, Result, TransportError};
use crate::proto;

/// Count the `?` markers outside single-quoted literals.
fn count_parameters(statement: &str) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for c in statement.chars() {
        match c {
            '\'' => quoted = !quoted,
            '?' if !quoted => count += 1,
            _ => {}
        }
    }
    count
}

/// A validated statement.
///
/// ```rust,no_run
/// use keystone_client::{Client, statement};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let select = statement::ExecuteStatement::builder("SELECT * FROM items WHERE pk = ?")
///     .with_parameter("user#123")
///     .build()?;
/// if let statement::ExecuteStatementOutput::Select { items, .. } = select.send(client).await? {
///     println!("{items:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExecuteStatement {
    pub(crate) statement: String,
    pub(crate) parameters: Vec<AttributeValue>,
}

impl ExecuteStatement {
    /// Start building a statement.
    pub fn builder(statement: impl Into<String>) -> ExecuteStatementBuilder {
        ExecuteStatementBuilder {
            statement: statement.into(),
            parameters: Vec::new(),
        }
    }

    /// The statement text.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Execute the statement.
    pub async fn send(self, client: &Client) -> Result<ExecuteStatementOutput> {
        client.execute_statement(self).await
    }
}

/// Accumulates a statement and its positional parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecuteStatementBuilder {
    statement: String,
    parameters: Vec<AttributeValue>,
}

impl ExecuteStatementBuilder {
    /// Append the value for the next `?`.
    pub fn with_parameter(mut self, parameter: impl Into<AttributeValue>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Append values for the next `?` markers, in order.
    pub fn with_parameters<T: Into<AttributeValue>>(
        mut self,
        parameters: impl IntoIterator<Item = T>,
    ) -> Self {
        self.parameters.extend(parameters.into_iter().map(Into::into));
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<ExecuteStatement> {
        if self.statement.trim().is_empty() {
            return Err(Error::validation("statement must not be empty"));
        }
        let expected = count_parameters(&self.statement);
        if expected != self.parameters.len() {
            return Err(Error::validation(format!(
                "statement has {expected} parameters but {} values were supplied",
                self.parameters.len()
            )));
        }
        for parameter in &self.parameters {
            parameter.validate()?;
        }
        Ok(ExecuteStatement {
            statement: self.statement,
            parameters: self.parameters,
        })
    }
}

impl From<ExecuteStatement> for proto::ExecuteStatementRequest {
    fn from(execute_statement: ExecuteStatement) -> Self {
        Self {
            statement: execute_statement.statement,
            parameters: execute_statement
                .parameters
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Result of a statement, shaped by its kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecuteStatementOutput {
    /// Rows of a `SELECT`.
    Select {
        /// Matching items.
        items: Vec<Item>,
        /// Number of items returned.
        count: u32,
        /// Number of items examined.
        scanned_count: u32,
        /// Cursor for the next page.
        last_evaluated_key: Option<Key>,
    },
    /// Outcome of an `INSERT`.
    Insert {
        /// Whether the item was written.
        success: bool,
    },
    /// Outcome of an `UPDATE`.
    Update {
        /// The item after the update.
        item: Option<Item>,
    },
    /// Outcome of a `DELETE`.
    Delete {
        /// Whether the item was removed.
        success: bool,
    },
}

impl TryFrom<proto::ExecuteStatementResponse> for ExecuteStatementOutput {
    type Error = Error;

    fn try_from(response: proto::ExecuteStatementResponse) -> Result<Self> {
        use proto::execute_statement_response::Response;

        error::check_remote_error(response.error)?;
        let output = match response.response {
            Some(Response::Select(select)) => Self::Select {
                items: value::from_proto_items(select.items)?,
                count: select.count,
                scanned_count: select.scanned_count,
                last_evaluated_key: select.last_key.map(Into::into),
            },
            Some(Response::Insert(insert)) => Self::Insert {
                success: insert.success,
            },
            Some(Response::Update(update)) => Self::Update {
                item: update.item.map(value::from_proto_item).transpose()?,
            },
            Some(Response::Delete(delete)) => Self::Delete {
                success: delete.success,
            },
            None => {
                return Err(TransportError::Malformed(
                    "statement response without a result".to_string(),
                )
                .into());
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::none("SELECT * FROM items", 0)]
    #[case::one("SELECT * FROM items WHERE pk = ?", 1)]
    #[case::several("INSERT INTO items VALUE {'pk': ?, 'name': ?}", 2)]
    #[case::quoted_marker("SELECT * FROM items WHERE note = 'why?' AND pk = ?", 1)]
    #[case::escaped_quote("SELECT * FROM items WHERE note = 'it''s?' AND pk = ?", 1)]
    fn test_count_parameters(#[case] statement: &str, #[case] expected: usize) {
        assert_eq!(count_parameters(statement), expected);
    }

    #[test]
    fn test_execute_statement_to_request() {
        let request: proto::ExecuteStatementRequest =
            ExecuteStatement::builder("UPDATE items SET age = ? WHERE pk = ?")
                .with_parameters([AttributeValue::from(31), AttributeValue::from("user#1")])
                .build()
                .unwrap()
                .into();
        assert_eq!(request.statement, "UPDATE items SET age = ? WHERE pk = ?");
        assert_eq!(
            request.parameters,
            vec![
                proto::Value::from(AttributeValue::from(31)),
                proto::Value::from(AttributeValue::from("user#1")),
            ]
        );
    }

    #[rstest]
    #[case::empty(ExecuteStatement::builder("  "))]
    #[case::missing_parameter(ExecuteStatement::builder("SELECT * FROM items WHERE pk = ?"))]
    #[case::extra_parameter(ExecuteStatement::builder("SELECT * FROM items").with_parameter(1))]
    fn test_build_rejects(#[case] builder: ExecuteStatementBuilder) {
        assert!(builder.build().unwrap_err().is_validation());
    }

    #[rstest]
    #[case::insert(
        proto::execute_statement_response::Response::Insert(proto::InsertResult { success: true }),
        ExecuteStatementOutput::Insert { success: true }
    )]
    #[case::delete(
        proto::execute_statement_response::Response::Delete(proto::DeleteResult { success: false }),
        ExecuteStatementOutput::Delete { success: false }
    )]
    #[case::update(
        proto::execute_statement_response::Response::Update(proto::UpdateResult { item: None }),
        ExecuteStatementOutput::Update { item: None }
    )]
    #[case::select(
        proto::execute_statement_response::Response::Select(proto::SelectResult {
            items: Vec::new(),
            count: 0,
            scanned_count: 7,
            last_key: Some(Key::new("p").into()),
        }),
        ExecuteStatementOutput::Select {
            items: Vec::new(),
            count: 0,
            scanned_count: 7,
            last_evaluated_key: Some(Key::new("p")),
        }
    )]
    fn test_output(
        #[case] response: proto::execute_statement_response::Response,
        #[case] expected: ExecuteStatementOutput,
    ) {
        let response = proto::ExecuteStatementResponse {
            response: Some(response),
            error: None,
        };
        assert_eq!(ExecuteStatementOutput::try_from(response).unwrap(), expected);
    }

    #[test]
    fn test_output_without_result_is_malformed() {
        let response = proto::ExecuteStatementResponse::default();
        assert!(ExecuteStatementOutput::try_from(response).unwrap_err().is_transport());
    }

    #[test]
    fn test_remote_error_is_raised() {
        let response = proto::ExecuteStatementResponse {
            response: None,
            error: Some("syntax error".to_string()),
        };
        assert!(ExecuteStatementOutput::try_from(response).unwrap_err().is_application());
    }
}
