use crate::client::Client;
use crate::common::{
    expression::{self, Bindings, Expression},
    key::Key,
    value::{self, AttributeValue, Item},
};
use crate::error::{self, Error, Result};
use crate::proto;
use crate::write;

use bytes::Bytes;

/// SET operation for updating attributes.
///
/// ```rust
/// use keystone_client::write::update_item;
///
/// let assign = update_item::SetInput::Assign("value");
/// let increment = update_item::SetInput::Increment(10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SetInput<T = AttributeValue> {
    /// Assign a new value to the attribute (replaces existing value).
    Assign(T),
    /// Increment a numeric attribute by the specified value.
    Increment(T),
    /// Decrement a numeric attribute by the specified value.
    Decrement(T),
    /// Append values to the end of a list attribute.
    ListAppend(T),
    /// Prepend values to the beginning of a list attribute.
    ListPrepend(T),
    /// Assign a value only if the attribute doesn't exist.
    IfNotExists(T),
}

impl<T> SetInput<T> {
    fn get_set_expression(self, path: &str, value_placeholder: &str) -> (T, String) {
        match self {
            SetInput::Assign(value) => {
                let expression = format!("{path} = {value_placeholder}");
                (value, expression)
            }
            SetInput::Increment(value) => {
                let expression = format!("{path} = {path} + {value_placeholder}");
                (value, expression)
            }
            SetInput::Decrement(value) => {
                let expression = format!("{path} = {path} - {value_placeholder}");
                (value, expression)
            }
            SetInput::ListAppend(value) => {
                let expression = format!("{path} = list_append({path}, {value_placeholder})");
                (value, expression)
            }
            SetInput::ListPrepend(value) => {
                let expression = format!("{path} = list_append({value_placeholder}, {path})");
                (value, expression)
            }
            SetInput::IfNotExists(value) => {
                let expression = format!("{path} = if_not_exists({path}, {value_placeholder})");
                (value, expression)
            }
        }
    }
}

/// One typed change to an attribute path.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateAction {
    /// SET - set or modify the attribute.
    Set(String, SetInput),
    /// REMOVE - remove the attribute.
    Remove(String),
    /// ADD - add to a number or a set.
    Add(String, AttributeValue),
    /// DELETE - delete values from a set.
    Delete(String, AttributeValue),
}

#[derive(Default)]
struct Clauses {
    set: Vec<String>,
    remove: Vec<String>,
    add: Vec<String>,
    delete: Vec<String>,
}

/// Render typed actions into one `SET .. REMOVE .. ADD .. DELETE ..` expression.
fn get_update_expression(actions: Vec<UpdateAction>) -> Expression {
    let mut clauses = Clauses::default();
    let mut expression = Expression::default();
    for (index, action) in actions.into_iter().enumerate() {
        match action {
            UpdateAction::Set(path, set_input) => {
                let placeholder = format!(":set{index}");
                let (value, text) = set_input.get_set_expression(&path, &placeholder);
                expression.bind(placeholder, value);
                clauses.set.push(text);
            }
            UpdateAction::Remove(path) => clauses.remove.push(path),
            UpdateAction::Add(path, value) => {
                let placeholder = format!(":add{index}");
                clauses.add.push(format!("{path} {placeholder}"));
                expression.bind(placeholder, value);
            }
            UpdateAction::Delete(path, value) => {
                let placeholder = format!(":delete{index}");
                clauses.delete.push(format!("{path} {placeholder}"));
                expression.bind(placeholder, value);
            }
        }
    }
    let rendered: Vec<_> = [
        ("SET", clauses.set),
        ("REMOVE", clauses.remove),
        ("ADD", clauses.add),
        ("DELETE", clauses.delete),
    ]
    .into_iter()
    .filter(|(_, parts)| !parts.is_empty())
    .map(|(keyword, parts)| format!("{keyword} {}", parts.join(", ")))
    .collect();
    expression.text = rendered.join(" ");
    expression
}

/// A validated update item request.
///
/// ```rust,no_run
/// use keystone_client::{Client, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem::builder("user#123")
///     .set("name", "Jane")
///     .increment("logins", 1)
///     .remove("temporary")
///     .build()?;
/// // renders "SET name = :set0, logins = logins + :set1 REMOVE temporary"
/// let updated = update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem {
    pub(crate) key: Key,
    pub(crate) update_expression: String,
    pub(crate) write_args: write::common::WriteArgs,
}

impl UpdateItem {
    /// Start building an update for the given partition key.
    pub fn builder(partition_key: impl Into<Bytes>) -> UpdateItemBuilder {
        UpdateItemBuilder {
            key: Key::new(partition_key),
            update_expression: None,
            actions: Vec::new(),
            write_args: write::common::WriteArgs::default(),
        }
    }

    /// The key of the item to update.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The update expression sent to the service.
    pub fn update_expression(&self) -> &str {
        &self.update_expression
    }

    /// Execute the update item operation.
    pub async fn send(self, client: &Client) -> Result<UpdateItemOutput> {
        client.update(self).await
    }
}

/// Accumulates an update item request.
///
/// Either a raw update expression or typed actions may be used, not both.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItemBuilder {
    key: Key,
    update_expression: Option<String>,
    actions: Vec<UpdateAction>,
    write_args: write::common::WriteArgs,
}

write::common::impl_write_mutators!(UpdateItemBuilder);

impl UpdateItemBuilder {
    /// Use a raw update expression; replaces any earlier one.
    pub fn with_expression(mut self, update_expression: impl Into<Expression>) -> Self {
        let (text, bindings) = update_expression.into().into_parts();
        self.update_expression = Some(text);
        self.write_args.bindings.extend(bindings);
        self
    }

    /// Append a typed action.
    pub fn with_action(mut self, action: UpdateAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Assign `value` to `path`.
    pub fn set(self, path: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_action(UpdateAction::Set(path.into(), SetInput::Assign(value.into())))
    }

    /// Add `value` to the number at `path`.
    pub fn increment(self, path: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_action(UpdateAction::Set(path.into(), SetInput::Increment(value.into())))
    }

    /// Remove the attribute at `path`.
    pub fn remove(self, path: impl Into<String>) -> Self {
        self.with_action(UpdateAction::Remove(path.into()))
    }

    /// Add `value` to the number or set at `path`.
    pub fn add(self, path: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_action(UpdateAction::Add(path.into(), value.into()))
    }

    /// Delete `value` from the set at `path`.
    pub fn delete(self, path: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_action(UpdateAction::Delete(path.into(), value.into()))
    }

    /// Validate and freeze the request.
    pub fn build(mut self) -> Result<UpdateItem> {
        self.key.validate()?;
        let update_expression = match (self.update_expression, self.actions.is_empty()) {
            (Some(update_expression), true) => update_expression,
            (None, false) => {
                let (text, bindings) = get_update_expression(self.actions).into_parts();
                expression::merge_bindings(&mut self.write_args.bindings, bindings)?;
                text
            }
            (None, true) => {
                return Err(Error::validation(
                    "an update needs an update expression or at least one action",
                ));
            }
            (Some(_), false) => {
                return Err(Error::validation(
                    "an update takes either an update expression or actions, not both",
                ));
            }
        };
        expression::validate_text(
            "update expression",
            &update_expression,
            &self.write_args.bindings,
        )?;
        self.write_args.validate()?;
        Ok(UpdateItem {
            key: self.key,
            update_expression,
            write_args: self.write_args,
        })
    }
}

impl From<UpdateItem> for proto::UpdateRequest {
    fn from(update_item: UpdateItem) -> Self {
        let key: proto::Key = update_item.key.into();
        let write_input: write::common::WriteInput = update_item.write_args.into();
        Self {
            partition_key: key.partition_key,
            sort_key: key.sort_key,
            update_expression: update_item.update_expression,
            condition_expression: write_input.condition_expression,
            expression_values: write_input.expression_values,
        }
    }
}

/// Result of an update item operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItemOutput {
    /// The item after the update, when the service returns it.
    pub item: Option<Item>,
}

impl TryFrom<proto::UpdateResponse> for UpdateItemOutput {
    type Error = Error;

    fn try_from(response: proto::UpdateResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        let item = response.item.map(value::from_proto_item).transpose()?;
        Ok(Self { item })
    }
}
