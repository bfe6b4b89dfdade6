//! Closed-schema validation of model output.
//!
//! Every object is checked key by key: an unknown `type` tag, a missing
//! required field, a field of the wrong JSON type, or any key outside the
//! matching variant rejects the whole result.

use serde_json::{Map, Value};
use thiserror::Error;

use super::models::{ActionType, ButtonVariant, MessageActions, MessageType, ParsedMessageData};
use crate::common::MessageId;

const BUTTON_FIELDS: &[&str] = &["type", "label", "action", "variant"];
const SUGGESTIONS_FIELDS: &[&str] = &["type", "items"];
const CONFIRM_FIELDS: &[&str] = &["type", "title", "description", "confirmLabel", "cancelLabel"];
const ACTIONS_ENVELOPE_FIELDS: &[&str] = &["actions", "messageId"];
const PARSED_ENVELOPE_FIELDS: &[&str] = &[
    "type",
    "content",
    "fromToken",
    "toToken",
    "amount",
    "topic",
    "sentimentLevel",
    "actions",
    "messageId",
];

/// Why a model result failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionSchemaError {
    #[error("{path}: expected a JSON object")]
    NotAnObject { path: String },

    #[error("{path}: unknown type `{tag}`")]
    UnknownTag { path: String, tag: String },

    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: String },

    #[error("{path}: field `{field}` must be {expected}")]
    WrongType {
        path: String,
        field: String,
        expected: &'static str,
    },

    #[error("{path}: unexpected field `{field}`")]
    UnexpectedField { path: String, field: String },

    #[error("{path}: invalid `{field}`: {reason}")]
    InvalidValue {
        path: String,
        field: String,
        reason: String,
    },
}

pub type SchemaResult<T> = std::result::Result<T, ActionSchemaError>;

/// Coerce `actions` into a sequence: a lone object becomes a one-element
/// list and falsy entries (`null`, `false`, `0`, `""`) are dropped.
///
/// Anything else is left for validation to reject.
pub fn normalize_actions(envelope: &mut Map<String, Value>) {
    let Some(actions) = envelope.get_mut("actions") else {
        return;
    };

    if actions.is_object() {
        let single = actions.take();
        *actions = Value::Array(vec![single]);
    } else if let Value::Array(items) = actions {
        items.retain(|item| !is_falsy(item));
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Validate a single action object.
pub fn validate_action(value: &Value, path: &str) -> SchemaResult<ActionType> {
    let fields = Fields::of(value, path)?;
    let tag = fields.required_str("type")?;

    match tag.as_str() {
        "button" => {
            fields.closed(BUTTON_FIELDS)?;
            let variant = match fields.optional_str("variant")? {
                None => None,
                Some(name) => Some(ButtonVariant::from_name(&name).ok_or_else(|| {
                    fields.invalid("variant", format!("`{}` is not a known variant", name))
                })?),
            };
            Ok(ActionType::Button {
                label: fields.required_str("label")?,
                action: fields.required_str("action")?,
                variant,
            })
        }
        "suggestions" => {
            fields.closed(SUGGESTIONS_FIELDS)?;
            Ok(ActionType::Suggestions {
                items: fields.required_str_list("items")?,
            })
        }
        "confirm" => {
            fields.closed(CONFIRM_FIELDS)?;
            Ok(ActionType::Confirm {
                title: fields.required_str("title")?,
                description: fields.required_str("description")?,
                confirm_label: fields.required_str("confirmLabel")?,
                cancel_label: fields.required_str("cancelLabel")?,
            })
        }
        other => Err(ActionSchemaError::UnknownTag {
            path: path.to_string(),
            tag: other.to_string(),
        }),
    }
}

/// Validate the `actions` sequence of an already-normalized envelope.
fn validate_action_list(fields: &Fields<'_>) -> SchemaResult<Vec<ActionType>> {
    let items = fields
        .obj
        .get("actions")
        .ok_or_else(|| fields.missing("actions"))?
        .as_array()
        .ok_or_else(|| fields.wrong_type("actions", "an array of actions"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_action(item, &format!("actions[{}]", i)))
        .collect()
}

/// Validate `{ "actions": [...] }` model output.
///
/// A `messageId` key is tolerated and ignored; the caller's id always wins.
pub fn validate_message_actions(
    mut value: Value,
    message_id: impl Into<MessageId>,
) -> SchemaResult<MessageActions> {
    if let Value::Object(envelope) = &mut value {
        normalize_actions(envelope);
    }
    let fields = Fields::of(&value, "$")?;
    fields.closed(ACTIONS_ENVELOPE_FIELDS)?;

    Ok(MessageActions {
        message_id: message_id.into(),
        actions: validate_action_list(&fields)?,
    })
}

/// Validate the classification envelope (`type`, optional typed fields, `actions`).
pub fn validate_parsed_data(mut value: Value) -> SchemaResult<ParsedMessageData> {
    if let Value::Object(envelope) = &mut value {
        normalize_actions(envelope);
    }
    let fields = Fields::of(&value, "$")?;
    fields.closed(PARSED_ENVELOPE_FIELDS)?;

    let tag = fields.required_str("type")?;
    let message_type = MessageType::from_name(&tag).ok_or_else(|| ActionSchemaError::UnknownTag {
        path: "$".to_string(),
        tag: tag.clone(),
    })?;

    let sentiment_level = fields.optional_f64("sentimentLevel")?;
    if let Some(level) = sentiment_level {
        if !(0.0..=1.0).contains(&level) {
            return Err(fields.invalid("sentimentLevel", format!("{} is outside [0, 1]", level)));
        }
    }

    Ok(ParsedMessageData {
        message_type,
        content: fields.optional_str("content")?,
        from_token: fields.optional_str("fromToken")?,
        to_token: fields.optional_str("toToken")?,
        amount: fields.optional_amount("amount")?,
        topic: fields.optional_str("topic")?,
        sentiment_level,
        actions: validate_action_list(&fields)?,
    })
}

/// Typed accessors over one JSON object, reporting errors at `path`.
struct Fields<'a> {
    path: &'a str,
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn of(value: &'a Value, path: &'a str) -> SchemaResult<Self> {
        match value {
            Value::Object(obj) => Ok(Self { path, obj }),
            _ => Err(ActionSchemaError::NotAnObject {
                path: path.to_string(),
            }),
        }
    }

    fn closed(&self, allowed: &[&str]) -> SchemaResult<()> {
        match self.obj.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(extra) => Err(ActionSchemaError::UnexpectedField {
                path: self.path.to_string(),
                field: extra.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Present and non-null.
    fn present(&self, field: &str) -> Option<&'a Value> {
        self.obj.get(field).filter(|v| !v.is_null())
    }

    fn required_str(&self, field: &str) -> SchemaResult<String> {
        self.optional_str(field)?
            .ok_or_else(|| self.missing(field))
    }

    fn optional_str(&self, field: &str) -> SchemaResult<Option<String>> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.wrong_type(field, "a string")),
        }
    }

    fn required_str_list(&self, field: &str) -> SchemaResult<Vec<String>> {
        let items = self
            .present(field)
            .ok_or_else(|| self.missing(field))?
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "an array of strings"))?;

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.wrong_type(field, "an array of strings"))
            })
            .collect()
    }

    fn optional_f64(&self, field: &str) -> SchemaResult<Option<f64>> {
        match self.present(field) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a number")),
        }
    }

    /// Amounts are strings on the wire; bare numbers are accepted and rendered as-is.
    fn optional_amount(&self, field: &str) -> SchemaResult<Option<String>> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.wrong_type(field, "a string")),
        }
    }

    fn missing(&self, field: &str) -> ActionSchemaError {
        ActionSchemaError::MissingField {
            path: self.path.to_string(),
            field: field.to_string(),
        }
    }

    fn wrong_type(&self, field: &str, expected: &'static str) -> ActionSchemaError {
        ActionSchemaError::WrongType {
            path: self.path.to_string(),
            field: field.to_string(),
            expected,
        }
    }

    fn invalid(&self, field: &str, reason: String) -> ActionSchemaError {
        ActionSchemaError::InvalidValue {
            path: self.path.to_string(),
            field: field.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_each_variant() {
        let result = validate_message_actions(
            json!({"actions": [
                {"type": "button", "label": "Proceed", "action": "proceed", "variant": "primary"},
                {"type": "button", "label": "Later", "action": "later"},
                {"type": "suggestions", "items": ["Explain more", "Show alternatives"]},
                {"type": "confirm", "title": "Transfer", "description": "Send it?", "confirmLabel": "Yes", "cancelLabel": "No"}
            ]}),
            "m1",
        )
        .unwrap();

        assert_eq!(result.message_id, "m1");
        assert_eq!(result.actions.len(), 4);
        assert_eq!(
            result.actions[0],
            ActionType::Button {
                label: "Proceed".into(),
                action: "proceed".into(),
                variant: Some(ButtonVariant::Primary),
            }
        );
        assert_eq!(result.actions[3].tag(), "confirm");
    }

    #[test]
    fn wraps_single_action_object() {
        let result = validate_message_actions(
            json!({"actions": {"type": "suggestions", "items": ["a"]}}),
            "m1",
        )
        .unwrap();

        assert_eq!(
            result.actions,
            vec![ActionType::Suggestions {
                items: vec!["a".into()]
            }]
        );
    }

    #[test]
    fn drops_falsy_entries() {
        let result = validate_message_actions(
            json!({"actions": [null, false, 0, "", {"type": "suggestions", "items": []}]}),
            "m1",
        )
        .unwrap();

        assert_eq!(result.actions.len(), 1);
    }

    #[test]
    fn rejects_extra_keys_on_action() {
        let err = validate_message_actions(
            json!({"actions": [{"type": "button", "label": "Go", "action": "go", "icon": "rocket"}]}),
            "m1",
        )
        .unwrap_err();

        assert_eq!(
            err,
            ActionSchemaError::UnexpectedField {
                path: "actions[0]".into(),
                field: "icon".into()
            }
        );
    }

    #[test]
    fn rejects_fields_from_another_variant() {
        let err = validate_action(
            &json!({"type": "suggestions", "items": ["a"], "label": "x"}),
            "actions[0]",
        )
        .unwrap_err();

        assert!(matches!(err, ActionSchemaError::UnexpectedField { .. }));
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = validate_action(&json!({"type": "slider", "min": 0}), "actions[0]").unwrap_err();

        assert_eq!(
            err,
            ActionSchemaError::UnknownTag {
                path: "actions[0]".into(),
                tag: "slider".into()
            }
        );
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = validate_action(
            &json!({"type": "confirm", "title": "t", "description": "d", "confirmLabel": "Yes"}),
            "actions[0]",
        )
        .unwrap_err();

        assert_eq!(
            err,
            ActionSchemaError::MissingField {
                path: "actions[0]".into(),
                field: "cancelLabel".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_button_variant() {
        let err = validate_action(
            &json!({"type": "button", "label": "Go", "action": "go", "variant": "outline"}),
            "actions[0]",
        )
        .unwrap_err();

        assert!(matches!(err, ActionSchemaError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_non_string_suggestion_items() {
        let err = validate_action(&json!({"type": "suggestions", "items": ["a", 2]}), "actions[0]")
            .unwrap_err();

        assert!(matches!(err, ActionSchemaError::WrongType { .. }));
    }

    #[test]
    fn rejects_missing_actions_and_non_objects() {
        assert!(matches!(
            validate_message_actions(json!({}), "m1").unwrap_err(),
            ActionSchemaError::MissingField { .. }
        ));
        assert!(matches!(
            validate_message_actions(json!([]), "m1").unwrap_err(),
            ActionSchemaError::NotAnObject { .. }
        ));
        assert!(matches!(
            validate_message_actions(json!({"actions": "none"}), "m1").unwrap_err(),
            ActionSchemaError::WrongType { .. }
        ));
    }

    #[test]
    fn validates_transfer_envelope() {
        let data = validate_parsed_data(json!({
            "type": "transfer",
            "fromToken": "ETH",
            "toToken": "USDC",
            "amount": 100,
            "actions": [{"type": "confirm", "title": "Confirm transfer", "description": "Transfer 100 ETH to USDC?", "confirmLabel": "Transfer", "cancelLabel": "Cancel"}]
        }))
        .unwrap();

        assert_eq!(data.message_type, MessageType::Transfer);
        assert_eq!(data.from_token.as_deref(), Some("ETH"));
        assert_eq!(data.amount.as_deref(), Some("100"));
        assert_eq!(data.actions.len(), 1);
    }

    #[test]
    fn rejects_sentiment_out_of_range() {
        let err = validate_parsed_data(json!({
            "type": "sentiment",
            "topic": "launch",
            "sentimentLevel": 1.5,
            "actions": []
        }))
        .unwrap_err();

        assert!(matches!(err, ActionSchemaError::InvalidValue { .. }));
    }

    #[test]
    fn null_optional_fields_are_absent() {
        let data = validate_parsed_data(json!({
            "type": "standard",
            "content": null,
            "actions": []
        }))
        .unwrap();

        assert_eq!(data.content, None);
    }

    #[test]
    fn rejects_unknown_message_type_and_envelope_keys() {
        assert!(matches!(
            validate_parsed_data(json!({"type": "poll", "actions": []})).unwrap_err(),
            ActionSchemaError::UnknownTag { .. }
        ));
        assert!(matches!(
            validate_parsed_data(json!({"type": "standard", "actions": [], "mood": "happy"}))
                .unwrap_err(),
            ActionSchemaError::UnexpectedField { .. }
        ));
    }
}
