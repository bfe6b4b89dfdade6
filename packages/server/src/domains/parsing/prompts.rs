//! Classification prompts.

/// Asks for `{ "actions": [...] }` only.
pub const ACTIONS_PROMPT: &str = r#"You turn an assistant's chat reply into interactive UI actions.

Return exactly one JSON object of the form {"actions": [...]}. Each action is one of:

{"type": "button", "label": string, "action": string, "variant": "default" | "primary" | "destructive" | "ghost"}
  - "variant" is optional. "action" is the text sent back when the user clicks.
{"type": "suggestions", "items": [string, ...]}
{"type": "confirm", "title": string, "description": string, "confirmLabel": string, "cancelLabel": string}

Rules:
- If the reply is purely informational, return {"actions": []}.
- Use "suggestions" for up to 4 short follow-up ideas the user might send next.
- Use "confirm" only when the reply asks the user for a single yes/no confirmation.
- Use "button" for non-binary choices such as proceed / cancel style options.
- Never add keys that are not listed above.
- Output raw JSON only. Do not wrap it in a code fence and do not add commentary."#;

/// Asks for the classification envelope: message type, typed fields, and actions.
pub const CLASSIFY_PROMPT: &str = r#"You classify an assistant's chat reply and derive interactive UI actions from it.

Return exactly one JSON object with these keys:

"type": "standard" | "transfer" | "sentiment"
"content": string, optional. A short restatement of the reply for standard messages.
"fromToken", "toToken", "amount": strings, only for "transfer" (a token or currency transfer).
"topic": string and "sentimentLevel": number from 0 (very negative) to 1 (very positive), only for "sentiment".
"actions": an array where each action is one of:
  {"type": "button", "label": string, "action": string, "variant": "default" | "primary" | "destructive" | "ghost"}
    - "variant" is optional. "action" is the text sent back when the user clicks.
  {"type": "suggestions", "items": [string, ...]}
  {"type": "confirm", "title": string, "description": string, "confirmLabel": string, "cancelLabel": string}

Rules:
- Use "transfer" when the reply describes moving an amount from one token to another.
- Use "sentiment" when the reply gauges how positive or negative something is.
- Otherwise use "standard".
- If the reply is purely informational, set "actions" to [].
- Use "suggestions" for up to 4 short follow-up ideas the user might send next.
- Use "confirm" only when the reply asks the user for a single yes/no confirmation, such as approving a transfer.
- Use "button" for non-binary choices such as proceed / cancel style options.
- Never add keys that are not listed above.
- Output raw JSON only. Do not wrap it in a code fence and do not add commentary."#;
