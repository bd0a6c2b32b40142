//! Canonical request to Responses API request conversion

use super::call_tracker::CallTracker;
use super::tools::{convert_tool_choice, convert_tools, normalize_schema};
use crate::error::LlmError;
use crate::protocol::openai::{InputContent, InputItem, InputRole, ResponsesRequest, TextConfig, TextFormat};
use crate::types::{
    Content, FunctionCall, FunctionResponse, GenerateContentConfig, LlmRequest, Part, ROLE_DEVELOPER, ROLE_MODEL,
    ROLE_SYSTEM, ROLE_USER,
};

/// Format name used when the response schema carries no title
pub const DEFAULT_RESPONSE_FORMAT_NAME: &str = "relay_response";

const MIME_TEXT: &str = "text/plain";
const MIME_JSON: &str = "application/json";

/// Build a Responses API request
///
/// `fallback_model` is used unless the request names its own model.
///
/// # Errors
///
/// Fails when the contents cannot be represented as input items or the
/// config uses a feature the Responses API does not offer.
pub fn build_request(fallback_model: &str, req: &LlmRequest) -> Result<ResponsesRequest, LlmError> {
    let model = if req.model.is_empty() {
        fallback_model
    } else {
        req.model.as_str()
    };

    let input = convert_contents(&req.contents)?;
    if input.is_empty() {
        return Err(LlmError::NoContents);
    }

    let mut out = ResponsesRequest {
        model: model.to_owned(),
        input,
        ..ResponsesRequest::default()
    };

    if let Some(config) = &req.config {
        apply_generation_config(&mut out, config)?;

        let tools = convert_tools(config)?;
        if !tools.is_empty() {
            out.tools = tools;
        }

        if let Some(tool_config) = &config.tool_config {
            out.tool_choice = convert_tool_choice(tool_config)?;
        }
    }

    Ok(out)
}

/// Convert ordered content blocks into input items
///
/// Consecutive text parts of one block are merged into a single message;
/// function calls and responses become their own items and are correlated
/// through a [`CallTracker`] scoped to this conversion.
///
/// # Errors
///
/// Fails on unsupported roles or part kinds and on uncorrelated function
/// responses.
pub fn convert_contents(contents: &[Content]) -> Result<Vec<InputItem>, LlmError> {
    let mut items = Vec::new();
    let mut tracker = CallTracker::new();
    let mut run: Vec<&str> = Vec::new();

    for content in contents {
        if content.parts.is_empty() {
            continue;
        }
        let role = content.role.as_str();

        for part in &content.parts {
            match part {
                Part::Text { text, .. } => run.push(text),
                Part::FunctionCall(call) => {
                    flush_text(&mut items, &mut run, role)?;
                    items.push(function_call_item(&mut tracker, call)?);
                }
                Part::FunctionResponse(resp) => {
                    flush_text(&mut items, &mut run, role)?;
                    items.push(function_response_item(&mut tracker, resp)?);
                }
                other => return Err(LlmError::UnsupportedPart(other.kind())),
            }
        }

        flush_text(&mut items, &mut run, role)?;
    }

    Ok(items)
}

fn flush_text(items: &mut Vec<InputItem>, run: &mut Vec<&str>, role: &str) -> Result<(), LlmError> {
    if run.is_empty() {
        return Ok(());
    }

    let content: Vec<InputContent> = run
        .drain(..)
        .filter(|text| !text.trim().is_empty())
        .map(|text| InputContent::InputText { text: text.to_owned() })
        .collect();
    if content.is_empty() {
        return Ok(());
    }

    items.push(InputItem::Message {
        role: input_role(role)?,
        content,
    });
    Ok(())
}

/// Map a canonical role onto a Responses API message role
///
/// # Errors
///
/// Returns [`LlmError::UnsupportedRole`] for unknown roles.
pub fn input_role(role: &str) -> Result<InputRole, LlmError> {
    match role {
        "" | ROLE_USER => Ok(InputRole::User),
        ROLE_MODEL => Ok(InputRole::Assistant),
        ROLE_SYSTEM => Ok(InputRole::System),
        ROLE_DEVELOPER => Ok(InputRole::Developer),
        other => Err(LlmError::UnsupportedRole(other.to_owned())),
    }
}

fn function_call_item(tracker: &mut CallTracker, call: &FunctionCall) -> Result<InputItem, LlmError> {
    if call.name.is_empty() {
        return Err(LlmError::FunctionCallMissingName);
    }

    let arguments = serde_json::to_string(&call.args).map_err(|source| LlmError::Serialization {
        what: "function call arguments",
        source,
    })?;
    let call_id = tracker.register_call(call.id.as_deref());

    Ok(InputItem::FunctionCall {
        call_id,
        name: call.name.clone(),
        arguments,
    })
}

fn function_response_item(tracker: &mut CallTracker, resp: &FunctionResponse) -> Result<InputItem, LlmError> {
    let call_id = tracker.resolve_response(resp.id.as_deref(), &resp.name)?;
    let output = serde_json::to_string(&resp.response).map_err(|source| LlmError::Serialization {
        what: "function response",
        source,
    })?;

    Ok(InputItem::FunctionCallOutput { call_id, output })
}

fn apply_generation_config(out: &mut ResponsesRequest, config: &GenerateContentConfig) -> Result<(), LlmError> {
    out.temperature = config.temperature.map(f64::from);
    out.top_p = config.top_p.map(f64::from);
    if config.top_k.is_some() {
        return Err(LlmError::TopKNotSupported);
    }
    if config.max_output_tokens > 0 {
        out.max_output_tokens = Some(config.max_output_tokens);
    }
    if !config.stop_sequences.is_empty() {
        return Err(LlmError::StopSequencesNotSupported);
    }
    if config.candidate_count > 1 {
        return Err(LlmError::MultipleCandidatesNotSupported);
    }
    if config.frequency_penalty.is_some() || config.presence_penalty.is_some() {
        return Err(LlmError::PenaltiesNotSupported);
    }
    if config.response_logprobs {
        out.top_logprobs = Some(config.logprobs.unwrap_or(1));
    }

    if let Some(instruction) = &config.system_instruction {
        let text = flatten_instruction(instruction)?;
        if !text.is_empty() {
            out.instructions = Some(text);
        }
    }

    let mime = config.response_mime_type.as_str();
    if !matches!(mime, "" | MIME_TEXT | MIME_JSON) {
        return Err(LlmError::UnsupportedMimeType(mime.to_owned()));
    }
    if mime == MIME_JSON || config.response_schema.is_some() || config.response_json_schema.is_some() {
        out.text = Some(TextConfig {
            format: json_schema_format(config)?,
        });
    }

    if config.labels.is_some() {
        return Err(LlmError::LabelsNotSupported);
    }
    if config.safety_settings.is_some() {
        return Err(LlmError::SafetySettingsNotSupported);
    }

    Ok(())
}

fn flatten_instruction(content: &Content) -> Result<String, LlmError> {
    let mut texts = Vec::with_capacity(content.parts.len());
    for part in &content.parts {
        let text = part
            .as_text()
            .ok_or_else(|| LlmError::NonTextSystemInstruction(part.kind()))?;
        texts.push(text);
    }
    Ok(texts.join("\n"))
}

fn json_schema_format(config: &GenerateContentConfig) -> Result<TextFormat, LlmError> {
    let schema = if let Some(raw) = &config.response_json_schema {
        normalize_schema(raw)?
    } else if let Some(native) = &config.response_schema {
        normalize_schema(native)?
    } else {
        return Err(LlmError::JsonResponseWithoutSchema);
    };

    let name = config
        .response_schema
        .as_ref()
        .map(|s| s.title.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_RESPONSE_FORMAT_NAME);

    Ok(TextFormat::JsonSchema {
        name: name.to_owned(),
        schema,
        strict: None,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{Map, Value, json};

    use super::*;
    use crate::protocol::openai::ToolChoice;
    use crate::types::{
        FunctionCallingConfig, FunctionCallingMode, FunctionDeclaration, SafetySetting, Schema, SchemaType, Tool,
        ToolConfig,
    };

    fn user(text: &str) -> Content {
        Content::from_text(text, ROLE_USER)
    }

    fn request_with(config: GenerateContentConfig) -> LlmRequest {
        LlmRequest::new(vec![user("hi")]).with_config(config)
    }

    fn build_err(config: GenerateContentConfig) -> LlmError {
        build_request("gpt-test", &request_with(config)).unwrap_err()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn request_model_overrides_fallback() {
        let mut req = LlmRequest::new(vec![user("hi")]);
        assert_eq!(build_request("gpt-fallback", &req).unwrap().model, "gpt-fallback");

        req.model = "gpt-override".to_owned();
        assert_eq!(build_request("gpt-fallback", &req).unwrap().model, "gpt-override");
    }

    #[test]
    fn empty_contents_are_rejected() {
        let req = LlmRequest::new(vec![Content::new(ROLE_USER, Vec::new())]);
        assert!(matches!(build_request("m", &req), Err(LlmError::NoContents)));

        let blank = LlmRequest::new(vec![user("   ")]);
        assert!(matches!(build_request("m", &blank), Err(LlmError::NoContents)));
    }

    #[test]
    fn text_run_becomes_one_message_without_blank_fragments() {
        let content = Content::new(
            ROLE_MODEL,
            vec![Part::text("one"), Part::text("  "), Part::thought("two")],
        );
        let items = convert_contents(&[content]).unwrap();
        assert_eq!(
            items,
            vec![InputItem::Message {
                role: InputRole::Assistant,
                content: vec![
                    InputContent::InputText { text: "one".to_owned() },
                    InputContent::InputText { text: "two".to_owned() },
                ],
            }]
        );
    }

    #[test]
    fn function_call_flushes_text_and_correlates_response() {
        let contents = vec![
            user("weather?"),
            Content::new(
                ROLE_MODEL,
                vec![
                    Part::text("checking"),
                    Part::FunctionCall(FunctionCall::without_args("get_weather")),
                ],
            ),
            Content::new(
                ROLE_USER,
                vec![Part::FunctionResponse(FunctionResponse::new(
                    "get_weather",
                    object(json!({"temp": 21})),
                ))],
            ),
        ];

        let items = convert_contents(&contents).unwrap();
        assert_eq!(items.len(), 4);
        let InputItem::FunctionCall {
            call_id, arguments, ..
        } = &items[2]
        else {
            panic!("expected function call, got {:?}", items[2]);
        };
        assert_eq!(arguments, "{}");
        assert_eq!(
            items[3],
            InputItem::FunctionCallOutput {
                call_id: call_id.clone(),
                output: r#"{"temp":21}"#.to_owned(),
            }
        );
    }

    #[test]
    fn explicit_call_ids_match_out_of_order() {
        let mut first = FunctionCall::new("a", object(json!({"x": 1})));
        first.id = Some("call_1".to_owned());
        let mut second = FunctionCall::without_args("b");
        second.id = Some("call_2".to_owned());
        let mut resp_b = FunctionResponse::new("b", Map::new());
        resp_b.id = Some("call_2".to_owned());
        let resp_a = FunctionResponse::new("a", Map::new());

        let contents = vec![
            Content::new(ROLE_MODEL, vec![Part::FunctionCall(first), Part::FunctionCall(second)]),
            Content::new(
                ROLE_USER,
                vec![Part::FunctionResponse(resp_b), Part::FunctionResponse(resp_a)],
            ),
        ];

        let items = convert_contents(&contents).unwrap();
        let ids: Vec<&str> = items
            .iter()
            .filter_map(|item| match item {
                InputItem::FunctionCallOutput { call_id, .. } => Some(call_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, ["call_2", "call_1"]);
    }

    #[test]
    fn unknown_response_id_is_rejected() {
        let mut resp = FunctionResponse::new("a", Map::new());
        resp.id = Some("nope".to_owned());
        let err = convert_contents(&[Content::new(ROLE_USER, vec![Part::FunctionResponse(resp)])]).unwrap_err();
        assert!(matches!(err, LlmError::UnknownCallId(id) if id == "nope"));
    }

    #[test]
    fn function_call_needs_name() {
        let err = convert_contents(&[Content::new(
            ROLE_MODEL,
            vec![Part::FunctionCall(FunctionCall::without_args(""))],
        )])
        .unwrap_err();
        assert!(matches!(err, LlmError::FunctionCallMissingName));
    }

    #[test]
    fn unsupported_parts_and_roles_fail() {
        let inline = Content::new(ROLE_USER, vec![Part::InlineData(crate::types::Blob::default())]);
        assert!(matches!(
            convert_contents(&[inline]),
            Err(LlmError::UnsupportedPart("inline_data"))
        ));

        let tool = Content::from_text("hi", "tool");
        assert!(matches!(convert_contents(&[tool]), Err(LlmError::UnsupportedRole(role)) if role == "tool"));
    }

    #[test]
    fn sampling_settings_pass_through() {
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                temperature: Some(0.5),
                top_p: Some(0.25),
                max_output_tokens: 256,
                response_logprobs: true,
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        assert_eq!(out.temperature, Some(0.5));
        assert_eq!(out.top_p, Some(0.25));
        assert_eq!(out.max_output_tokens, Some(256));
        assert_eq!(out.top_logprobs, Some(1));
        assert!(out.text.is_none());
    }

    #[test]
    fn explicit_logprobs_count_is_used() {
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                response_logprobs: true,
                logprobs: Some(5),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        assert_eq!(out.top_logprobs, Some(5));
    }

    #[test]
    fn unsupported_settings_are_rejected() {
        assert!(matches!(
            build_err(GenerateContentConfig {
                top_k: Some(40.0),
                ..GenerateContentConfig::default()
            }),
            LlmError::TopKNotSupported
        ));
        assert!(matches!(
            build_err(GenerateContentConfig {
                stop_sequences: vec!["END".to_owned()],
                ..GenerateContentConfig::default()
            }),
            LlmError::StopSequencesNotSupported
        ));
        assert!(matches!(
            build_err(GenerateContentConfig {
                candidate_count: 2,
                ..GenerateContentConfig::default()
            }),
            LlmError::MultipleCandidatesNotSupported
        ));
        assert!(matches!(
            build_err(GenerateContentConfig {
                presence_penalty: Some(0.1),
                ..GenerateContentConfig::default()
            }),
            LlmError::PenaltiesNotSupported
        ));
        assert!(matches!(
            build_err(GenerateContentConfig {
                labels: Some(HashMap::new()),
                ..GenerateContentConfig::default()
            }),
            LlmError::LabelsNotSupported
        ));
        assert!(matches!(
            build_err(GenerateContentConfig {
                safety_settings: Some(vec![SafetySetting {
                    category: "HARM_CATEGORY_HATE_SPEECH".to_owned(),
                    threshold: "BLOCK_NONE".to_owned(),
                }]),
                ..GenerateContentConfig::default()
            }),
            LlmError::SafetySettingsNotSupported
        ));
    }

    #[test]
    fn top_k_is_checked_before_stop_sequences() {
        let err = build_err(GenerateContentConfig {
            top_k: Some(1.0),
            stop_sequences: vec!["x".to_owned()],
            ..GenerateContentConfig::default()
        });
        assert!(matches!(err, LlmError::TopKNotSupported));
    }

    #[test]
    fn system_instruction_is_flattened() {
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                system_instruction: Some(Content::new(
                    ROLE_SYSTEM,
                    vec![Part::text("be brief"), Part::text("be kind")],
                )),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        assert_eq!(out.instructions.as_deref(), Some("be brief\nbe kind"));

        let empty = build_request(
            "m",
            &request_with(GenerateContentConfig {
                system_instruction: Some(Content::new(ROLE_SYSTEM, Vec::new())),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        assert!(empty.instructions.is_none());
    }

    #[test]
    fn non_text_system_instruction_fails() {
        let err = build_err(GenerateContentConfig {
            system_instruction: Some(Content::new(
                ROLE_SYSTEM,
                vec![Part::FunctionCall(FunctionCall::without_args("f"))],
            )),
            ..GenerateContentConfig::default()
        });
        assert!(matches!(err, LlmError::NonTextSystemInstruction("function_call")));
    }

    #[test]
    fn mime_type_validation() {
        let err = build_err(GenerateContentConfig {
            response_mime_type: "text/x.enum".to_owned(),
            ..GenerateContentConfig::default()
        });
        assert!(matches!(err, LlmError::UnsupportedMimeType(mime) if mime == "text/x.enum"));

        let err = build_err(GenerateContentConfig {
            response_mime_type: MIME_JSON.to_owned(),
            ..GenerateContentConfig::default()
        });
        assert!(matches!(err, LlmError::JsonResponseWithoutSchema));
    }

    #[test]
    fn json_schema_prefers_raw_schema_and_uses_title() {
        let native = Schema {
            title: "Forecast".to_owned(),
            ..Schema::object([("native".to_owned(), Schema::of(SchemaType::String))])
        };
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                response_mime_type: MIME_JSON.to_owned(),
                response_schema: Some(native),
                response_json_schema: Some(json!({"type": "object", "properties": {"raw": {"type": "string"}}})),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();

        let Some(TextConfig {
            format: TextFormat::JsonSchema { name, schema, .. },
        }) = out.text
        else {
            panic!("expected json schema format");
        };
        assert_eq!(name, "Forecast");
        assert!(schema["properties"].get("raw").is_some());
    }

    #[test]
    fn json_schema_defaults_name() {
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                response_schema: Some(Schema::object([("a".to_owned(), Schema::of(SchemaType::Integer))])),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        let Some(TextConfig {
            format: TextFormat::JsonSchema { name, .. },
        }) = out.text
        else {
            panic!("expected json schema format");
        };
        assert_eq!(name, DEFAULT_RESPONSE_FORMAT_NAME);
    }

    #[test]
    fn null_raw_schema_is_empty() {
        let err = build_err(GenerateContentConfig {
            response_json_schema: Some(Value::Null),
            ..GenerateContentConfig::default()
        });
        assert!(matches!(err, LlmError::EmptyJsonSchema));
    }

    #[test]
    fn tools_and_choice_are_attached() {
        let out = build_request(
            "m",
            &request_with(GenerateContentConfig {
                tools: vec![Tool::functions(vec![FunctionDeclaration {
                    name: "lookup".to_owned(),
                    ..FunctionDeclaration::default()
                }])],
                tool_config: Some(ToolConfig {
                    function_calling_config: Some(FunctionCallingConfig {
                        mode: FunctionCallingMode::Any,
                        allowed_function_names: Vec::new(),
                    }),
                }),
                ..GenerateContentConfig::default()
            }),
        )
        .unwrap();
        assert_eq!(out.tools.len(), 1);
        assert!(matches!(out.tool_choice, Some(ToolChoice::Mode(_))));
    }

    #[test]
    fn serialized_request_omits_unset_fields() {
        let out = build_request("m", &LlmRequest::new(vec![user("hi")])).unwrap();
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "model": "m",
                "input": [{"type": "message", "role": "user", "content": [{"type": "input_text", "text": "hi"}]}]
            })
        );
    }
}
