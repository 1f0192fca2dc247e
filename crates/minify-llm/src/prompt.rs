//! System instruction and sampling parameters for compression requests

use std::sync::LazyLock;

use regex::Regex;

use crate::client::{ChatMessage, ChatRequest};

/// Instruction sent as the system message of every compression request
pub const SYSTEM_PROMPT: &str = r#"Your goal is to optimize the number of tokens consumed by the text provided by user minimizing loss of precision and technical details when the output text will be interpreted by LLM instead of human. Analyze the complete text and stick to the pseudo-alogithm below and return ONLY output and nothing else. The output text does not have to be readable by humans, and use every opportunity to reduce the number of tokens used in the output while keeping it understandable by machine, while sticking to the algorithm below.
compress(input)->output:
  preserve_exact={headers,titles,paths,protocols,names,identifiers,values,code,xml_tools(<*>),xml_contracts}
  preserve_semantic={structure,hierarchy,logic,relationships,content}
  remove={formatting(**,__,###),redundancy,filler,fluff,verbosity,human_markup,meta_commentary}
  apply={merge_similar,compact_syntax,implicit_structure}
  protected_patterns={headers,titles,xml_tools(<*>),</*>,xml_contracts,tool_invocations}
  effort=ultrathink
  constraint=lossless_technical,lossless_xml_contracts
  output_format=direct_start_no_preamble
  forbidden={introduction,commentary,evaluation,transition_text,acknowledgment}
  special_rule=NEVER_modify_xml_tool_syntax
  return=compressed_content_only_no_surrounding_text
"#;

/// Sampling temperature for reasoning models, which reject anything else
pub const REASONING_TEMPERATURE: f64 = 1.0;

/// Low temperature keeps rewrites stable across runs
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

static REASONING_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"o[34][\s\-:_]?").expect("valid model pattern"));

/// Whether `model` belongs to the o3/o4 reasoning family (`o4-mini`, `o3:flex`, ...)
pub fn is_reasoning_model(model: &str) -> bool {
    REASONING_MODEL.is_match(&model.to_lowercase())
}

pub fn temperature_for_model(model: &str) -> f64 {
    if is_reasoning_model(model) {
        REASONING_TEMPERATURE
    } else {
        DEFAULT_TEMPERATURE
    }
}

/// Build the chat request that asks `model` to compress `content`
pub fn compression_request(model: &str, content: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(content),
        ],
        temperature: temperature_for_model(model),
    }
}
