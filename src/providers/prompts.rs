//! Task prompt templates and coarse language detection.
//!
//! Prompts ask for the transformed text only, no explanations — the result
//! is injected straight into the candidate list, so any prose around it
//! would be committed verbatim.

use serde::{Deserialize, Serialize};

/// Detected script of a text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
    Mixed,
    Unknown,
}

/// Classify a fragment by the scripts it contains.
pub fn detect_language(text: &str) -> Language {
    let has_chinese = text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c));
    let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());
    match (has_chinese, has_latin) {
        (true, true) => Language::Mixed,
        (true, false) => Language::Zh,
        (false, true) => Language::En,
        (false, false) => Language::Unknown,
    }
}

/// Translation direction for [`translation_prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ZhToEn,
    EnToZh,
}

/// Grammar/spelling/punctuation correction prompt.
///
/// The instruction language follows the detected text language so the
/// model answers in kind.
pub fn correction_prompt(text: &str) -> String {
    match detect_language(text) {
        Language::Zh | Language::Mixed => {
            format!("请纠正以下文本中的语法、拼写或标点错误。只返回纠正后的文本，不需要解释：\n\n{text}")
        }
        _ => format!(
            "Correct any grammar, spelling, or punctuation errors in the following text. \
             Only return the corrected text, no explanations:\n\n{text}"
        ),
    }
}

pub fn translation_prompt(text: &str, direction: Direction) -> String {
    let (from, to) = match direction {
        Direction::ZhToEn => ("Chinese", "English"),
        Direction::EnToZh => ("English", "Chinese"),
    };
    format!("Translate the following text from {from} to {to}. Only return the translated text:\n\n{text}")
}

pub fn expansion_prompt(text: &str, ratio: f32) -> String {
    format!(
        "Expand the following text by approximately {ratio}x, maintaining the original \
         meaning and style. Only return the expanded text:\n\n{text}"
    )
}
