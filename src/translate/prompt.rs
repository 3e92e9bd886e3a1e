// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::TranslateError;
use crate::model::TranslationData;

/// Output shape: language label, then camelCase key, then translated text.
pub type TranslationOutput = BTreeMap<String, BTreeMap<String, String>>;

pub fn build_translation_prompt(source_text: &str, languages: &[String]) -> String {
    let mut prompt = String::from(
        "You translate user-interface text for software internationalization.\n\
         Split the source text into short, self-contained strings. For each string, \
         generate a concise camelCase i18n key that describes its meaning, and translate \
         the string into every target language.\n",
    );
    prompt.push_str("Target languages:\n");
    for language in languages {
        prompt.push_str("- ");
        prompt.push_str(language);
        prompt.push('\n');
    }
    prompt.push_str(
        "Answer with a single JSON object only. Its top-level keys are the target language \
         names exactly as listed; each maps the generated keys to the translated strings. \
         Use the same keys for every language.\n",
    );
    prompt.push_str("Source text:\n");
    prompt.push_str(source_text.trim());
    prompt.push('\n');
    prompt
}

/// JSON schema constraining provider output to [`TranslationOutput`].
pub fn translation_output_schema() -> Value {
    schemars::schema_for!(TranslationOutput).to_value()
}

fn code_fence() -> Result<&'static Regex, TranslateError> {
    static CODE_FENCE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    CODE_FENCE
        .get_or_init(|| {
            RegexBuilder::new(r"^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$")
                .dot_matches_new_line(true)
                .build()
        })
        .as_ref()
        .map_err(|err| TranslateError::MalformedOutput {
            message: err.to_string(),
        })
}

/// Accepts a JSON object, optionally wrapped in a Markdown code fence.
pub fn parse_text_output(text: &str) -> Result<TranslationData, TranslateError> {
    let fence = code_fence()?;
    let body = match fence.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    };

    serde_json::from_str(body.trim()).map_err(|err| TranslateError::MalformedOutput {
        message: err.to_string(),
    })
}

pub fn parse_structured_output(value: Value) -> Result<TranslationData, TranslateError> {
    serde_json::from_value(value).map_err(|err| TranslateError::MalformedOutput {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fence_is_compiled_once() {
        let first = code_fence().unwrap();
        let second = code_fence().unwrap();
        assert!(std::ptr::eq(first, second));

        let parsed = parse_text_output("```json\n{\"English\": {\"hi\": \"Hi\"}}\n```").unwrap();
        assert_eq!(parsed["English"]["hi"], "Hi");
        let parsed = parse_text_output("```\n{\"German\": {\"hi\": \"Hallo\"}}\n```").unwrap();
        assert_eq!(parsed["German"]["hi"], "Hallo");
    }
}
