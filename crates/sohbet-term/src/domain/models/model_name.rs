use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, EnumVariantNames};

/// Short key of a selectable backend model. The key is what gets stored on
/// assistant messages; the backend receives [`ModelName::backend_id`].
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumVariantNames,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    #[default]
    DeepSeek,
    DeepMa,
    DeepSeekV3,
    Llama,
    LlamaN,
    Gemini,
    GeminiPro,
    Qwen,
    QwenPlus,
    Mistral,
    MistralNemo,
    MistralS,
}

impl ModelName {
    pub fn parse(s: &str) -> Option<ModelName> {
        ModelName::iter().find(|e| e.to_string() == s)
    }

    pub fn backend_id(&self) -> &'static str {
        match self {
            ModelName::DeepSeek => "deepseek/deepseek-r1:free",
            ModelName::DeepMa => "deepseek/deepseek-r1-distill-llama-70b:free",
            ModelName::DeepSeekV3 => "deepseek/deepseek-chat:free",
            ModelName::Llama => "meta-llama/llama-3.3-70b-instruct:free",
            ModelName::LlamaN => "nvidia/llama-3.1-nemotron-70b-instruct:free",
            ModelName::Gemini => "gemini-2.0-flash",
            ModelName::GeminiPro => "google/gemini-2.0-pro-exp-02-05:free",
            ModelName::Qwen => "qwen/qwen2.5-vl-72b-instruct:free",
            ModelName::QwenPlus => "qwen/qwen-vl-plus:free",
            ModelName::Mistral => "mistralai/mistral-7b-instruct:free",
            ModelName::MistralNemo => "mistralai/mistral-nemo:free",
            ModelName::MistralS => "mistralai/mistral-small-24b-instruct-2501:free",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelName::DeepSeek => "DeepSeek R1",
            ModelName::DeepMa => "DeepSeek R1-L",
            ModelName::DeepSeekV3 => "DeepSeek V3",
            ModelName::Llama => "Llama 3.3",
            ModelName::LlamaN => "Llama 3.1-N",
            ModelName::Gemini => "Gemini F. 2.0",
            ModelName::GeminiPro => "Gemini Pro 2.0",
            ModelName::Qwen => "Qwen 2.5",
            ModelName::QwenPlus => "Qwen VL Plus",
            ModelName::Mistral => "Mistral 7B",
            ModelName::MistralNemo => "Mistral Nemo",
            ModelName::MistralS => "Mistral Small 3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_parse() {
        for model in ModelName::iter() {
            assert_eq!(ModelName::parse(&model.to_string()), Some(model));
        }
        assert_eq!(ModelName::DeepSeekV3.to_string(), "deepseekv3");
        assert_eq!(ModelName::parse("gpt"), None);
    }

    #[test]
    fn test_default_model() {
        assert_eq!(ModelName::default(), ModelName::DeepSeek);
        assert_eq!(ModelName::default().backend_id(), "deepseek/deepseek-r1:free");
    }
}
