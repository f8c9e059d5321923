use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
    pub model: &'a str,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

impl ChatResponse {
    /// Content of the first choice, if the server returned any non-empty text.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

#[derive(Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub created: Option<u64>,
    pub owned_by: Option<String>,
}

#[derive(Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_fixed_fields() {
        let messages = vec![Message::user("Hello")];
        let request = ChatRequest {
            messages: &messages,
            model: "local-model",
            temperature: 0.7,
            stream: false,
        };

        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value["model"], "local-model");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        let temperature = value["temperature"].as_f64().expect("temperature is numeric");
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn first_content_reads_first_choice_only() {
        let raw = r#"{"choices":[{"message":{"content":"Hi","role":"assistant"}},{"message":{"content":"ignored"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("valid response");
        assert_eq!(response.first_content(), Some("Hi"));
    }

    #[test]
    fn first_content_missing_for_empty_or_absent_choices() {
        let empty: ChatResponse = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(empty.first_content(), None);

        let no_message: ChatResponse =
            serde_json::from_str(r#"{"choices":[{}]}"#).expect("choice without message parses");
        assert_eq!(no_message.first_content(), None);

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#)
                .expect("blank content parses");
        assert_eq!(blank.first_content(), None);
    }

    #[test]
    fn models_response_tolerates_sparse_entries() {
        let raw = r#"{"data":[{"id":"llama-3"},{"id":"qwen","object":"model","created":1,"owned_by":"me"}]}"#;
        let models: ModelsResponse = serde_json::from_str(raw).expect("models parse");
        let ids: Vec<&str> = models.data.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["llama-3", "qwen"]);
    }
}
