use serde::{Deserialize, Serialize};

use super::fallback::{normalize, Classification, ClassifierError};

pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const SYSTEM_PROMPT: &str = r#"You are a zero-shot text classifier for an email assistant.
You receive a piece of text and a list of candidate labels. Choose exactly one label from the list that best describes the text, and estimate how confident you are as a probability between 0 and 1.
Never invent a label that is not in the list. Respond with a JSON object only, in the form {"label": "<candidate>", "score": 0.87}"#;

pub fn build_request(model: String, text: &str, candidates: &[&str]) -> ChatCompletionRequest {
    let prompt = format!(
        "Candidate labels: {}\n\nText:\n{}",
        candidates.join(", "),
        text
    );
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: SYSTEM_PROMPT.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: prompt,
            },
        ],
        temperature: 0.0,
        top_p: 1.0,
        max_tokens: 64,
        response_format: ResponseFormat {
            r#type: "json_object".into(),
        },
    }
}

pub fn parse_completion(
    completion: ChatCompletionResponse,
    candidates: &[&str],
) -> Result<Classification, ClassifierError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|msg| msg.content)
        .ok_or_else(|| ClassifierError::Malformed("response had no message content".into()))?;

    let answer: LabelAnswer = serde_json::from_str(content.trim())
        .map_err(|err| ClassifierError::Malformed(format!("{err}: {content}")))?;
    normalize(&answer.label, answer.score, candidates)
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: i32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelAnswer {
    label: String,
    score: f64,
}
