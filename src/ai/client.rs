use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ClassifierConfig;

use super::{
    fallback::{Classification, ClassifierError, FallbackClassifier},
    inference::{build_request, parse_completion, ChatCompletionResponse, CHAT_COMPLETIONS_PATH},
};

#[derive(Clone)]
pub struct ChatClassifier {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    timeout: std::time::Duration,
}

impl ChatClassifier {
    pub fn from_config(http: Client, config: &ClassifierConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let endpoint = match config.base_url.join(CHAT_COMPLETIONS_PATH) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(
                    target: "classifier",
                    error = %err,
                    base_url = %config.base_url,
                    "cannot build chat completions url; fallback classifier disabled"
                );
                return None;
            }
        };
        Some(Self {
            http,
            endpoint,
            api_key,
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl FallbackClassifier for ChatClassifier {
    async fn classify(
        &self,
        text: &str,
        candidates: &[&str],
    ) -> Result<Classification, ClassifierError> {
        let request = build_request(self.model.clone(), text, candidates);
        let completion: ChatCompletionResponse = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let classification = parse_completion(completion, candidates)?;
        tracing::debug!(
            target: "classifier",
            label = %classification.label,
            score = classification.score,
            "fallback classification"
        );
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn config(base: &str, api_key: Option<&str>) -> ClassifierConfig {
        ClassifierConfig {
            api_key: api_key.map(str::to_string),
            base_url: Url::parse(&format!("{base}/v1/")).unwrap(),
            model: "test-model".into(),
            timeout: Duration::from_secs(5),
            spam_max_chars: 500,
        }
    }

    #[test]
    fn missing_key_disables_classifier() {
        let config = config("http://localhost", None);
        assert!(ChatClassifier::from_config(Client::new(), &config).is_none());
    }

    #[tokio::test]
    async fn posts_prompt_and_parses_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{\"label\": \"Spam\", \"score\": 0.93}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let classifier =
            ChatClassifier::from_config(Client::new(), &config(&server.uri(), Some("secret")))
                .unwrap();
        let result = classifier
            .classify("cheap pills", &["spam", "legitimate"])
            .await
            .unwrap();

        assert_eq!(result.label, "spam");
        assert!((result.score - 0.93).abs() < 1e-6);
    }

    #[tokio::test]
    async fn http_errors_surface_as_transport_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let classifier =
            ChatClassifier::from_config(Client::new(), &config(&server.uri(), Some("secret")))
                .unwrap();
        let err = classifier.classify("hello", &["spam"]).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Transport(_)));
    }
}
