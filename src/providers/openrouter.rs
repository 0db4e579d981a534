//! Question generation through an OpenRouter chat completion.

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ContentItem;

use super::{ProviderError, QuestionGenerator};

const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
const TEMPERATURE: f32 = 0.6;

const SYSTEM_PROMPT: &str = r#"You are PIXEL, a trivia host for pop culture.
Generate exactly 3 levels (Beginner, Intermediate, Master).
Each level must contain 3 multiple-choice questions.
Respond as JSON with shape:
{
  "levels": [
    {"id": "beginner", "questions": [
      {"question": "...", "options": ["A", "B", "C", "D"], "answer": "A"}
    ]}
  ]
}
Facts must only use the given title data."#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(http: Client, api_key: String, model: String) -> Self {
        Self { http, api_key, model }
    }
}

fn user_prompt(content: &ContentItem) -> String {
    format!(
        "Title: {}\nMedia Type: {}\nYear: {}\nGenres: {}\nOverview: {}\nUse the details to craft lore-accurate questions.",
        content.title,
        content.media_type.as_str(),
        content.year,
        content.genre,
        content.overview
    )
}

/// The outermost `{...}` span of a model reply, if any.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

impl QuestionGenerator for OpenRouterClient {
    async fn generate(&self, content: &ContentItem) -> Result<Value, ProviderError> {
        let prompt = user_prompt(content);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(OPENROUTER_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status("OpenRouter", response.status()));
        }

        let data: ChatResponse = response.json().await?;
        let reply = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Malformed("OpenRouter returned empty content".to_string()))?;

        let json = extract_json_object(&reply)
            .ok_or_else(|| ProviderError::Malformed("Could not parse quiz JSON".to_string()))?;
        debug!("OpenRouter reply for {:?}: {} bytes of JSON", content.title, json.len());
        serde_json::from_str(json).map_err(|e| ProviderError::Malformed(format!("Could not parse quiz JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentSource, MediaType};

    #[test]
    fn test_extract_json_object() {
        let reply = "Sure! Here you go:\n```json\n{\"levels\": [{\"id\": \"beginner\"}]}\n```";
        assert_eq!(extract_json_object(reply), Some("{\"levels\": [{\"id\": \"beginner\"}]}"));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_user_prompt_mentions_metadata() {
        let content = ContentItem {
            id: "1".to_string(),
            title: "Portal".to_string(),
            year: "2007".to_string(),
            poster: String::new(),
            overview: "Test chambers.".to_string(),
            genre: "Puzzle".to_string(),
            media_type: MediaType::Game,
            source: ContentSource::Rawg,
            sub_type: None,
        };
        let prompt = user_prompt(&content);
        assert!(prompt.contains("Title: Portal"));
        assert!(prompt.contains("Media Type: game"));
        assert!(prompt.contains("Overview: Test chambers."));
    }
}
