//! Multi-turn session over a `LanguageModel`.
//!
//! Each `send` appends the user turn, calls the model with the full history,
//! then appends the model's reply so the next turn sees it.

use crate::llm_client::types::{Content, GenerateContentRequest, GenerateContentResponse, Part, Tool};
use crate::llm_client::{LanguageModel, LlmError};

pub struct ChatSession<'a> {
    model: &'a dyn LanguageModel,
    system_instruction: Option<Content>,
    tools: Vec<Tool>,
    history: Vec<Content>,
}

impl<'a> ChatSession<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self {
            model,
            system_instruction: None,
            tools: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::system(text));
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    #[cfg(test)]
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub async fn send(&mut self, parts: Vec<Part>) -> Result<GenerateContentResponse, LlmError> {
        self.history.push(Content::user(parts));

        let request = GenerateContentRequest {
            contents: self.history.clone(),
            system_instruction: self.system_instruction.clone(),
            tools: self.tools.clone(),
        };
        let response = self.model.generate(&request).await?;

        if let Some(content) = response.first_content() {
            let mut reply = content.clone();
            reply.role.get_or_insert_with(|| "model".to_string());
            self.history.push(reply);
        }

        Ok(response)
    }
}
