//! Local tools the model may call during an analysis session.
//!
//! The set is closed: `ToolName` lists every tool and `ToolExecutor::execute`
//! is the single dispatch table. Calls naming anything else are answered with
//! an explicit error payload instead of being silently dropped.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::llm_client::types::{FunctionCall, FunctionDeclaration, Tool};
use crate::scholarships::{filter, ScholarshipQuery, ScholarshipRecord, ScholarshipStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    GetScholarships,
}

impl ToolName {
    pub const ALL: [ToolName; 1] = [ToolName::GetScholarships];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetScholarships => "get_scholarships",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    fn declaration(self) -> FunctionDeclaration {
        match self {
            ToolName::GetScholarships => FunctionDeclaration {
                name: self.as_str().to_string(),
                description: "Look up real scholarships the student is eligible for, \
                    filtered by citizenship and optionally by target country or name."
                    .to_string(),
                parameters: json!({
                    "type": "OBJECT",
                    "properties": {
                        "citizenship": {
                            "type": "STRING",
                            "description": "Student's citizenship, e.g. Azerbaijan"
                        },
                        "target_country": {
                            "type": "STRING",
                            "description": "Country the student wants to study in, or EU for any European country"
                        },
                        "name": {
                            "type": "STRING",
                            "description": "Optional part of a scholarship name"
                        }
                    },
                    "required": ["citizenship"]
                }),
            },
        }
    }
}

/// Tool declarations sent with every analysis request.
pub fn tool_declarations() -> Vec<Tool> {
    vec![Tool {
        function_declarations: ToolName::ALL.iter().map(|t| t.declaration()).collect(),
    }]
}

/// A function call requested by the model, with arguments flattened to strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: HashMap<String, String>,
}

impl From<&FunctionCall> for ToolCall {
    fn from(call: &FunctionCall) -> Self {
        let args = call
            .args
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.clone(), text))
            })
            .collect();
        Self {
            name: call.name.clone(),
            args,
        }
    }
}

/// Executes tool calls for one request. Scholarship data is read from disk
/// on the first call and reused for the rest of the request.
pub struct ToolExecutor<'a> {
    store: &'a ScholarshipStore,
    scholarships: Option<Vec<ScholarshipRecord>>,
}

impl<'a> ToolExecutor<'a> {
    pub fn new(store: &'a ScholarshipStore) -> Self {
        Self {
            store,
            scholarships: None,
        }
    }

    pub async fn execute(&mut self, call: &ToolCall) -> Value {
        match ToolName::parse(&call.name) {
            Some(ToolName::GetScholarships) => self.get_scholarships(call).await,
            None => {
                warn!("Model requested unknown tool '{}'", call.name);
                json!({ "error": format!("Unknown tool: {}", call.name) })
            }
        }
    }

    async fn get_scholarships(&mut self, call: &ToolCall) -> Value {
        let query = ScholarshipQuery {
            citizenship: call.args.get("citizenship").cloned().unwrap_or_default(),
            country: call.args.get("target_country").cloned(),
            name: call.args.get("name").cloned(),
        };

        if self.scholarships.is_none() {
            self.scholarships = Some(self.store.load_or_empty().await);
        }
        let records = self.scholarships.as_deref().unwrap_or_default();
        let matches = filter(records, &query);

        info!(
            "get_scholarships(citizenship={:?}, country={:?}) -> {} result(s)",
            query.citizenship,
            query.country,
            matches.len()
        );

        json!({
            "scholarships": matches,
            "count": matches.len(),
        })
    }
}
