//! Runs an analysis session, answering the model's function calls until it
//! replies with plain text or the round-trip budget is spent.
//!
//! Flow: seed session (system instruction + tools) → send trigger (+ attachment)
//!       → while the reply holds a function call: dispatch first call → send result.

use tracing::{info, warn};

use crate::counseling::assembler::AssembledPrompt;
use crate::counseling::prompts::ANALYSIS_TRIGGER;
use crate::counseling::tools::{tool_declarations, ToolCall, ToolExecutor};
use crate::llm_client::session::ChatSession;
use crate::llm_client::types::Part;
use crate::llm_client::{LanguageModel, LlmError};
use crate::scholarships::ScholarshipStore;

/// Upper bound on model round-trips per analysis, trigger message included.
pub const MAX_TOOL_TURNS: usize = 5;

#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// Text of the last model response. May be empty if the budget ran out
    /// while the model was still calling tools.
    pub text: String,
    pub round_trips: usize,
}

pub async fn run_tool_loop(
    model: &dyn LanguageModel,
    store: &ScholarshipStore,
    prompt: AssembledPrompt,
) -> Result<LoopOutcome, LlmError> {
    let mut session = ChatSession::new(model)
        .with_system_instruction(prompt.text)
        .with_tools(tool_declarations());
    let mut executor = ToolExecutor::new(store);

    let mut first_message = prompt.parts;
    first_message.push(Part::text(ANALYSIS_TRIGGER));

    let mut response = session.send(first_message).await?;
    let mut round_trips = 1;

    while round_trips < MAX_TOOL_TURNS {
        let calls = response.function_calls();
        let Some(first) = calls.first() else {
            break;
        };
        if calls.len() > 1 {
            warn!(
                "Model requested {} tool calls in one turn; only '{}' is executed",
                calls.len(),
                first.name
            );
        }

        let call = ToolCall::from(*first);
        let result = executor.execute(&call).await;

        response = session
            .send(vec![Part::function_response(call.name, result)])
            .await?;
        round_trips += 1;
    }

    if !response.function_calls().is_empty() {
        warn!("Tool loop stopped after {MAX_TOOL_TURNS} round-trips with a pending tool call");
    }
    info!(
        "Tool loop finished after {round_trips} round-trip(s), finish_reason={:?}",
        response.finish_reason()
    );

    Ok(LoopOutcome {
        text: response.text(),
        round_trips,
    })
}
