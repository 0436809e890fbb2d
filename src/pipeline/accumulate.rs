//! Folds streamed chat chunks into one response with the non-stream shape.

use crate::chat::types::{ChatCompletionChoice, ChatCompletionResponse};

/// Running total of a streamed chat completion.
///
/// Chunks must be applied in arrival order: text content and tool calls are
/// appended, not merged.
#[derive(Debug, Default, Clone)]
pub struct ChatCompletionAccumulator {
    response: ChatCompletionResponse,
    chunks: usize,
}

impl ChatCompletionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, chunk: &ChatCompletionResponse) {
        let out = &mut self.response;
        self.chunks += 1;

        if out.choices.is_empty() {
            out.choices.push(ChatCompletionChoice::default());
        }

        out.id.clone_from(&chunk.id);
        out.created = chunk.created;
        out.model.clone_from(&chunk.model);

        if let Some(cc) = chunk.choices.first() {
            let oc = &mut out.choices[0];
            oc.index = cc.index;
            if !cc.delta.role.is_empty() {
                oc.message.role.clone_from(&cc.delta.role);
            }
            oc.message.content.push_str(&cc.delta.content);
            oc.message
                .tool_calls
                .extend(cc.delta.tool_calls.iter().cloned());
            if !cc.finish_reason.is_empty() {
                oc.finish_reason.clone_from(&cc.finish_reason);
            }
        }

        // Zero means "not reported in this chunk".
        if chunk.usage.completion_tokens != 0 {
            out.usage.completion_tokens = chunk.usage.completion_tokens;
        }
        if chunk.usage.prompt_tokens != 0 {
            out.usage.prompt_tokens = chunk.usage.prompt_tokens;
        }
        if chunk.usage.total_tokens != 0 {
            out.usage.total_tokens = chunk.usage.total_tokens;
        }

        out.web_search.extend(chunk.web_search.iter().cloned());

        if !chunk.status.is_empty() {
            out.status.clone_from(&chunk.status);
        }
    }

    /// Number of chunks applied so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn response(&self) -> &ChatCompletionResponse {
        &self.response
    }

    pub fn finish(self) -> ChatCompletionResponse {
        self.response
    }
}
