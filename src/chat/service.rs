use serde_json::{Map, Value};

use crate::batch::{BatchSupport, BATCH_ENDPOINT_V4_CHAT_COMPLETIONS};
use crate::chat::types::ChatCompletionResponse;
use crate::client::Client;
use crate::pipeline;
use crate::transport::HttpRequest;
use crate::types::{ChatCompletionMeta, ChatCompletionTool, ChatMessage};
use crate::utils::BodyBuilder;
use crate::{Error, Result};

/// Per-chunk callback for streamed completions.
///
/// Runs inline on the read loop; returning an error stops the stream and
/// fails the call with [`Error::Handler`].
pub type ChatCompletionStreamHandler =
    Box<dyn FnMut(&ChatCompletionResponse) -> anyhow::Result<()> + Send>;

/// `POST chat/completions`
///
/// Setting a stream handler switches the call to streaming mode; the
/// returned response is then the fold of every chunk.
pub struct ChatCompletionService {
    client: Client,
    model: String,
    request_id: Option<String>,
    do_sample: Option<bool>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    max_tokens: Option<u32>,
    stop: Vec<String>,
    tool_choice: Option<String>,
    user_id: Option<String>,
    meta: Option<ChatCompletionMeta>,
    messages: Vec<ChatMessage>,
    tools: Vec<ChatCompletionTool>,
    stream_handler: Option<ChatCompletionStreamHandler>,
}

impl ChatCompletionService {
    pub(crate) fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            request_id: None,
            do_sample: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop: Vec::new(),
            tool_choice: None,
            user_id: None,
            meta: None,
            messages: Vec::new(),
            tools: Vec::new(),
            stream_handler: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn do_sample(mut self, do_sample: bool) -> Self {
        self.do_sample = Some(do_sample);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    /// e.g. [`crate::types::tool::TOOL_CHOICE_AUTO`].
    pub fn tool_choice(mut self, tool_choice: impl Into<String>) -> Self {
        self.tool_choice = Some(tool_choice.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn meta(mut self, meta: ChatCompletionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Append a message; the model sees messages in the order they were added.
    pub fn add_message(mut self, message: impl Into<ChatMessage>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn add_messages<I>(mut self, messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ChatMessage>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    pub fn add_tool(mut self, tool: impl Into<ChatCompletionTool>) -> Self {
        self.tools.push(tool.into());
        self
    }

    /// Stream the completion, calling `handler` with every chunk.
    pub fn on_chunk<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&ChatCompletionResponse) -> anyhow::Result<()> + Send + 'static,
    {
        self.stream_handler = Some(Box::new(handler));
        self
    }

    pub fn is_stream(&self) -> bool {
        self.stream_handler.is_some()
    }

    fn build_body(&self) -> Result<Map<String, Value>> {
        BodyBuilder::new()
            .required("model", &self.model)
            .required("messages", &self.messages)
            .optional("request_id", self.request_id.as_ref())
            .optional("do_sample", self.do_sample.as_ref())
            .optional("temperature", self.temperature.as_ref())
            .optional("top_p", self.top_p.as_ref())
            .optional("max_tokens", self.max_tokens.as_ref())
            .non_empty("stop", &self.stop)
            .non_empty("tools", &self.tools)
            .optional("tool_choice", self.tool_choice.as_ref())
            .optional("user_id", self.user_id.as_ref())
            .optional("meta", self.meta.as_ref())
            .build()
    }

    pub async fn execute(self) -> Result<ChatCompletionResponse> {
        let mut body = self.build_body()?;

        let Some(mut handler) = self.stream_handler else {
            return self
                .client
                .send_json(HttpRequest::post("chat/completions").json(body))
                .await;
        };

        body.insert("stream".to_string(), Value::Bool(true));
        let bytes = self
            .client
            .send_raw(HttpRequest::post("chat/completions").json(body), true)
            .await?;

        pipeline::reduce_stream(bytes, |chunk| handler(chunk).map_err(Error::Handler)).await
    }
}

impl BatchSupport for ChatCompletionService {
    fn batch_url(&self) -> &str {
        BATCH_ENDPOINT_V4_CHAT_COMPLETIONS
    }

    fn batch_body(&self) -> Result<Map<String, Value>> {
        self.build_body()
    }
}
