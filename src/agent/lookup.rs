//! Core lookup loop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::prompt::{build_lookup_prompt, build_system_prompt};
use super::validate::extract_profile_url;
use super::Platform;
use crate::error::AgentError;
use crate::llm::{ChatMessage, LlmClient, Role, ToolCall, ToolSchema};
use crate::tools::Tool;

/// Search results fed back to the model are cut to this many bytes.
const MAX_TOOL_OUTPUT: usize = 8_000;

/// One search performed during a lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    pub timestamp: DateTime<Utc>,
    pub tool: String,
    pub arguments: String,
    /// Tool output, or `Error: ...` when the tool failed
    pub output: String,
}

/// Outcome of a lookup: the validated URL plus the search transcript.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    pub platform: Platform,
    pub url: String,
    /// The model's final answer, verbatim
    pub answer: String,
    pub iterations: usize,
    pub invocations: Vec<ToolInvocation>,
}

/// LLM agent that resolves a full name to a profile URL with one search tool.
pub struct LookupAgent {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn Tool>,
    max_iterations: usize,
}

impl LookupAgent {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn Tool>, max_iterations: usize) -> Self {
        Self {
            llm,
            search,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Find the profile URL of `name` on `platform`.
    pub async fn find_profile_url(
        &self,
        name: &str,
        platform: Platform,
    ) -> Result<String, AgentError> {
        let run = self.run(name, platform).await?;
        match serde_json::to_string(&run) {
            Ok(transcript) => tracing::debug!(%transcript, "Lookup transcript"),
            Err(e) => tracing::warn!("Failed to encode lookup transcript: {}", e),
        }
        Ok(run.url)
    }

    /// Run the lookup loop and return the full transcript.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, name: &str, platform: Platform) -> Result<AgentRun, AgentError> {
        let mut messages = vec![
            ChatMessage::system(build_system_prompt(platform)),
            ChatMessage::user(build_lookup_prompt(name, platform)),
        ];
        let tools = [ToolSchema::function(
            platform.tool_name(),
            format!("{}. {}", platform.tool_description(), self.search.description()),
            self.search.parameters_schema(),
        )];
        let mut invocations = Vec::new();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Lookup iteration {}", iteration + 1);

            let response = self.llm.chat_completion(&messages, Some(&tools[..]), 0.0).await?;

            if let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content,
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    let output = self.execute_tool_call(tool_call, platform).await;
                    tracing::debug!(
                        tool = %tool_call.function.name,
                        backend = self.search.name(),
                        args = %tool_call.function.arguments,
                        "Search returned {} bytes",
                        output.len()
                    );

                    messages.push(ChatMessage::tool_result(&tool_call.id, output.clone()));
                    invocations.push(ToolInvocation {
                        timestamp: Utc::now(),
                        tool: tool_call.function.name.clone(),
                        arguments: tool_call.function.arguments.clone(),
                        output,
                    });
                }

                continue;
            }

            // No tool calls - this is the final answer
            let answer = response
                .content
                .filter(|c| !c.trim().is_empty())
                .ok_or(AgentError::NoFinalAnswer {
                    iterations: iteration + 1,
                })?;

            let url = extract_profile_url(&answer, platform)?;
            tracing::info!(%url, searches = invocations.len(), "Resolved profile URL");

            return Ok(AgentRun {
                platform,
                url,
                answer,
                iterations: iteration + 1,
                invocations,
            });
        }

        Err(AgentError::NoFinalAnswer {
            iterations: self.max_iterations,
        })
    }

    /// Run a single tool call. Failures are reported back to the model as text.
    async fn execute_tool_call(&self, tool_call: &ToolCall, platform: Platform) -> String {
        if tool_call.function.name != platform.tool_name() {
            return format!(
                "Error: unknown tool '{}'. The only available tool is '{}'.",
                tool_call.function.name,
                platform.tool_name()
            );
        }

        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        match self.search.execute(args).await {
            Ok(output) => truncate_output(output, MAX_TOOL_OUTPUT),
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn truncate_output(mut s: String, max_len: usize) -> String {
    if s.len() <= max_len {
        return s;
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s.push_str("... [truncated]");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{ChatResponse, FunctionCall};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request.
    struct ScriptedLlm {
        responses: Mutex<VecDeque<ChatResponse>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
        advertised: Mutex<Vec<ToolSchema>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<ChatResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                advertised: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            messages: &[ChatMessage],
            tools: Option<&[ToolSchema]>,
            _temperature: f32,
        ) -> Result<ChatResponse, LlmError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.advertised
                .lock()
                .unwrap()
                .extend(tools.unwrap_or_default().iter().cloned());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Decode("script exhausted".to_string()))
        }
    }

    struct FakeSearch {
        calls: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl Tool for FakeSearch {
        fn name(&self) -> &str {
            "web_search"
        }

        fn description(&self) -> &str {
            "fake search"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(args);
            Ok("**Elon Musk (@elonmusk) / X**\nURL: https://x.com/elonmusk".to_string())
        }
    }

    fn search_call(platform: Platform, query: &str) -> ChatResponse {
        ChatResponse {
            content: Some("I should search for the profile.".to_string()),
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                kind: "function".to_string(),
                function: FunctionCall {
                    name: platform.tool_name().to_string(),
                    arguments: json!({ "query": query }).to_string(),
                },
            }]),
        }
    }

    fn answer(text: &str) -> ChatResponse {
        ChatResponse {
            content: Some(text.to_string()),
            tool_calls: None,
        }
    }

    fn agent(
        llm: Arc<ScriptedLlm>,
        search: Arc<FakeSearch>,
        max_iterations: usize,
    ) -> LookupAgent {
        LookupAgent::new(llm, search, max_iterations)
    }

    fn fake_search() -> Arc<FakeSearch> {
        Arc::new(FakeSearch {
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn elon_musk_twitter_lookup_searches_then_answers() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            search_call(Platform::Twitter, "Elon Musk twitter"),
            answer("https://x.com/elonmusk"),
        ]));
        let search = fake_search();

        let run = agent(llm.clone(), search.clone(), 5)
            .run("Elon Musk", Platform::Twitter)
            .await
            .expect("lookup succeeds");

        assert_eq!(run.url, "https://x.com/elonmusk");
        assert_eq!(run.iterations, 2);
        assert_eq!(run.invocations.len(), 1);
        assert_eq!(search.calls.lock().unwrap()[0]["query"], "Elon Musk twitter");

        // The search output is fed back to the model under the call id.
        let requests = llm.requests.lock().unwrap();
        let tool_turn = requests[1].last().expect("tool message");
        assert_eq!(tool_turn.role, Role::Tool);
        assert_eq!(tool_turn.tool_call_id.as_deref(), Some("call_1"));
        assert!(requests[0][1]
            .content
            .as_deref()
            .unwrap_or_default()
            .contains("given the full name Elon Musk"));

        let advertised = llm.advertised.lock().unwrap();
        assert_eq!(advertised[0].function.name, "crawl_google_for_twitter_profile_page");
        assert!(advertised[0].function.description.ends_with("fake search"));
    }

    #[tokio::test]
    async fn transcript_serializes_with_timestamps() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            search_call(Platform::Twitter, "Elon Musk twitter"),
            answer("Here it is: https://x.com/elonmusk."),
        ]));
        let run = agent(llm, fake_search(), 5)
            .run("Elon Musk", Platform::Twitter)
            .await
            .expect("lookup succeeds");

        let json = serde_json::to_value(&run).expect("encode");
        assert_eq!(json["url"], "https://x.com/elonmusk");
        assert_eq!(json["answer"], "Here it is: https://x.com/elonmusk.");
        assert_eq!(json["invocations"][0]["tool"], "crawl_google_for_twitter_profile_page");
        assert!(json["invocations"][0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn find_profile_url_returns_only_the_url() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            search_call(Platform::LinkedIn, "Eden Marco LinkedIn"),
            answer("https://www.linkedin.com/in/eden-marco/"),
        ]));
        let url = agent(llm, fake_search(), 5)
            .find_profile_url("Eden Marco", Platform::LinkedIn)
            .await
            .expect("url");
        assert_eq!(url, "https://www.linkedin.com/in/eden-marco/");
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_model() {
        let mut bogus = search_call(Platform::LinkedIn, "x");
        if let Some(calls) = bogus.tool_calls.as_mut() {
            calls[0].function.name = "run_command".to_string();
        }
        let llm = Arc::new(ScriptedLlm::new(vec![
            bogus,
            answer("https://linkedin.com/in/eden-marco"),
        ]));
        let search = fake_search();

        let run = agent(llm, search.clone(), 5)
            .run("Eden Marco", Platform::LinkedIn)
            .await
            .expect("lookup succeeds");

        assert!(search.calls.lock().unwrap().is_empty());
        assert!(run.invocations[0].output.starts_with("Error: unknown tool"));
    }

    #[tokio::test]
    async fn invalid_answer_is_rejected() {
        let llm = Arc::new(ScriptedLlm::new(vec![answer("I'm not sure who that is.")]));
        let err = agent(llm, fake_search(), 5)
            .find_profile_url("Nobody", Platform::LinkedIn)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn iteration_budget_is_enforced() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            search_call(Platform::Twitter, "a"),
            search_call(Platform::Twitter, "b"),
            answer("https://twitter.com/elonmusk"),
        ]));
        let err = agent(llm, fake_search(), 2)
            .find_profile_url("Elon Musk", Platform::Twitter)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::NoFinalAnswer { iterations: 2 }));
    }

    #[tokio::test]
    async fn llm_failure_surfaces_as_agent_error() {
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let err = agent(llm, fake_search(), 3)
            .find_profile_url("Elon Musk", Platform::Twitter)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }

    #[test]
    fn truncates_on_char_boundary() {
        let out = truncate_output("héllo".to_string(), 2);
        assert_eq!(out, "h... [truncated]");
        assert_eq!(truncate_output("short".to_string(), 10), "short");
    }
}
