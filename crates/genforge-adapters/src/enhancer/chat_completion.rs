//! OpenAI-compatible chat completion enhancer.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use genforge_core::{
    application::{ApplicationError, ports::Enhancer},
    domain::{GenerationContext, TaskSuggestion, TemplateSuggestion},
    error::{GenforgeError, GenforgeResult},
};

/// Sampling parameters for requirement-driven template enhancement.
const ARCHITECTURE_TEMPERATURE: f32 = 0.3;
const ARCHITECTURE_MAX_TOKENS: u32 = 2048;

/// Sampling parameters for per-task code generation.
const CODE_TEMPERATURE: f32 = 0.2;
const CODE_MAX_TOKENS: u32 = 1024;

/// Connection settings for [`ChatCompletionEnhancer`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancerSettings {
    /// e.g. `https://api.openai.com/v1` or `http://localhost:11434/v1`
    pub base_url: String,
    /// Empty means no `Authorization` header.
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    /// Replaces the per-call sampling temperature when set.
    pub temperature: Option<f32>,
}

impl Default for EnhancerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".into(),
            api_key: String::new(),
            model: "llama3.1".into(),
            timeout: Duration::from_secs(60),
            temperature: None,
        }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Enhancer ─────────────────────────────────────────────────────────────────

/// Asks a chat model for template additions.
///
/// Every failure (transport, HTTP status, unparseable answer) comes back as
/// [`ApplicationError::Enhancement`]; the orchestrator treats it as "no
/// suggestion".
pub struct ChatCompletionEnhancer {
    client: reqwest::blocking::Client,
    settings: EnhancerSettings,
}

impl ChatCompletionEnhancer {
    pub fn new(settings: EnhancerSettings) -> GenforgeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| enhancement_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &EnhancerSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> GenforgeResult<String> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature.unwrap_or(temperature),
            max_tokens,
        };

        let mut req = self.client.post(self.endpoint()).json(&body);
        if !self.settings.api_key.is_empty() {
            req = req.bearer_auth(&self.settings.api_key);
        }

        let resp = req
            .send()
            .map_err(|e| enhancement_error(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(enhancement_error(format!("HTTP {status}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| enhancement_error(format!("invalid response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| enhancement_error("response has no content".to_string()))
    }
}

impl Enhancer for ChatCompletionEnhancer {
    #[instrument(skip_all, fields(model = %self.settings.model, project = %context.project_name()))]
    fn enhance_template(
        &self,
        context: &GenerationContext,
        requirements: &str,
    ) -> GenforgeResult<TemplateSuggestion> {
        let content = self.chat(
            template_prompt(context, requirements),
            ARCHITECTURE_TEMPERATURE,
            ARCHITECTURE_MAX_TOKENS,
        )?;
        debug!(chars = content.len(), "received template suggestion");
        parse_answer(&content)
    }

    #[instrument(skip_all, fields(model = %self.settings.model, task = %task))]
    fn enhance_with_task(
        &self,
        context: &GenerationContext,
        task: &str,
    ) -> GenforgeResult<TaskSuggestion> {
        let content = self.chat(task_prompt(context, task), CODE_TEMPERATURE, CODE_MAX_TOKENS)?;
        debug!(chars = content.len(), "received task suggestion");
        parse_answer(&content)
    }
}

// ── Prompts ──────────────────────────────────────────────────────────────────

fn stack_json(context: &GenerationContext) -> String {
    let stack: BTreeMap<&str, &Vec<String>> = context
        .constraints()
        .tech_stack()
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    serde_json::to_string_pretty(&stack).unwrap_or_else(|_| "{}".into())
}

fn template_prompt(context: &GenerationContext, requirements: &str) -> Vec<ChatMessage> {
    let c = context.constraints();
    let platforms: Vec<&str> = c.platforms().iter().map(|p| p.as_str()).collect();

    vec![
        ChatMessage {
            role: "system",
            content: format!(
                "You are an expert software architect. Analyze the requirements and suggest \
                 enhancements to the project template.\n\n\
                 Project Type: {}\nPlatforms: {}\nTech Stack: {}\n\n\
                 Respond with JSON only, shaped as \
                 {{\"files\":[{{\"path\":\"...\",\"content\":\"...\"}}],\
                 \"dependencies\":[{{\"name\":\"...\",\"version\":\"...\"}}],\
                 \"commands\":[{{\"command\":\"...\",\"description\":\"...\"}}]}}. \
                 Paths are relative to the project root.",
                c.archetype(),
                platforms.join(", "),
                stack_json(context),
            ),
        },
        ChatMessage {
            role: "user",
            content: format!(
                "Project: {}\nRequirements: {requirements}\n\n\
                 Please suggest specific enhancements to make this project production-ready \
                 and aligned with the requirements.",
                context.project_name()
            ),
        },
    ]
}

fn task_prompt(context: &GenerationContext, task: &str) -> Vec<ChatMessage> {
    let archetype = context.constraints().archetype();
    vec![
        ChatMessage {
            role: "system",
            content: format!(
                "You are an expert developer. Generate code to enhance the project with: {task}\n\n\
                 Project: {}\nType: {archetype}\nTech Stack: {}\n\n\
                 Provide specific code files and their content.",
                context.project_name(),
                stack_json(context),
            ),
        },
        ChatMessage {
            role: "user",
            content: format!(
                "Please implement {task} for this {archetype} project.\n\n\
                 Provide the code as JSON with this format:\n\
                 {{\n  \"files\": [\n    {{\n      \"path\": \"relative/path/to/file.ts\",\n      \
                 \"content\": \"file content here\"\n    }}\n  ]\n}}"
            ),
        },
    ]
}

// ── Answer parsing ───────────────────────────────────────────────────────────

/// Pull the JSON object out of a model answer.
///
/// A Markdown code fence is stripped only when it opens before the first
/// `{`; fences inside file contents are left alone. The result is the
/// outermost `{ ... }` span.
pub fn extract_json(answer: &str) -> Option<&str> {
    let mut body = answer.trim();

    let first_brace = body.find('{')?;
    if let Some(start) = body[..first_brace].find("```") {
        let after = &body[start + 3..];
        // Skip the info string (`json`, `JSON`, ...) up to the newline.
        let after = after.find('\n').map_or(after, |nl| &after[nl + 1..]);
        body = after.rfind("```").map_or(after, |end| &after[..end]);
    }

    let open = body.find('{')?;
    let close = body.rfind('}')?;
    (open < close).then(|| &body[open..=close])
}

fn parse_answer<T: DeserializeOwned>(answer: &str) -> GenforgeResult<T> {
    let json = extract_json(answer).ok_or_else(|| {
        warn!("answer contains no JSON object");
        enhancement_error("answer contains no JSON object".to_string())
    })?;
    serde_json::from_str(json)
        .map_err(|e| enhancement_error(format!("answer is not valid suggestion JSON: {e}")))
}

fn enhancement_error(reason: String) -> GenforgeError {
    ApplicationError::Enhancement { reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genforge_core::domain::{
        Archetype, GenerationTemplate, Platform, ProjectConstraints, StackCategory, TemplateFile,
        TemplateId,
    };

    fn ctx() -> GenerationContext {
        let c = ProjectConstraints::builder(Archetype::new("nextjs-web").unwrap())
            .platform(Platform::Web)
            .stack(StackCategory::Frontend, &["Next.js"])
            .build();
        let t = GenerationTemplate::builder()
            .id(TemplateId::new("n").unwrap())
            .name("n")
            .constraints(c.clone())
            .file(TemplateFile::literal("a", "a"))
            .build()
            .unwrap();
        GenerationContext::new("shop", "/out/shop", c, t)
    }

    #[test]
    fn extracts_json_from_fenced_answer() {
        let answer = "Sure! Here you go:\n```json\n{\"files\": []}\n```\nEnjoy.";
        assert_eq!(extract_json(answer), Some("{\"files\": []}"));
    }

    #[test]
    fn extracts_outermost_object_from_prose() {
        let answer = "Result: {\"files\": [{\"path\": \"a\", \"content\": \"{}\"}]} done";
        assert_eq!(
            extract_json(answer),
            Some("{\"files\": [{\"path\": \"a\", \"content\": \"{}\"}]}")
        );
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn parses_template_suggestion() {
        let answer = r#"```
{"files":[{"path":"src/auth.ts","content":"export {}"}],
 "dependencies":["zod", {"name":"next-auth","version":"^4"}],
 "commands":[{"command":"npx prisma generate"}]}
```"#;
        let s: TemplateSuggestion = parse_answer(answer).unwrap();
        assert_eq!(s.files.len(), 1);
        assert_eq!(s.dependencies.len(), 2);
        assert_eq!(s.commands[0].command, "npx prisma generate");
    }

    #[test]
    fn garbage_answer_is_an_enhancement_error() {
        let err = parse_answer::<TaskSuggestion>("I cannot help with that").unwrap_err();
        assert!(matches!(
            err,
            GenforgeError::Application(ApplicationError::Enhancement { .. })
        ));
        assert!(err.to_string().contains("Enhancement failed"));
    }

    #[test]
    fn fence_inside_file_content_is_kept() {
        let answer = r#"{"files":[{"path":"README.md","content":"Install:\n```sh\nnpm i\n```\n"}]}"#;
        assert_eq!(extract_json(answer), Some(answer));

        let s: TaskSuggestion = parse_answer(answer).unwrap();
        assert_eq!(s.files[0].content, "Install:\n```sh\nnpm i\n```\n");
    }

    #[test]
    fn fenced_answer_with_inner_fence_keeps_whole_object() {
        let inner = r#"{"files":[{"path":"README.md","content":"```sh\nnpm i\n```"}]}"#;
        let answer = format!("Here it is:\n```json\n{inner}\n```\nThanks.");
        assert_eq!(extract_json(&answer), Some(inner));
    }

    #[test]
    fn prompts_carry_project_context() {
        let msgs = template_prompt(&ctx(), "add auth");
        assert!(msgs[0].content.contains("Project Type: nextjs-web"));
        assert!(msgs[0].content.contains("Platforms: web"));
        assert!(msgs[0].content.contains("Next.js"));
        assert!(msgs[1].content.contains("Project: shop"));
        assert!(msgs[1].content.contains("Requirements: add auth"));

        let task = task_prompt(&ctx(), "Add documentation");
        assert!(task[1].content.contains("Please implement Add documentation"));
    }

    #[test]
    fn unreachable_endpoint_fails_cleanly() {
        let enhancer = ChatCompletionEnhancer::new(EnhancerSettings {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let err = enhancer.enhance_template(&ctx(), "anything").unwrap_err();
        assert!(matches!(
            err,
            GenforgeError::Application(ApplicationError::Enhancement { .. })
        ));
    }
}
