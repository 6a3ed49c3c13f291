//! AI enhancement pipeline: prompt → provider (with backoff) → parsed result.
//!
//! Every operation returns an `ActionResult`. Validation failures never reach the provider,
//! and no provider error escapes to the caller.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info};

use crate::enhance::prompts::{
    fill, join_skills, rewrite_prompt, EXPERIENCE_TEMPLATE, JOB_MATCH_TEMPLATE,
    PROJECT_TEMPLATE, SKILL_SUGGESTION_TEMPLATE, SUMMARY_TEMPLATE,
};
use crate::llm_client::json_extract::{parse_json_block, JsonShape};
use crate::llm_client::retry::{with_retry, RetryPolicy, RetryableError};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::matching::normalize_skill;

pub const EMPTY_TEXT_MESSAGE: &str = "Please provide some text to enhance";
pub const EMPTY_JOB_TITLE_MESSAGE: &str = "Please provide a job title";
pub const EMPTY_JOB_DESCRIPTION_MESSAGE: &str = "Please provide a job description";
pub const BUSY_MESSAGE: &str = "AI service is currently busy. Please wait a moment and try again.";
pub const ENHANCE_FAILED_MESSAGE: &str = "Failed to enhance text. Please try again.";
pub const SUGGESTIONS_FAILED_MESSAGE: &str =
    "Failed to generate skill suggestions. Please try again.";
pub const SUGGESTIONS_PARSE_MESSAGE: &str = "Failed to parse skill suggestions";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze job match. Please try again.";
pub const ANALYSIS_PARSE_MESSAGE: &str = "Failed to analyze job match";

/// Caller-facing result: serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResult<T> {
    Data(T),
    Error(String),
}

impl<T> ActionResult<T> {
    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error(message.into())
    }
}

/// Which resume section a piece of text comes from. Picks the rewrite template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementKind {
    #[default]
    Experience,
    Summary,
    Project,
}

impl EnhancementKind {
    fn template(self) -> &'static str {
        match self {
            EnhancementKind::Experience => EXPERIENCE_TEMPLATE,
            EnhancementKind::Summary => SUMMARY_TEMPLATE,
            EnhancementKind::Project => PROJECT_TEMPLATE,
        }
    }
}

/// Model's assessment of a candidate against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchAnalysis {
    /// 0 – 100, clamped and rounded from whatever number the model sent.
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u32,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("matchScore must be a finite number"));
    }
    Ok(raw.clamp(0.0, 100.0).round() as u32)
}

/// Holds the provider and its backoff policy. Cheap to clone; shared through `AppState`.
#[derive(Clone)]
pub struct AiEnhancer {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl AiEnhancer {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self { generator, retry }
    }

    /// Rewrites a resume snippet in the voice appropriate for its section.
    pub async fn enhance_description(
        &self,
        text: &str,
        kind: EnhancementKind,
    ) -> ActionResult<String> {
        if text.trim().is_empty() {
            return ActionResult::error(EMPTY_TEXT_MESSAGE);
        }

        let prompt = rewrite_prompt(kind.template(), text);
        match self.complete(prompt).await {
            Ok(reply) => ActionResult::Data(reply),
            Err(e) => ActionResult::error(failure_message(&e, ENHANCE_FAILED_MESSAGE)),
        }
    }

    /// Skills worth adding for `job_title`, minus those the candidate already lists.
    pub async fn generate_skill_suggestions(
        &self,
        job_title: &str,
        current_skills: &[String],
    ) -> ActionResult<Vec<String>> {
        if job_title.trim().is_empty() {
            return ActionResult::error(EMPTY_JOB_TITLE_MESSAGE);
        }

        let current = join_skills(current_skills, "none listed");
        let prompt = fill(
            SKILL_SUGGESTION_TEMPLATE,
            &[("job_title", job_title), ("current_skills", &current)],
        );

        let reply = match self.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => return ActionResult::error(failure_message(&e, SUGGESTIONS_FAILED_MESSAGE)),
        };

        let Some(suggestions) = parse_json_block::<Vec<String>>(&reply, JsonShape::Array) else {
            error!("Could not parse skill suggestions from reply: {reply}");
            return ActionResult::error(SUGGESTIONS_PARSE_MESSAGE);
        };

        let owned: Vec<String> = current_skills.iter().map(|s| normalize_skill(s)).collect();
        let fresh: Vec<String> = suggestions
            .into_iter()
            .filter(|s| !owned.contains(&normalize_skill(s)))
            .collect();

        info!("Suggested {} new skills for '{}'", fresh.len(), job_title);
        ActionResult::Data(fresh)
    }

    /// Asks the model to compare the candidate's skills with a job description.
    pub async fn analyze_job_match(
        &self,
        user_skills: &[String],
        job_description: &str,
        job_title: &str,
    ) -> ActionResult<JobMatchAnalysis> {
        if job_description.trim().is_empty() {
            return ActionResult::error(EMPTY_JOB_DESCRIPTION_MESSAGE);
        }

        let skills = join_skills(user_skills, "None listed");
        let prompt = fill(
            JOB_MATCH_TEMPLATE,
            &[
                ("job_title", job_title),
                ("job_description", job_description),
                ("user_skills", &skills),
            ],
        );

        let reply = match self.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => return ActionResult::error(failure_message(&e, ANALYSIS_FAILED_MESSAGE)),
        };

        match parse_json_block::<JobMatchAnalysis>(&reply, JsonShape::Object) {
            Some(analysis) => ActionResult::Data(analysis),
            None => {
                error!("Could not parse job match analysis from reply: {reply}");
                ActionResult::error(ANALYSIS_PARSE_MESSAGE)
            }
        }
    }

    /// One logical provider call: retried on rate limits, reply trimmed.
    async fn complete(&self, prompt: String) -> Result<String, LlmError> {
        let request = GenerationRequest::new(prompt);
        let reply = with_retry(&self.retry, || self.generator.generate(&request)).await?;
        Ok(reply.trim().to_string())
    }
}

fn failure_message(err: &LlmError, fallback: &str) -> String {
    error!("Text generation failed: {err}");
    if err.is_rate_limited() {
        BUSY_MESSAGE.to_string()
    } else {
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted replies and records every prompt it receives.
    #[derive(Default)]
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().unwrap().prompt.clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn ok(text: &str) -> Result<String, LlmError> {
        Ok(text.to_string())
    }

    fn api_error(status: u16) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status,
            message: "provider said no".to_string(),
        })
    }

    fn enhancer(generator: Arc<ScriptedGenerator>) -> AiEnhancer {
        AiEnhancer::new(generator, RetryPolicy::new(3, 2000))
    }

    fn skills(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_calling_provider() {
        let generator = ScriptedGenerator::new(vec![]);
        let result = enhancer(generator.clone())
            .enhance_description("   \n", EnhancementKind::Experience)
            .await;

        assert_eq!(result, ActionResult::error("Please provide some text to enhance"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_enhance_returns_trimmed_reply() {
        let generator = ScriptedGenerator::new(vec![ok("\n  Led migration of 12 services.  \n")]);
        let result = enhancer(generator.clone())
            .enhance_description("did migration stuff", EnhancementKind::Experience)
            .await;

        assert_eq!(result, ActionResult::Data("Led migration of 12 services.".to_string()));
        let request = generator.prompts.lock().unwrap()[0].clone();
        assert_eq!(request.model, crate::llm_client::MODEL);
        assert!(request.prompt.contains("did migration stuff"));
        assert!(request.prompt.contains("job experience"));
    }

    #[tokio::test]
    async fn test_each_kind_uses_its_own_template() {
        let generator = ScriptedGenerator::new(vec![ok("a"), ok("b")]);
        let ai = enhancer(generator.clone());

        ai.enhance_description("my summary", EnhancementKind::Summary).await;
        assert!(generator.last_prompt().contains("professional summary"));

        ai.enhance_description("my project", EnhancementKind::Project).await;
        assert!(generator.last_prompt().contains("project description"));
        assert!(!generator.last_prompt().contains("{rule}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success_is_transparent() {
        let generator = ScriptedGenerator::new(vec![api_error(429), api_error(429), ok("Better text")]);
        let result = enhancer(generator.clone())
            .enhance_description("text", EnhancementKind::Summary)
            .await;

        assert_eq!(result, ActionResult::Data("Better text".to_string()));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_rate_limit_reports_busy() {
        let generator = ScriptedGenerator::new(vec![api_error(429), api_error(429), api_error(429)]);
        let result = enhancer(generator.clone())
            .enhance_description("text", EnhancementKind::Experience)
            .await;

        assert_eq!(result, ActionResult::error(BUSY_MESSAGE));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_other_provider_error_is_generic_and_not_retried() {
        let generator = ScriptedGenerator::new(vec![api_error(503), ok("never reached")]);
        let result = enhancer(generator.clone())
            .enhance_description("text", EnhancementKind::Experience)
            .await;

        assert_eq!(result, ActionResult::error(ENHANCE_FAILED_MESSAGE));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_job_title_is_rejected() {
        let generator = ScriptedGenerator::new(vec![]);
        let result = enhancer(generator.clone())
            .generate_skill_suggestions(" ", &[])
            .await;

        assert_eq!(result, ActionResult::error(EMPTY_JOB_TITLE_MESSAGE));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_suggestions_drop_skills_already_owned() {
        let reply = "Here you go:\n[\"Rust\", \"Kubernetes\", \"communication\", \"SQL\"]";
        let generator = ScriptedGenerator::new(vec![ok(reply)]);
        let result = enhancer(generator.clone())
            .generate_skill_suggestions("Backend Engineer", &skills(&["rust", " Communication "]))
            .await;

        assert_eq!(result, ActionResult::Data(skills(&["Kubernetes", "SQL"])));
        let prompt = generator.last_prompt();
        assert!(prompt.contains("\"Backend Engineer\""));
        assert!(prompt.contains("rust,  Communication "));
    }

    #[tokio::test]
    async fn test_suggestions_prompt_mentions_no_skills() {
        let generator = ScriptedGenerator::new(vec![ok("[]")]);
        let result = enhancer(generator.clone())
            .generate_skill_suggestions("Designer", &[])
            .await;

        assert_eq!(result, ActionResult::Data(vec![]));
        assert!(generator.last_prompt().contains("none listed"));
    }

    #[tokio::test]
    async fn test_suggestions_without_array_fail_to_parse() {
        let generator = ScriptedGenerator::new(vec![ok("I would suggest learning Rust.")]);
        let result = enhancer(generator)
            .generate_skill_suggestions("Engineer", &[])
            .await;

        assert_eq!(result, ActionResult::error(SUGGESTIONS_PARSE_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_busy_after_rate_limits() {
        let generator = ScriptedGenerator::new(vec![api_error(429), api_error(429), api_error(429)]);
        let result = enhancer(generator)
            .generate_skill_suggestions("Engineer", &[])
            .await;

        assert_eq!(result, ActionResult::error(BUSY_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let generator = ScriptedGenerator::new(vec![]);
        let result = enhancer(generator.clone())
            .analyze_job_match(&skills(&["Rust"]), "", "Engineer")
            .await;

        assert_eq!(result, ActionResult::error(EMPTY_JOB_DESCRIPTION_MESSAGE));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_analysis_parses_first_object() {
        let reply = r#"```json
{
  "matchScore": 72.6,
  "matchedSkills": ["Rust"],
  "missingSkills": ["Kafka"],
  "recommendation": "Solid fit; brush up on Kafka."
}
```"#;
        let generator = ScriptedGenerator::new(vec![ok(reply)]);
        let result = enhancer(generator.clone())
            .analyze_job_match(&skills(&["Rust", "Go"]), "Build streaming systems", "Engineer")
            .await;

        assert_eq!(
            result,
            ActionResult::Data(JobMatchAnalysis {
                match_score: 73,
                matched_skills: skills(&["Rust"]),
                missing_skills: skills(&["Kafka"]),
                recommendation: "Solid fit; brush up on Kafka.".to_string(),
            })
        );
        let prompt = generator.last_prompt();
        assert!(prompt.contains("Job Title: Engineer"));
        assert!(prompt.contains("Candidate Skills: Rust, Go"));
    }

    #[tokio::test]
    async fn test_braces_in_user_input_are_sent_verbatim() {
        let generator = ScriptedGenerator::new(vec![ok(r#"{"matchScore": 50}"#)]);
        enhancer(generator.clone())
            .analyze_job_match(
                &skills(&["SECRET_SKILL"]),
                "Use {user_skills} daily",
                "Title {job_description}",
            )
            .await;

        let prompt = generator.last_prompt();
        assert!(prompt.contains("Job Title: Title {job_description}\n"));
        assert!(prompt.contains("Job Description: Use {user_skills} daily\n"));
        assert!(prompt.contains("Candidate Skills: SECRET_SKILL"));
        assert_eq!(prompt.matches("SECRET_SKILL").count(), 1);
    }

    #[tokio::test]
    async fn test_job_title_braces_do_not_pull_in_skills() {
        let generator = ScriptedGenerator::new(vec![ok("[]")]);
        enhancer(generator.clone())
            .generate_skill_suggestions("Lead {current_skills}", &skills(&["Go"]))
            .await;

        let prompt = generator.last_prompt();
        assert!(prompt.contains("\"Lead {current_skills}\""));
        assert!(prompt.contains("already lists these skills: Go."));
    }

    #[tokio::test]
    async fn test_analysis_clamps_out_of_range_score() {
        let generator = ScriptedGenerator::new(vec![ok(r#"{"matchScore": 140}"#)]);
        let result = enhancer(generator)
            .analyze_job_match(&[], "desc", "title")
            .await;

        match result {
            ActionResult::Data(analysis) => {
                assert_eq!(analysis.match_score, 100);
                assert!(analysis.matched_skills.is_empty());
            }
            other => panic!("expected data, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_analysis_without_object_fails_to_parse() {
        let generator = ScriptedGenerator::new(vec![ok("Looks like a good match overall!")]);
        let result = enhancer(generator)
            .analyze_job_match(&[], "desc", "title")
            .await;

        assert_eq!(result, ActionResult::error(ANALYSIS_PARSE_MESSAGE));
    }

    #[tokio::test]
    async fn test_analysis_generic_failure_message() {
        let generator = ScriptedGenerator::new(vec![api_error(401)]);
        let result = enhancer(generator)
            .analyze_job_match(&[], "desc", "title")
            .await;

        assert_eq!(result, ActionResult::error(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn test_action_result_wire_shape() {
        let data = serde_json::to_value(ActionResult::Data(vec!["Rust"])).unwrap();
        assert_eq!(data, serde_json::json!({"data": ["Rust"]}));
        let error = serde_json::to_value(ActionResult::<()>::error("nope")).unwrap();
        assert_eq!(error, serde_json::json!({"error": "nope"}));
    }

    #[test]
    fn test_enhancement_kind_defaults_to_experience() {
        assert_eq!(EnhancementKind::default(), EnhancementKind::Experience);
        let kind: EnhancementKind = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(kind, EnhancementKind::Project);
    }
}
