//! Oracle operations
//!
//! Four request/response exchanges with the completion service. Template
//! selection and clarification never fail; suggestion and refinement surface
//! their errors to the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::OracleError;
use super::schema;
use crate::domain::{ClarificationQuestion, PackingCategory, Provenance, RawCategory, simplify};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptContext, PromptLoader};
use crate::templates::BASELINE;

/// Upper bound on clarification questions per trip
pub const MAX_QUESTIONS: usize = 5;

const DEFAULT_MAX_TOKENS: u32 = 8192;

const SELECT_SYSTEM: &str = "You are an assistant that helps select relevant packing list templates based on a trip \
                             description. Your output must be a valid JSON array of strings.";

const SUGGEST_SYSTEM: &str = "You are an expert trip planner AI that helps users complete their packing lists by \
                              suggesting additional items based on their trip description and existing list.";

const REFINE_SYSTEM: &str = "You are a packing list editor AI. You modify a user's packing list based on their text \
                             requests and return the full, updated list in JSON format.";

const CLARIFY_SYSTEM: &str = "You are a travel assistant that asks a few short, high-value questions before a \
                              packing list is built. Your output must be a valid JSON array of question objects.";

/// Typed front for the completion service
pub struct Oracle {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl Oracle {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        debug!("Oracle::new: called");
        Self {
            llm,
            prompts,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Oracle with embedded prompts only
    pub fn with_embedded_prompts(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(llm, PromptLoader::embedded_only())
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn render(&self, name: &str, context: &PromptContext) -> Result<String, OracleError> {
        self.prompts
            .render(name, context)
            .map_err(|e| OracleError::Prompt(e.to_string()))
    }

    async fn ask(&self, system: &str, prompt: String, schema: serde_json::Value) -> Result<String, OracleError> {
        let request = CompletionRequest::structured(system, prompt, schema, self.max_tokens);
        let response = self.llm.complete(request).await.inspect_err(|e| {
            warn!(
                rate_limited = e.is_rate_limit(),
                transport = e.is_transport(),
                error = %e,
                "ask: completion failed"
            );
        })?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "ask: response received"
        );
        Ok(response.trimmed_text().to_string())
    }

    /// Pick the templates relevant to a trip
    ///
    /// Names outside `available` and repeats are dropped. Any failure, or an
    /// answer with nothing usable left, yields the baseline template alone.
    pub async fn select_relevant_templates(&self, description: &str, available: &[&str]) -> Vec<String> {
        debug!(available = available.len(), "select_relevant_templates: called");
        match self.try_select(description, available).await {
            Ok(selected) if !selected.is_empty() => {
                info!(?selected, "select_relevant_templates: selected");
                selected
            }
            Ok(_) => {
                info!("select_relevant_templates: nothing usable selected, using baseline");
                vec![BASELINE.to_string()]
            }
            Err(e) => {
                warn!(error = %e, "select_relevant_templates: failed, using baseline");
                vec![BASELINE.to_string()]
            }
        }
    }

    async fn try_select(&self, description: &str, available: &[&str]) -> Result<Vec<String>, OracleError> {
        let context = PromptContext {
            description: Some(description.to_string()),
            template_list: Some(available.join("\n")),
            baseline: Some(BASELINE.to_string()),
            ..Default::default()
        };
        let prompt = self.render("select-templates", &context)?;
        let text = self.ask(SELECT_SYSTEM, prompt, schema::string_array_schema()).await?;

        let mut selected: Vec<String> = Vec::new();
        for name in schema::parse_string_array(&text)? {
            let name = name.trim();
            if !available.contains(&name) {
                debug!(%name, "try_select: dropping unknown template");
                continue;
            }
            if !selected.iter().any(|s| s == name) {
                selected.push(name.to_string());
            }
        }
        Ok(selected)
    }

    /// Suggest items missing from the base list
    ///
    /// Every returned item is tagged oracle. An empty response means no
    /// suggestions.
    pub async fn generate_suggestions(
        &self,
        description: &str,
        base: &[RawCategory],
    ) -> Result<Vec<RawCategory>, OracleError> {
        debug!(base_categories = base.len(), "generate_suggestions: called");
        let context = PromptContext {
            description: Some(description.to_string()),
            list_json: Some(to_pretty_json(base)?),
            ..Default::default()
        };
        let prompt = self.render("suggest", &context)?;
        let text = self.ask(SUGGEST_SYSTEM, prompt, schema::packing_list_schema()).await?;

        if text.is_empty() {
            debug!("generate_suggestions: empty response, no suggestions");
            return Ok(Vec::new());
        }

        let mut suggestions = schema::parse_packing_list(&text)?;
        for item in suggestions.iter_mut().flat_map(|c| c.items.iter_mut()) {
            item.source = Provenance::Oracle;
        }

        let count: usize = suggestions.iter().map(|c| c.items.len()).sum();
        info!(categories = suggestions.len(), items = count, "generate_suggestions: received");
        Ok(suggestions)
    }

    /// Apply a free-text edit to a list; returns the entire updated list
    ///
    /// The oracle sees names and provenance only. An empty response returns the
    /// simplified current list unchanged.
    pub async fn refine_list(
        &self,
        request: &str,
        current: &[PackingCategory],
    ) -> Result<Vec<RawCategory>, OracleError> {
        debug!(%request, categories = current.len(), "refine_list: called");
        let simplified = simplify(current);
        let context = PromptContext {
            request: Some(request.to_string()),
            list_json: Some(to_pretty_json(&simplified)?),
            ..Default::default()
        };
        let prompt = self.render("refine", &context)?;
        let text = self.ask(REFINE_SYSTEM, prompt, schema::packing_list_schema()).await?;

        if text.is_empty() {
            debug!("refine_list: empty response, keeping current list");
            return Ok(simplified);
        }

        let refined = schema::parse_packing_list(&text)?;
        info!(categories = refined.len(), "refine_list: received");
        Ok(refined)
    }

    /// Ask whether a few questions would change the list
    ///
    /// Failures degrade to no questions. At most [`MAX_QUESTIONS`] are kept.
    pub async fn clarification_questions(&self, description: &str) -> Vec<ClarificationQuestion> {
        debug!("clarification_questions: called");
        match self.try_clarify(description).await {
            Ok(questions) => {
                info!(count = questions.len(), "clarification_questions: received");
                questions
            }
            Err(e) => {
                warn!(error = %e, "clarification_questions: failed, asking nothing");
                Vec::new()
            }
        }
    }

    async fn try_clarify(&self, description: &str) -> Result<Vec<ClarificationQuestion>, OracleError> {
        let context = PromptContext {
            description: Some(description.to_string()),
            max_questions: Some(MAX_QUESTIONS),
            ..Default::default()
        };
        let prompt = self.render("clarify", &context)?;
        let text = self.ask(CLARIFY_SYSTEM, prompt, schema::questions_schema()).await?;

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut questions: Vec<ClarificationQuestion> = Vec::new();
        for q in schema::parse_questions(&text)? {
            if q.question.trim().is_empty() || questions.iter().any(|seen| seen.id == q.id) {
                continue;
            }
            questions.push(q);
        }
        questions.truncate(MAX_QUESTIONS);
        Ok(questions)
    }
}

fn to_pretty_json(list: &[RawCategory]) -> Result<String, OracleError> {
    serde_json::to_string_pretty(list).map_err(|e| OracleError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PackingItem, QuestionKind, RawItem};
    use crate::llm::CannedLlmClient;
    use crate::templates;

    fn oracle(client: &Arc<CannedLlmClient>) -> Oracle {
        Oracle::with_embedded_prompts(client.clone())
    }

    #[tokio::test]
    async fn test_select_filters_unknown_and_duplicates() {
        let client = Arc::new(CannedLlmClient::new([r#"["טיול שטח", "Moon", "תמיד", "טיול שטח"]"#]));
        let names = templates::names();

        let selected = oracle(&client).select_relevant_templates("desert hike", &names).await;
        assert_eq!(selected, vec!["טיול שטח".to_string(), "תמיד".to_string()]);

        let request = &client.requests()[0];
        assert!(request.system_prompt.contains("packing list templates"));
        assert!(request.messages[0].content.contains("desert hike"));
        assert!(request.messages[0].content.contains("יאכטה"));
    }

    #[tokio::test]
    async fn test_select_falls_back_to_baseline() {
        let names = templates::names();
        let cases = ["", "not json", r#"{"a": 1}"#, r#"[1, 2]"#, "[]", r#"["Moon"]"#];
        for case in cases {
            let client = Arc::new(CannedLlmClient::new([case]));
            let selected = oracle(&client).select_relevant_templates("trip", &names).await;
            assert_eq!(selected, vec![BASELINE.to_string()], "{:?}", case);
        }

        let client = Arc::new(CannedLlmClient::new(Vec::<String>::new()));
        client.push_error("busy");
        let selected = oracle(&client).select_relevant_templates("trip", &names).await;
        assert_eq!(selected, vec![BASELINE.to_string()]);
    }

    #[tokio::test]
    async fn test_suggestions_are_tagged_oracle() {
        let client = Arc::new(CannedLlmClient::new([
            r#"[{"category": "Hiking Gear", "items": [{"name": "Headlamp", "source": "user"}]}]"#,
        ]));
        let base = vec![RawCategory::new("אישי", vec![RawItem::user("כובע")])];

        let suggestions = oracle(&client).generate_suggestions("hike", &base).await.unwrap();
        assert_eq!(suggestions[0].items[0], RawItem::oracle("Headlamp"));

        let prompt = &client.requests()[0].messages[0].content;
        assert!(prompt.contains("\"category\": \"אישי\""));
    }

    #[tokio::test]
    async fn test_suggestions_empty_response() {
        let client = Arc::new(CannedLlmClient::new([""]));
        let suggestions = oracle(&client).generate_suggestions("hike", &[]).await.unwrap();
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_invalid_output_is_error() {
        let client = Arc::new(CannedLlmClient::new([r#"{"category": "x"}"#]));
        let err = oracle(&client).generate_suggestions("hike", &[]).await.unwrap_err();
        assert!(err.is_invalid_output());
    }

    #[tokio::test]
    async fn test_suggestions_transport_error() {
        let client = Arc::new(CannedLlmClient::new(Vec::<String>::new()));
        client.push_error("busy");
        let err = oracle(&client).generate_suggestions("hike", &[]).await.unwrap_err();
        assert!(matches!(err, OracleError::Llm(_)));
    }

    #[tokio::test]
    async fn test_refine_sends_simplified_list() {
        let current = vec![PackingCategory {
            id: "cat-1".to_string(),
            name: "ציוד חיוני".to_string(),
            items: vec![PackingItem {
                id: "item-secret-id".to_string(),
                name: "אולר".to_string(),
                source: Provenance::User,
                packed: true,
            }],
        }];
        let client = Arc::new(CannedLlmClient::new([r#"[{"category": "ציוד חיוני", "items": []}]"#]));

        let refined = oracle(&client).refine_list("remove אולר", &current).await.unwrap();
        assert_eq!(refined, vec![RawCategory::new("ציוד חיוני", vec![])]);

        let prompt = &client.requests()[0].messages[0].content;
        assert!(prompt.contains("remove אולר"));
        assert!(!prompt.contains("item-secret-id"));
        assert!(!prompt.contains("packed\":"));
    }

    #[tokio::test]
    async fn test_refine_empty_response_keeps_list() {
        let current = vec![PackingCategory {
            id: "cat-1".to_string(),
            name: "A".to_string(),
            items: vec![PackingItem {
                id: "item-1".to_string(),
                name: "x".to_string(),
                source: Provenance::Oracle,
                packed: false,
            }],
        }];
        let client = Arc::new(CannedLlmClient::new([""]));

        let refined = oracle(&client).refine_list("nothing", &current).await.unwrap();
        assert_eq!(refined, simplify(&current));
    }

    #[tokio::test]
    async fn test_clarification_questions_capped_and_deduped() {
        let text = r#"[
            {"id": "q1", "question": "Driving?", "type": "yes_no"},
            {"id": "q1", "question": "Driving again?", "type": "yes_no"},
            {"id": "q2", "question": "  ", "type": "yes_no"},
            {"id": "q3", "question": "Kids?", "type": "yes_no"},
            {"id": "q4", "question": "Camping?", "type": "yes_no"},
            {"id": "q5", "question": "Flying?", "type": "yes_no"},
            {"id": "q6", "question": "Swimming?", "type": "yes_no"},
            {"id": "q7", "question": "Boat?", "type": "text"}
        ]"#;
        let client = Arc::new(CannedLlmClient::new([text]));

        let questions = oracle(&client).clarification_questions("trip").await;
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q3", "q4", "q5", "q6"]);
        assert!(questions.iter().all(|q| q.kind == QuestionKind::YesNo));
    }

    #[tokio::test]
    async fn test_clarification_failure_degrades() {
        let client = Arc::new(CannedLlmClient::new(["garbage"]));
        assert!(oracle(&client).clarification_questions("trip").await.is_empty());
    }
}
