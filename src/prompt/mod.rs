//! Prompt assembly for the two generation tasks.
//!
//! Every prompt is a pure function of fixed text (task instruction, essay
//! prompt, rubric, output-shape template) plus the retrieved reference
//! record(s) and the candidate essay. The shape template is the only
//! schema mechanism the model sees: an example object with the exact keys
//! the result must contain.

use serde_json::{json, Value};

use crate::constants::{CLEAN_MAX_TOKENS, FEEDBACK_MAX_TOKENS, SCORE_MAX_TOKENS};
use crate::corpus::EssayRecord;

/// The writing prompt the reference corpus was scored against.
pub const ESSAY_PROMPT: &str = "Write about patience. Being patient means that you are \
understanding and tolerant. A patient person experiences difficulties without complaining. \
Do only one of the following: write a story about a time when you were patient OR write a \
story about a time when someone you know was patient OR write a story in your own way \
about patience.";

/// The fixed four-trait rubric (0-3 scale, Ideas doubled).
pub const RUBRIC: &str = r#"Rating on the following four traits (0-3 scale):

**Ideas** (points doubled)
- Score 3: Tells a story with ideas that are clearly focused on the topic and are thoroughly developed with specific, relevant details.
- Score 2: Tells a story with ideas that are somewhat focused on the topic and are developed with a mix of specific and/or general details.
- Score 1: Tells a story with ideas that are minimally focused on the topic and developed with limited and/or general details.
- Score 0: Ideas are not focused on the task and/or are undeveloped.

**Organization**
- Score 3: Organization and connections between ideas and/or events are clear and logically sequenced.
- Score 2: Organization and connections between ideas and/or events are logically sequenced.
- Score 1: Organization and connections between ideas and/or events are weak.
- Score 0: No organization evident.

**Style**
- Score 3: Command of language, including effective and compelling word choice and varied sentence structure, clearly supports the writer's purpose and audience.
- Score 2: Adequate command of language, including effective word choice and clear sentences, supports the writer's purpose and audience.
- Score 1: Limited use of language, including lack of variety in word choice and sentences, may hinder support for the writer's purpose and audience.
- Score 0: Ineffective use of language for the writer's purpose and audience.

**Conventions**
- Score 3: Consistent, appropriate use of conventions of Standard English for grammar, usage, spelling, capitalization, and punctuation for the grade level.
- Score 2: Adequate use of conventions of Standard English for grammar, usage, spelling, capitalization, and punctuation for the grade level.
- Score 1: Limited use of conventions of Standard English for grammar, usage, spelling, capitalization, and punctuation for the grade level.
- Score 0: Ineffective use of conventions of Standard English for grammar, usage, spelling, capitalization, and punctuation.

**Adjudication Rules:**
- Scores summed independently for Rater_1 and Rater_2.
- Resolved Score = Rater_1 + Rater_2.
"#;

const SCORE_INSTRUCTION: &str = "You are an AI essay scorer. Your task is to evaluate the \
input essay based on the provided essay prompt, reference essays, and their scores. Use the \
reference essay and its scores as a guide for your evaluation. Provide scores for each trait \
along with a final score. Return your score strictly in the JSON format specified in the \
scoring format.";

const FEEDBACK_INSTRUCTION: &str = "You are an AI essay reviewer. Your task is to provide \
feedback for the input essay based on the provided essay prompt, rubrics, and reference \
essays. Use the reference essay as a guide for your evaluation. Give feedback for each trait \
(Ideas, Organization, Style, and Conventions) without scores. Focus on evaluating how well \
the input essay adheres to the rubrics. Return your feedback strictly in JSON format, based \
on the feedback format.";

const CLEAN_INSTRUCTION: &str = "Remove any jargonous symbols from the following essay if \
any, but do not correct any other mistakes. Return the essay with no other changes.";

/// Example score object whose keys every [`ScoreResult`](crate::pipeline::ScoreResult)
/// must match.
pub fn score_template() -> Value {
    json!({
        "rater1_domain1": 7.0,
        "rater2_domain1": 8.0,
        "domain1_score": 15.0,
        "rater1_trait1": 1.0,
        "rater1_trait2": 2.0,
        "rater1_trait3": 2.0,
        "rater1_trait4": 2.0,
        "rater2_trait1": 2.0,
        "rater2_trait2": 2.0,
        "rater2_trait3": 2.0,
        "rater2_trait4": 2.0
    })
}

/// Example feedback object whose keys every
/// [`FeedbackResult`](crate::pipeline::FeedbackResult) must match.
pub fn feedback_template() -> Value {
    json!({
        "Ideas": "feedback",
        "Organization": "feedback",
        "Style": "feedback",
        "Conventions": "feedback"
    })
}

/// A generation task's fixed decoding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskBudget {
    /// Completion token budget.
    pub max_tokens: u32,
}

/// Budget for the scoring task.
pub const SCORE_BUDGET: TaskBudget = TaskBudget {
    max_tokens: SCORE_MAX_TOKENS,
};

/// Budget for the feedback task.
pub const FEEDBACK_BUDGET: TaskBudget = TaskBudget {
    max_tokens: FEEDBACK_MAX_TOKENS,
};

/// Budget for the essay-cleaning task.
pub const CLEAN_BUDGET: TaskBudget = TaskBudget {
    max_tokens: CLEAN_MAX_TOKENS,
};

fn render_references(references: &[&EssayRecord]) -> String {
    let values: Vec<&serde_json::Map<String, Value>> =
        references.iter().map(|r| r.columns()).collect();
    serde_json::to_string_pretty(&values).unwrap_or_else(|_| "[]".to_string())
}

/// Builds the scoring prompt.
pub fn score_prompt(references: &[&EssayRecord], essay: &str) -> String {
    format!(
        "{SCORE_INSTRUCTION}\n\n\
         Essay Prompt: {ESSAY_PROMPT}\n\n\
         Rubrics: {RUBRIC}\n\n\
         Reference Essays: {references}\n\n\
         Scoring Format: {template}\n\n\
         Input Essay: {essay}\n\n\
         Please provide your scoring in the specified JSON format.",
        references = render_references(references),
        template = score_template(),
    )
}

/// Builds the feedback prompt. The essay must already be cleaned.
pub fn feedback_prompt(references: &[&EssayRecord], cleaned_essay: &str) -> String {
    format!(
        "{FEEDBACK_INSTRUCTION}\n\n\
         Essay Prompt: {ESSAY_PROMPT}\n\n\
         Rubrics: {RUBRIC}\n\n\
         Reference Essays: {references}\n\n\
         Feedback Format: {template}\n\n\
         Input Essay: {cleaned_essay}\n\n\
         Please provide your feedback in the specified JSON format.",
        references = render_references(references),
        template = feedback_template(),
    )
}

/// Builds the essay-cleaning prompt.
pub fn clean_prompt(essay: &str) -> String {
    format!(
        "{CLEAN_INSTRUCTION}\n\n\
         Input Essay: {essay}\n\n\
         Return the cleaned essay only with no extra description."
    )
}

/// Builds the repair prompt: asks the model to fix its own malformed
/// output into the template's shape.
pub fn repair_prompt(raw_output: &str, template: &Value) -> String {
    format!(
        "Your previous response was not valid JSON matching the required format.\n\n\
         Required Format: {template}\n\n\
         Previous Response: {raw_output}\n\n\
         Return only a corrected JSON object with exactly the keys of the required format \
         and no other text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> EssayRecord {
        let value = json!({ "essay": "a patient story", "domain1_score": 15.0 });
        match value {
            Value::Object(map) => EssayRecord::from(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn score_prompt_embeds_essay_references_and_template_keys() {
        let r = reference();
        let prompt = score_prompt(&[&r], "my essay text");

        assert!(prompt.contains("my essay text"));
        assert!(prompt.contains("a patient story"));
        assert!(prompt.contains("rater1_domain1"));
        assert!(prompt.contains("rater2_trait4"));
        assert!(prompt.contains(ESSAY_PROMPT));
    }

    #[test]
    fn feedback_prompt_requests_traits_without_scores() {
        let r = reference();
        let prompt = feedback_prompt(&[&r], "cleaned essay");

        assert!(prompt.contains("without scores"));
        for trait_name in ["Ideas", "Organization", "Style", "Conventions"] {
            assert!(prompt.contains(trait_name), "missing {trait_name}");
        }
        assert!(prompt.contains("cleaned essay"));
    }

    #[test]
    fn clean_prompt_preserves_essay_verbatim() {
        let prompt = clean_prompt("essay with \u{1}odd\u{2} symbols");
        assert!(prompt.contains("essay with \u{1}odd\u{2} symbols"));
        assert!(prompt.contains("no extra description"));
    }

    #[test]
    fn repair_prompt_carries_raw_output_and_template() {
        let prompt = repair_prompt("{not json", &feedback_template());
        assert!(prompt.contains("{not json"));
        assert!(prompt.contains("Organization"));
    }

    #[test]
    fn templates_are_flat_objects() {
        assert!(score_template().as_object().is_some_and(|o| o.len() == 11));
        assert!(feedback_template().as_object().is_some_and(|o| o.len() == 4));
    }
}
