//! Answer synthesis from fetched sources

use super::models::{PriorTurn, SourceRecord};
use crate::llm::{GenerationConfig, LanguageModel};
use std::sync::Arc;
use tracing::{info, warn};

/// Join sources into one labeled block, numbered from 1
pub fn combine_sources(sources: &[SourceRecord]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| format!("Source {} ({}):\n{}", i + 1, source.title(), source.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the synthesis prompt, using the follow-up template when a prior
/// turn is supplied.
pub fn build_prompt(user_query: &str, sources: &[SourceRecord], prior: Option<&PriorTurn>) -> String {
    let combined = combine_sources(sources);

    match prior {
        Some(prior) => format!(
            "This is a follow-up question to a previous conversation. Please provide a comprehensive answer that:
1. References the previous context when relevant
2. Builds upon or clarifies the previous answer
3. Addresses the new specific question asked

Previous Question: {previous}
Previous Answer Summary: {summary}...

Current Follow-up Question: {user_query}

New Information from sources:
{combined}

Please provide a detailed, accurate, and well-organized answer that:
- References the previous context when it's relevant to the follow-up question
- Synthesizes the new information from all sources
- Directly addresses the follow-up question
- Uses markdown formatting for better readability (bold, lists, headings, paragraphs)

If there are conflicting viewpoints, mention them. Cite key points when relevant.",
            previous = prior.query,
            summary = prior.summary_excerpt,
        ),
        None => format!(
            "Based on the following information gathered from multiple web sources, provide a comprehensive and well-structured answer to the user's question.

User's Question: {user_query}

Information from sources:
{combined}

Please provide a detailed, accurate, and well-organized answer that synthesizes the information from all sources. Use markdown formatting for better readability:
- Use **bold** for important terms
- Use bullet points or numbered lists for key points
- Use headings (##) for main sections if needed
- Use proper paragraphs for readability

If there are conflicting viewpoints, mention them. Cite key points when relevant. Make sure the answer directly addresses the user's question."
        ),
    }
}

/// Produces one markdown answer from the fetched sources
#[derive(Clone)]
pub struct AnswerSynthesizer {
    model: Arc<dyn LanguageModel>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Synthesize an answer. A model failure is returned as an error
    /// message in place of the answer.
    pub async fn synthesize(
        &self,
        user_query: &str,
        sources: &[SourceRecord],
        prior: Option<&PriorTurn>,
    ) -> String {
        info!("Synthesizing answer from {} sources", sources.len());

        let prompt = build_prompt(user_query, sources, prior);
        match self.model.generate(&prompt, &GenerationConfig::synthesis()).await {
            Ok(answer) => {
                info!("Answer generated");
                answer.trim().to_string()
            }
            Err(e) => {
                warn!("Error synthesizing answer: {}", e);
                format!("Error: Could not generate comprehensive answer. {}", e)
            }
        }
    }
}
