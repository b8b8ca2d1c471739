//! Prompt templates for insight requests.

use umwelt_core::types::InsightSnapshot;

/// A prompt template for LLM requests.
pub trait PromptTemplate {
    /// Generate the prompt text.
    fn generate(&self) -> String;

    /// Get the system prompt (if any).
    fn system_prompt(&self) -> Option<String> {
        None
    }
}

/// The analytical questions asked with every snapshot.
pub const INSIGHT_QUESTIONS: [&str; 4] = [
    "How does this sampling rate shape what the organism can perceive of fast motion?",
    "What does an integration window of this length smooth away, and what does it preserve?",
    "How does the attention bias trade recent detail against longer context?",
    "What does the transparency index say about how closely the internal model tracks reality?",
];

/// Prompt describing one perceptual configuration.
#[derive(Debug, Clone)]
pub struct InsightPrompt {
    /// Parameters captured at trigger time.
    pub snapshot: InsightSnapshot,
}

impl InsightPrompt {
    pub fn new(snapshot: InsightSnapshot) -> Self {
        Self { snapshot }
    }
}

impl PromptTemplate for InsightPrompt {
    fn system_prompt(&self) -> Option<String> {
        Some(
            "You are a perceptual ecologist explaining an organism's Umwelt, the slice of \
             reality its senses let it experience. Answer in plain prose, a few short \
             paragraphs, no lists or headings."
                .to_string(),
        )
    }

    fn generate(&self) -> String {
        let s = &self.snapshot;
        let questions = INSIGHT_QUESTIONS
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"A simulated agent perceives a moving target with the following parameters:

- Species: {species}
- Sampling rate: {rate:.0} Hz
- Integration window: {window} samples
- Attention bias: {bias:.2}
- Transparency index: {transparency:.1} / 100

Please address:
{questions}"#,
            species = s.species,
            rate = s.sampling_rate_hz,
            window = s.integration_window,
            bias = s.attention_bias,
            transparency = s.transparency,
        )
    }
}
