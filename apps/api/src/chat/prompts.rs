// Prompt constants for the generation branch.

/// Persona used when no system prompt file is available.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Asha, an AI assistant for the JobsForHer Foundation. \
    Your purpose is to help women advance in their careers by providing information about job listings, \
    community events, mentorship programs, and addressing questions about women's career advancement. \
    Focus on being supportive, empowering, and helpful while avoiding gender bias.";

/// Sampling for the generation call. Fixed; not exposed to callers.
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Returned whenever the pipeline fails after the query was accepted.
pub const DEGRADED_RESPONSE: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again.";

/// Final user turn: the query annotated with the retrieved context.
pub fn annotate_query(query: &str, context: &str) -> String {
    format!("{query}\n\nContext from JobsForHer database:\n{context}")
}
