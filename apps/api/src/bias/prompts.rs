// Prompt constants for the semantic bias classifier.

/// System message for the classification call. The reply is parsed as JSON.
pub const CLASSIFIER_SYSTEM: &str = "You review job-search questions for gender bias. \
    Reply with a single JSON object and nothing else: \
    no markdown fences, no commentary.";

/// Bias classification prompt. Replace `{query}` before sending.
pub const BIAS_PROMPT_TEMPLATE: &str = r#"Analyze the following query for potential gender bias:

"{query}"

Respond with a JSON object with exactly these fields:
- has_bias: boolean (true if bias is detected, false otherwise)
- bias_type: string (capability_bias, stereotype_bias, role_bias, comparative_bias, role_limitation_bias, or null)
- severity: string (high, medium, low, or null)
- explanation: brief explanation of the bias if detected, otherwise null
- reframed_query: a bias-free version of the query that preserves the user's information need

Only respond with valid JSON."#;
