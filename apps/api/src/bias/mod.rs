// Bias gate: classifies incoming queries for gender bias and produces the
// counter-narrative shown on the empowerment path.
// The semantic classifier goes through llm_client; the lexical rules and the
// empowerment table are plain lookup data and never call out.

pub mod classifier;
pub mod empowerment;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rules;
