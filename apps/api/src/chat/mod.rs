// Conversation pipeline: bias gate, context composition, generation, and the
// per-session transcript.
// The orchestrator is the only component that sees every stage; it never
// returns an error to its caller.

pub mod composer;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod orchestrator;
pub mod prompts;
