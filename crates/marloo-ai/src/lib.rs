//! Grounded-answer orchestration around the record store and a token-generation
//! collaborator: package assembly, grounding context, streaming, safety gating.

pub mod answer;
pub mod generate;
pub mod package;
pub mod prompt;

#[cfg(feature = "openai")]
mod openai;
#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;

pub use answer::{AnswerEngine, AnswerError, AnswerEvent, AnswerOutcome, Verdict};
pub use generate::{GenerateError, Generator, TokenStream};
pub use package::{KbPackage, fetch_package};
pub use prompt::{MAX_CITATIONS, build_system_context, extract_citations};
