mod locale;
mod openai;
mod prompts;
pub mod structured;
mod traits;

pub use locale::Lang;
pub use openai::{OpenAiNarrator, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompts::{NarrativePrompts, ProfileSummary};
pub use structured::{NarrativeMetric, StructuredNarrative, StructuredParseError};
pub use traits::{NarrativeError, NarrativeKind, NarrativeMode, NarrativeRequest, NarrativeRequester};
