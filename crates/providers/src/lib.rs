//! Language model backends: a local Ollama server and an OpenAI-compatible
//! cloud endpoint, tried in preference order by [`router::ProviderRouter`].

pub mod ollama;
pub mod openai;
pub mod router;

pub use router::ProviderRouter;
