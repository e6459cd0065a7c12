pub mod factory;
pub mod gemini;
pub mod openai;
#[cfg(test)]
pub(crate) mod scripted;

pub use factory::create_provider;
pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;
