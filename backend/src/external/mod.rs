//! External API integrations

pub mod llm;
pub mod tts;
pub mod weather;

pub use llm::LlmClient;
pub use tts::TtsClient;
pub use weather::WeatherClient;
