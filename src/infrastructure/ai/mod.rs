mod mock_ai_client;
mod openai_client;

pub use mock_ai_client::MockAiClient;
pub use openai_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenAiClient};
