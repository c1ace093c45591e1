pub mod config;
pub mod gemini;
pub mod openai_compatible;
pub mod traits;
pub mod yandex;

pub use config::{build_provider, ProviderConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use openai_compatible::OpenAICompatibleProvider;
pub use traits::{ChatMessage, ChatProvider, ProviderError, Role};
pub use yandex::YandexGptProvider;
