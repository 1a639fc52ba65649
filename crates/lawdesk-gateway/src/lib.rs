mod ollama;

pub use ollama::{parse_body, OllamaGateway, UpstreamFailure};
