//! Model gateway double shared by the unit tests here and the
//! cross-crate tests (`test-support` feature).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lawdesk_core::gateway::{ModelGateway, ModelResult};

/// Returns the same result for every prompt and records the prompts.
pub struct ScriptedGateway {
    result: ModelResult,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(result: ModelResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::new(ModelResult::none())
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::new(ModelResult::text(text))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(&self, prompt: &str) -> ModelResult {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}
