/// LLM collaborator port (§9 "LLM as pure function"): `(prompt) -> text`.
/// Out of scope per §1 — a binary wires this up to whatever provider it
/// uses; tests substitute a deterministic stub.
pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

#[cfg(test)]
pub mod fixtures {
    use super::LlmClient;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic stub: always returns a fixed string, counts calls.
    pub struct StubLlmClient {
        pub response: String,
        pub calls: AtomicUsize,
    }

    impl StubLlmClient {
        pub fn new(response: impl Into<String>) -> Self {
            Self { response: response.into(), calls: AtomicUsize::new(0) }
        }
    }

    impl LlmClient for StubLlmClient {
        fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Always fails, to exercise the retry/backoff terminal-failure path.
    pub struct FailingLlmClient;

    impl LlmClient for FailingLlmClient {
        fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("llm unavailable")
        }
    }
}
