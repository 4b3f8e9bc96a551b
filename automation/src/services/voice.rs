// Voice collaborator. Not wired into any workflow action kind yet; the
// interface exists so a future action can reach it through the same
// dispatch pattern as messaging and email.

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("invalid callee number: {0}")]
    InvalidCallee(String),
}

#[async_trait]
pub trait VoiceCaller: Send + Sync {
    /// Place an outbound call and return the provider call id.
    async fn place_call(&self, to: &str, script: &str) -> Result<String, VoiceError>;
}

/// Stubbed outbound voice service: simulates the provider call and returns
/// a mock call id.
#[derive(Debug, Clone, Default)]
pub struct VoiceService;

#[async_trait]
impl VoiceCaller for VoiceService {
    async fn place_call(&self, to: &str, script: &str) -> Result<String, VoiceError> {
        if !to.starts_with('+') || to.len() < 9 {
            return Err(VoiceError::InvalidCallee(to.to_string()));
        }

        info!("Placing call to {} ({} chars of script)", to, script.len());

        // Simulated provider call
        sleep(Duration::from_millis(500)).await;

        let call_id = format!("CA{}", Uuid::new_v4().simple());
        info!("Call initiated: {}", call_id);
        Ok(call_id)
    }
}
