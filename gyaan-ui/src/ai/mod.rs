//! AI service boundary: transcription, diagnosis, chat assistant
//!
//! Capability traits with two implementations each: a real network client
//! (reqwest against the analysis backend) and a canned-fixture client.
//! The `Fallback` wrapper degrades any transport failure to the canned
//! response - a demo affordance, not a retry policy. Failures are logged
//! to the diagnostic console only and stay invisible to the caller.

pub mod canned;
pub mod http;

use async_trait::async_trait;
use gyaan_common::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

pub use canned::CannedAiClient;
pub use http::HttpAiClient;

/// Result of transcribing one audio clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub confidence: f64,
    /// Clip duration in seconds
    pub duration: f64,
}

/// Kind of diagnosis performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisKind {
    Reading,
    Math,
    Comprehension,
}

/// Output of the diagnosis pipeline for one attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub kind: DiagnosisKind,
    pub analysis: String,
    pub concepts_identified: Vec<String>,
    pub gaps_found: Vec<String>,
    pub recommendations: Vec<String>,
    pub xp_earned: i64,
    /// Accuracy percentage, 0-100
    pub accuracy: i64,
}

/// One message of bounded chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Assistant reply plus suggested follow-up prompts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub suggestions: Vec<String>,
}

/// Speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription>;
}

/// Reading/math diagnosis capability
#[async_trait]
pub trait Diagnoser: Send + Sync {
    async fn diagnose_reading(&self, transcript: &str, expected_text: &str) -> Result<Diagnosis>;

    async fn diagnose_math(
        &self,
        transcript: &str,
        problem: &str,
        expected_answer: &str,
    ) -> Result<Diagnosis>;
}

/// Conversational student-helper capability
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    async fn ask(
        &self,
        message: &str,
        context: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply>;
}

/// Everything the service needs from the AI boundary in one object
pub trait AiService: Transcriber + Diagnoser + ChatAssistant {}
impl<T: Transcriber + Diagnoser + ChatAssistant> AiService for T {}

/// Degrades a primary client to canned fixtures on any failure.
///
/// The caller never observes a transport error; it is logged at warn and
/// masked with demo data.
pub struct Fallback<P> {
    primary: P,
    canned: CannedAiClient,
}

impl<P> Fallback<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            canned: CannedAiClient::new(),
        }
    }
}

#[async_trait]
impl<P: Transcriber> Transcriber for Fallback<P> {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription> {
        match self.primary.transcribe(audio).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Transcription service unreachable, using canned response: {}", e);
                self.canned.transcribe(audio).await
            }
        }
    }
}

#[async_trait]
impl<P: Diagnoser> Diagnoser for Fallback<P> {
    async fn diagnose_reading(&self, transcript: &str, expected_text: &str) -> Result<Diagnosis> {
        match self.primary.diagnose_reading(transcript, expected_text).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Reading diagnosis unreachable, using canned response: {}", e);
                self.canned.diagnose_reading(transcript, expected_text).await
            }
        }
    }

    async fn diagnose_math(
        &self,
        transcript: &str,
        problem: &str,
        expected_answer: &str,
    ) -> Result<Diagnosis> {
        match self
            .primary
            .diagnose_math(transcript, problem, expected_answer)
            .await
        {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Math diagnosis unreachable, using canned response: {}", e);
                self.canned
                    .diagnose_math(transcript, problem, expected_answer)
                    .await
            }
        }
    }
}

#[async_trait]
impl<P: ChatAssistant> ChatAssistant for Fallback<P> {
    async fn ask(
        &self,
        message: &str,
        context: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply> {
        match self.primary.ask(message, context, history).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Chat assistant unreachable, using canned response: {}", e);
                self.canned.ask(message, context, history).await
            }
        }
    }
}

/// Shared handle used by AppState
pub type SharedAiService = Arc<dyn AiService>;

#[cfg(test)]
mod tests {
    use super::*;
    use gyaan_common::Error;

    struct AlwaysFails;

    #[async_trait]
    impl Transcriber for AlwaysFails {
        async fn transcribe(&self, _audio: &[u8]) -> Result<Transcription> {
            Err(Error::Internal("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl Diagnoser for AlwaysFails {
        async fn diagnose_reading(&self, _t: &str, _e: &str) -> Result<Diagnosis> {
            Err(Error::Internal("connection refused".to_string()))
        }

        async fn diagnose_math(&self, _t: &str, _p: &str, _a: &str) -> Result<Diagnosis> {
            Err(Error::Internal("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl ChatAssistant for AlwaysFails {
        async fn ask(&self, _m: &str, _c: &str, _h: &[ChatMessage]) -> Result<ChatReply> {
            Err(Error::Internal("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn transport_failure_masked_by_canned_transcription() {
        let client = Fallback::new(AlwaysFails);
        let result = client.transcribe(b"not-really-audio").await.unwrap();
        assert!(result.confidence > 0.0);
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_masked_by_canned_diagnosis() {
        let client = Fallback::new(AlwaysFails);

        let reading = client.diagnose_reading("t", "e").await.unwrap();
        assert_eq!(reading.kind, DiagnosisKind::Reading);
        assert!(reading.xp_earned > 0);

        let math = client.diagnose_math("t", "12 + 13", "25").await.unwrap();
        assert_eq!(math.kind, DiagnosisKind::Math);
    }

    #[tokio::test]
    async fn transport_failure_masked_by_canned_chat_reply() {
        let client = Fallback::new(AlwaysFails);
        let reply = client.ask("help", "general learning", &[]).await.unwrap();
        assert!(!reply.reply.is_empty());
    }
}
