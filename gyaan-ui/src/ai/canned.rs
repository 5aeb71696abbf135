//! Canned-fixture AI client
//!
//! Fixed demo responses used when no analysis backend is configured and
//! as the fallback payload when the real one is unreachable.

use async_trait::async_trait;
use gyaan_common::Result;

use super::{
    ChatAssistant, ChatMessage, ChatReply, Diagnoser, Diagnosis, DiagnosisKind, Transcriber,
    Transcription,
};

/// Fixture client; every call succeeds with fixed demo data
#[derive(Debug, Clone, Default)]
pub struct CannedAiClient;

impl CannedAiClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transcriber for CannedAiClient {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Transcription> {
        Ok(Transcription {
            text: "The student read: The quick brown fox jumps over the lazy dog. \
                   The student showed good fluency with minor hesitation on 'jumps'."
                .to_string(),
            confidence: 0.92,
            duration: 8.5,
        })
    }
}

#[async_trait]
impl Diagnoser for CannedAiClient {
    async fn diagnose_reading(&self, _transcript: &str, _expected_text: &str) -> Result<Diagnosis> {
        Ok(Diagnosis {
            kind: DiagnosisKind::Reading,
            analysis: "Student demonstrates good word recognition and fluency. Reading pace \
                       is appropriate for grade level. Minor hesitation observed on \
                       multi-syllable words."
                .to_string(),
            concepts_identified: vec![
                "Letter Recognition".to_string(),
                "Word Formation".to_string(),
                "Sentence Reading".to_string(),
            ],
            gaps_found: vec!["Paragraph Fluency".to_string()],
            recommendations: vec![
                "Practice reading longer passages".to_string(),
                "Focus on multi-syllable word pronunciation".to_string(),
            ],
            xp_earned: 75,
            accuracy: 85,
        })
    }

    async fn diagnose_math(
        &self,
        _transcript: &str,
        _problem: &str,
        _expected_answer: &str,
    ) -> Result<Diagnosis> {
        Ok(Diagnosis {
            kind: DiagnosisKind::Math,
            analysis: "Student correctly identified the operation but made an error in the \
                       carrying step. Understanding of basic addition is solid, but place \
                       value concept needs reinforcement."
                .to_string(),
            concepts_identified: vec![
                "Number Recognition".to_string(),
                "Counting".to_string(),
                "Addition".to_string(),
            ],
            gaps_found: vec!["Place Value".to_string()],
            recommendations: vec![
                "Practice two-digit addition with carrying".to_string(),
                "Review place value concepts with visual aids".to_string(),
            ],
            xp_earned: 60,
            accuracy: 70,
        })
    }
}

#[async_trait]
impl ChatAssistant for CannedAiClient {
    async fn ask(
        &self,
        _message: &str,
        _context: &str,
        _history: &[ChatMessage],
    ) -> Result<ChatReply> {
        Ok(ChatReply {
            reply: "I'm here to help! Try asking me about your reading or math challenge."
                .to_string(),
            suggestions: vec![
                "Help with reading".to_string(),
                "Help with math".to_string(),
                "I'm stuck".to_string(),
            ],
        })
    }
}
