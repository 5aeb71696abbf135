//! HTTP client for the analysis backend
//!
//! Talks to the real transcription/diagnosis/chat services. Callers wrap
//! this in [`super::Fallback`] so transport failures degrade to canned
//! data instead of surfacing.

use async_trait::async_trait;
use gyaan_common::{Error, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::{
    ChatAssistant, ChatMessage, ChatReply, Diagnoser, Diagnosis, Transcriber, Transcription,
};

const USER_AGENT: &str = concat!("gyaan-ui/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the analysis backend HTTP API
pub struct HttpAiClient {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ReadingRequest<'a> {
    transcript: &'a str,
    expected_text: &'a str,
}

#[derive(Serialize)]
struct MathRequest<'a> {
    transcript: &'a str,
    problem: &'a str,
    expected_answer: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    context: &'a str,
    history: &'a [ChatMessage],
}

impl HttpAiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self { http_client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transcriber for HttpAiClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription> {
        debug!(bytes = audio.len(), "Sending audio for transcription");

        let response = self
            .http_client
            .post(self.url("/audio/transcribe"))
            .header("content-type", "audio/webm")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "transcription service returned {}",
                response.status()
            )));
        }

        response
            .json::<Transcription>()
            .await
            .map_err(|e| Error::Internal(e.to_string()))
    }
}

#[async_trait]
impl Diagnoser for HttpAiClient {
    async fn diagnose_reading(&self, transcript: &str, expected_text: &str) -> Result<Diagnosis> {
        let response = self
            .http_client
            .post(self.url("/diagnose/reading"))
            .json(&ReadingRequest { transcript, expected_text })
            .send()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "reading diagnosis returned {}",
                response.status()
            )));
        }

        response
            .json::<Diagnosis>()
            .await
            .map_err(|e| Error::Internal(e.to_string()))
    }

    async fn diagnose_math(
        &self,
        transcript: &str,
        problem: &str,
        expected_answer: &str,
    ) -> Result<Diagnosis> {
        let response = self
            .http_client
            .post(self.url("/diagnose/math"))
            .json(&MathRequest { transcript, problem, expected_answer })
            .send()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "math diagnosis returned {}",
                response.status()
            )));
        }

        response
            .json::<Diagnosis>()
            .await
            .map_err(|e| Error::Internal(e.to_string()))
    }
}

#[async_trait]
impl ChatAssistant for HttpAiClient {
    async fn ask(
        &self,
        message: &str,
        context: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply> {
        // Only the most recent messages travel; the assistant context is
        // bounded by design
        let bounded = if history.len() > 6 {
            &history[history.len() - 6..]
        } else {
            history
        };

        let response = self
            .http_client
            .post(self.url("/chat/ask"))
            .json(&ChatRequest { message, context, history: bounded })
            .send()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "chat assistant returned {}",
                response.status()
            )));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| Error::Internal(e.to_string()))
    }
}
