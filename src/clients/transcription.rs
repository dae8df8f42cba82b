//! Servicio de transcripción
//!
//! Frontera con el servicio que convierte audio o texto de una llamada en un
//! borrador de pedido estructurado. La implementación incluida es un mock con
//! latencia configurable que devuelve un borrador de ejemplo.

use async_trait::async_trait;
use anyhow::{anyhow, Result};
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use std::time::Duration;

use crate::models::order::{OrderDraft, Priority};
use crate::utils::validation::DATE_FORMAT;

/// Transcripción usada cuando llega audio grabado
pub const RECORDED_CALL_TRANSCRIPT: &str = "Hi, this is Anna. Please deliver to Brīvības iela 123 in Riga tomorrow at 10 in the morning. My phone number is +371 2234 5678.";

/// Entrada de voz: transcripción ya disponible o audio crudo
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceInput {
    Transcript(String),
    Audio(Vec<u8>),
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Extraer un borrador de pedido de la entrada de voz
    async fn transcribe(&self, input: VoiceInput) -> Result<OrderDraft>;
}

/// Mock del servicio de transcripción
#[derive(Debug, Clone)]
pub struct MockTranscriptionService {
    latency: Duration,
    jitter_ms: u64,
}

impl MockTranscriptionService {
    pub fn new(latency: Duration) -> Self {
        Self { latency, jitter_ms: 0 }
    }

    /// Añadir variación aleatoria de hasta `jitter_ms` a cada llamada
    pub fn with_jitter(mut self, jitter_ms: u64) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    fn delay(&self) -> Duration {
        if self.jitter_ms == 0 {
            return self.latency;
        }
        let extra = rand::thread_rng().gen_range(0..=self.jitter_ms);
        self.latency + Duration::from_millis(extra)
    }

    fn sample_draft(transcript: String) -> OrderDraft {
        let tomorrow = (Utc::now() + ChronoDuration::days(1)).date_naive();
        OrderDraft {
            client_name: "Anna Berzina".to_string(),
            phone: Some("+371 2234 5678".to_string()),
            address: "Brīvības iela 123, Riga, LV-1001".to_string(),
            date: tomorrow.format(DATE_FORMAT).to_string(),
            time: "10:00".to_string(),
            priority: Some(Priority::Normal),
            notes: Some("Please call upon arrival.".to_string()),
            original_text: Some(transcript),
        }
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(&self, input: VoiceInput) -> Result<OrderDraft> {
        let transcript = match input {
            VoiceInput::Transcript(text) if text.trim().is_empty() => {
                return Err(anyhow!("transcript is empty"));
            }
            VoiceInput::Transcript(text) => text,
            VoiceInput::Audio(bytes) if bytes.is_empty() => {
                return Err(anyhow!("audio payload is empty"));
            }
            VoiceInput::Audio(bytes) => {
                log::debug!("🎙️ Audio recibido: {} bytes", bytes.len());
                RECORDED_CALL_TRANSCRIPT.to_string()
            }
        };

        let delay = self.delay();
        log::info!("🎙️ Transcribiendo llamada (latencia simulada {} ms)", delay.as_millis());
        tokio::time::sleep(delay).await;

        Ok(Self::sample_draft(transcript))
    }
}
