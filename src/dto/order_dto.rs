use base64::Engine;
use serde::Deserialize;

use crate::clients::VoiceInput;
use crate::utils::errors::{bad_request_error, AppResult};

// Request para transcribir una llamada: texto o audio en base64
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    pub transcript: Option<String>,
    pub audio_base64: Option<String>,
}

impl TranscribeRequest {
    /// Exactamente uno de los dos campos debe venir informado
    pub fn into_voice_input(self) -> AppResult<VoiceInput> {
        match (self.transcript, self.audio_base64) {
            (Some(text), None) => Ok(VoiceInput::Transcript(text)),
            (None, Some(encoded)) => base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map(VoiceInput::Audio)
                .map_err(|_| bad_request_error("audio_base64 is not valid base64")),
            (Some(_), Some(_)) => Err(bad_request_error(
                "send either transcript or audio_base64, not both",
            )),
            (None, None) => Err(bad_request_error("transcript or audio_base64 is required")),
        }
    }
}
