use std::sync::Mutex;

use async_trait::async_trait;

/// Canal d'envoi des codes OTP vers le mobile de l'utilisateur
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, mobile_number: &str, code: &str) -> Result<(), String>;
}

/// Simule l'envoi du SMS en le journalisant (remplacer par un vrai service SMS)
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, mobile_number: &str, code: &str) -> Result<(), String> {
        tracing::info!(mobile_number, "OTP sent");
        tracing::debug!(mobile_number, code, "OTP content");
        Ok(())
    }
}

/// Garde en mémoire chaque envoi (mobile, code)
#[derive(Default)]
pub struct RecordingOtpSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingOtpSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dernier code envoyé à ce numéro
    pub fn last_code_for(&self, mobile_number: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .rev()
            .find(|(mobile, _)| mobile == mobile_number)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

#[async_trait]
impl OtpSender for RecordingOtpSender {
    async fn send(&self, mobile_number: &str, code: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((mobile_number.to_string(), code.to_string()));
        Ok(())
    }
}
