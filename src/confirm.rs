//! Confirmation providers for destructive operations
//!
//! The delete manager awaits a [`Confirmer`] before removing anything, so how
//! the question is asked stays outside the manager.

use async_trait::async_trait;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Ask the user; `true` means go ahead
    async fn confirm(&self, message: &str) -> bool;
}

/// Answers every question the same way without asking
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Native yes/no dialog
#[derive(Debug, Clone)]
pub struct DialogConfirm {
    title: String,
}

impl DialogConfirm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for DialogConfirm {
    fn default() -> Self {
        Self::new("Confirm")
    }
}

#[async_trait]
impl Confirmer for DialogConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let title = self.title.clone();
        let message = message.to_string();

        // The native dialog blocks until answered
        let answer = tokio::task::spawn_blocking(move || {
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(&title)
                .set_description(&message)
                .set_buttons(MessageButtons::YesNo)
                .show()
        })
        .await;

        match answer {
            Ok(MessageDialogResult::Yes) => true,
            Ok(_) => false,
            Err(e) => {
                tracing::warn!("confirmation dialog failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm("delete?").await);
        assert!(!AutoConfirm(false).confirm("delete?").await);
    }
}
