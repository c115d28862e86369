// src/ports.rs

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Komunikat dla użytkownika (odpowiednik okienka z potwierdzeniem/błędem).
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub text: String,
}

impl Notification {
    pub fn success(title: &str, text: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    pub fn error(title: &str, text: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[cfg_attr(test, automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Potwierdzenie operacji nieodwracalnych.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: String) -> bool;
}

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!("{}: {}", notification.title, notification.text)
            }
            NotificationKind::Error => {
                tracing::warn!("{}: {}", notification.title, notification.text)
            }
        }
        println!("[{}] {} {}", notification.kind, notification.title, notification.text);
    }
}

/// W terminalu nawigacja tylko wypisuje docelową ścieżkę.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!("Nawigacja do: {}", path);
        println!("-> {}", path);
    }
}

#[derive(Debug, Default)]
pub struct PromptConfirmer {
    pub assume_yes: bool,
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "t" | "tak"
    )
}

#[async_trait]
impl Confirmer for PromptConfirmer {
    async fn confirm(&self, prompt: String) -> bool {
        if self.assume_yes {
            tracing::debug!("Automatyczne potwierdzenie: {}", prompt);
            return true;
        }

        let answer = tokio::task::spawn_blocking(move || {
            let mut stdout = io::stdout();
            write!(stdout, "{} [y/N] ", prompt)?;
            stdout.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok::<_, io::Error>(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                tracing::error!("Nie można odczytać odpowiedzi: {}", e);
                false
            }
            Err(e) => {
                tracing::error!("Błąd zadania potwierdzenia: {}", e);
                false
            }
        }
    }
}
