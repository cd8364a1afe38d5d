use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Theme lifecycle events, published by the manager for the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    CatalogRefreshed { themes: usize },
    ThemeDownloaded { theme: String },
    DownloadFailed { theme: String, reason: String },
    ActiveThemeChanged { theme: String },
    ThemesEvicted { themes: Vec<String> },
    #[serde(other)]
    Unknown,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(32)
    }
}
