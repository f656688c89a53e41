//! Gameplay analytics events
//!
//! The game only names events and stamps them; delivery belongs to whatever
//! [`AnalyticsSink`] the host plugs in.

use serde::Serialize;

/// A named event with its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    GameStart,
    GameOver {
        final_score: u32,
        lives_lost: u32,
    },
    CharacterSelected {
        character_id: String,
        character_name: String,
    },
    SocialShare {
        platform: String,
        score: u32,
    },
    ImageAction {
        action: String,
        score: u32,
    },
    HowToPlayOpened,
    BuyGemClicked {
        source: String,
    },
}

impl AnalyticsEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::GameStart => "game_start",
            AnalyticsEvent::GameOver { .. } => "game_over",
            AnalyticsEvent::CharacterSelected { .. } => "character_selected",
            AnalyticsEvent::SocialShare { .. } => "social_share",
            AnalyticsEvent::ImageAction { .. } => "image_action",
            AnalyticsEvent::HowToPlayOpened => "how_to_play_opened",
            AnalyticsEvent::BuyGemClicked { .. } => "buy_gem_clicked",
        }
    }
}

/// An event plus the wall-clock time it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StampedEvent {
    /// Unix timestamp (ms)
    pub timestamp: f64,
    #[serde(flatten)]
    pub event: AnalyticsEvent,
}

/// Destination for analytics events
pub trait AnalyticsSink {
    fn record(&mut self, event: StampedEvent);
}

/// Writes every event to the log as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn record(&mut self, event: StampedEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::info!("analytics {}", json),
            Err(e) => log::warn!("Dropping analytics event {}: {}", event.event.name(), e),
        }
    }
}

/// Keeps events in memory
impl AnalyticsSink for Vec<StampedEvent> {
    fn record(&mut self, event: StampedEvent) {
        self.push(event);
    }
}
