//! Assistive-technology detection
//!
//! Best-effort heuristic over what the host can report. It only decides
//! whether announcements are also spoken; nothing else depends on it.

use std::time::Duration;

/// User-agent tokens of known screen readers
const SCREEN_READER_TOKENS: &[&str] = &["NVDA", "JAWS", "VoiceOver", "TalkBack", "Orca"];

/// Signals the host exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSignals {
    pub user_agent: String,
    /// Installed speech voices
    pub voices: Vec<String>,
}

impl HostSignals {
    pub fn new(user_agent: &str) -> Self {
        Self { user_agent: user_agent.to_string(), ..Self::default() }
    }

    pub fn with_voices(mut self, voices: Vec<String>) -> Self {
        self.voices = voices;
        self
    }
}

/// Periodic assistive-technology detector
#[derive(Debug)]
pub struct AssistiveTechDetector {
    interval: Duration,
    last_check: Option<Duration>,
    detected: bool,
}

impl AssistiveTechDetector {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_check: None, detected: false }
    }

    /// Evaluate the heuristic once
    pub fn evaluate(signals: &HostSignals, screen_reader_pref: bool) -> bool {
        let ua = signals.user_agent.to_ascii_lowercase();
        let token = SCREEN_READER_TOKENS.iter().any(|t| ua.contains(&t.to_ascii_lowercase()));
        token || (screen_reader_pref && !signals.voices.is_empty())
    }

    /// Re-run the check if the interval has elapsed (or it never ran).
    /// Returns true when the detected state changed.
    pub fn poll(&mut self, now: Duration, signals: &HostSignals, screen_reader_pref: bool) -> bool {
        let due = self.last_check.is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if !due {
            return false;
        }
        self.last_check = Some(now);
        let detected = Self::evaluate(signals, screen_reader_pref);
        let changed = detected != self.detected;
        if changed {
            tracing::info!("Assistive technology {}", if detected { "detected" } else { "no longer detected" });
        }
        self.detected = detected;
        changed
    }

    /// Re-run the check immediately and restart the interval
    pub fn check_now(&mut self, now: Duration, signals: &HostSignals, screen_reader_pref: bool) -> bool {
        self.last_check = None;
        self.poll(now, signals, screen_reader_pref)
    }

    /// Last detection result
    pub fn is_detected(&self) -> bool {
        self.detected
    }
}
