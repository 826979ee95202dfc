//! Announcement channel
//!
//! Each announcement is its own transient node inside the live-region
//! container, removed once its dwell window has passed on the document
//! timeline. Separate nodes keep repeats audible and preserve call order.

use std::collections::VecDeque;
use std::time::Duration;

use lodge_dom::{Document, DomError, NodeId, query};

use crate::config::A11yConfig;
use crate::detection::{AssistiveTechDetector, HostSignals};
use crate::preferences::PreferenceSet;
use crate::speech::{NullSpeech, SpeechBridge};

/// Announcement priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Polite,
    Assertive,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }

    /// Live-region role carrying this priority
    pub fn role(&self) -> &'static str {
        match self {
            Self::Polite => "status",
            Self::Assertive => "alert",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transient {
    node: NodeId,
    expires: Duration,
}

/// Announcement channel
pub struct Announcer {
    live_region_id: String,
    dwell: Duration,
    /// Transient nodes in insertion order
    pending: VecDeque<Transient>,
    speech: Box<dyn SpeechBridge>,
    speech_enabled: bool,
    detector: AssistiveTechDetector,
    signals: HostSignals,
}

impl Announcer {
    pub fn new(config: &A11yConfig) -> Self {
        Self {
            live_region_id: config.live_region_id.clone(),
            dwell: config.dwell(),
            pending: VecDeque::new(),
            speech: Box::new(NullSpeech),
            speech_enabled: config.speech_enabled,
            detector: AssistiveTechDetector::new(config.detection_interval()),
            signals: HostSignals::default(),
        }
    }

    /// Route spoken announcements through a speech bridge
    pub fn with_speech(mut self, speech: Box<dyn SpeechBridge>) -> Self {
        self.speech = speech;
        if self.signals.voices.is_empty() {
            self.signals.voices = self.speech.voices();
        }
        self
    }

    /// Update what the host reports for assistive-technology detection.
    /// Without reported voices, the speech bridge's voices are used.
    pub fn set_host_signals(&mut self, mut signals: HostSignals) {
        if signals.voices.is_empty() {
            signals.voices = self.speech.voices();
        }
        self.signals = signals;
    }

    /// Whether the speech channel is currently in use
    pub fn speech_active(&self) -> bool {
        self.speech_enabled && self.detector.is_detected()
    }

    /// Run detection now regardless of the interval
    pub fn detect_now(&mut self, doc: &Document, prefs: &PreferenceSet) -> bool {
        self.detector.check_now(doc.now(), &self.signals, prefs.screen_reader);
        self.detector.is_detected()
    }

    /// Announce text to assistive technology.
    ///
    /// Returns the transient node, or `None` when announcements are off or
    /// the text is blank.
    pub fn announce(&mut self, doc: &mut Document, prefs: &PreferenceSet, text: &str, priority: Priority) -> Option<NodeId> {
        if !prefs.announcements {
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let node = match self.insert(doc, text, priority) {
            Ok(node) => node,
            Err(e) => {
                tracing::warn!("Could not insert announcement: {}", e);
                return None;
            }
        };
        self.pending.push_back(Transient { node, expires: doc.now() + self.dwell });
        tracing::debug!("Announced ({}): {}", priority.as_str(), text);

        if self.speech_active() {
            if priority == Priority::Assertive {
                self.speech.cancel();
            }
            self.speech.speak(text, priority);
        }
        Some(node)
    }

    fn insert(&mut self, doc: &mut Document, text: &str, priority: Priority) -> Result<NodeId, DomError> {
        let container = self.live_region(doc)?;
        let node = doc.append_element(container, "div", &[
            ("role", priority.role()),
            ("aria-live", priority.as_str()),
            ("aria-atomic", "true"),
            ("class", "sr-only"),
        ])?;
        doc.append_text(node, text)?;
        Ok(node)
    }

    /// Find the live-region container, creating it under the body if needed
    pub fn live_region(&self, doc: &mut Document) -> Result<NodeId, DomError> {
        if let Some(region) = query::find_live_region(doc, &self.live_region_id) {
            return Ok(region);
        }
        if let Some(existing) = doc.get_element_by_id(&self.live_region_id) {
            doc.set_attribute(existing, "aria-live", "polite")?;
            return Ok(existing);
        }
        let body = doc.body();
        doc.append_element(body, "div", &[
            ("id", self.live_region_id.as_str()),
            ("aria-live", "polite"),
            ("class", "sr-only"),
        ])
    }

    /// Remove announcements whose dwell window has passed and re-run
    /// detection when due. Returns the number of nodes removed.
    pub fn poll(&mut self, doc: &mut Document, prefs: &PreferenceSet) -> usize {
        let now = doc.now();
        let mut removed = 0;
        while let Some(front) = self.pending.front().copied() {
            if front.expires > now {
                break;
            }
            self.pending.pop_front();
            if doc.is_connected(front.node) {
                if let Err(e) = doc.remove(front.node) {
                    tracing::warn!("Could not remove announcement {}: {}", front.node, e);
                    continue;
                }
                removed += 1;
            }
        }
        self.detector.poll(now, &self.signals, prefs.screen_reader);
        removed
    }

    /// Announcement nodes still in the document
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Announcement nodes still in the document, oldest first
    pub fn pending_nodes(&self) -> Vec<NodeId> {
        self.pending.iter().map(|t| t.node).collect()
    }

    // === Text templates ===

    pub fn announce_navigation(&mut self, doc: &mut Document, prefs: &PreferenceSet, page: &str) -> Option<NodeId> {
        self.announce(doc, prefs, &format!("Navigated to {}", page), Priority::Polite)
    }

    pub fn announce_error(&mut self, doc: &mut Document, prefs: &PreferenceSet, message: &str) -> Option<NodeId> {
        self.announce(doc, prefs, &format!("Error: {}", message), Priority::Assertive)
    }

    pub fn announce_success(&mut self, doc: &mut Document, prefs: &PreferenceSet, message: &str) -> Option<NodeId> {
        self.announce(doc, prefs, &format!("Success: {}", message), Priority::Polite)
    }

    pub fn announce_progress(
        &mut self,
        doc: &mut Document,
        prefs: &PreferenceSet,
        current: usize,
        total: usize,
        label: &str,
    ) -> Option<NodeId> {
        let text = match current.checked_mul(100).and_then(|p| p.checked_div(total)) {
            Some(percent) => format!("{}: {} of {} ({}%)", label, current, total, percent),
            None => format!("{}: {}", label, current),
        };
        self.announce(doc, prefs, &text, Priority::Polite)
    }

    pub fn announce_loading_complete(&mut self, doc: &mut Document, prefs: &PreferenceSet, what: &str) -> Option<NodeId> {
        self.announce(doc, prefs, &format!("{} loaded", what), Priority::Polite)
    }
}
