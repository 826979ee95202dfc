//! Speech bridge
//!
//! Optional synthesized-speech channel used alongside the live region when
//! assistive technology has been detected.

use std::cell::RefCell;
use std::rc::Rc;

use crate::announcer::Priority;

/// Synthesized speech output
pub trait SpeechBridge {
    /// Speak an utterance
    fn speak(&mut self, text: &str, priority: Priority);

    /// Stop anything currently being spoken
    fn cancel(&mut self);

    /// Installed voice names
    fn voices(&self) -> Vec<String>;
}

/// Bridge for hosts without speech synthesis
#[derive(Debug, Default)]
pub struct NullSpeech;

impl NullSpeech {
    pub fn new() -> Self { Self }
}

impl SpeechBridge for NullSpeech {
    fn speak(&mut self, _text: &str, _priority: Priority) {}
    fn cancel(&mut self) {}
    fn voices(&self) -> Vec<String> { Vec::new() }
}

/// Bridge that records what it was asked to say.
///
/// Clones share one log, so a test or the shell can keep a handle after
/// boxing the bridge into the core.
#[derive(Debug, Default, Clone)]
pub struct RecordingSpeech {
    voices: Vec<String>,
    log: Rc<RefCell<SpeechLog>>,
}

#[derive(Debug, Default)]
struct SpeechLog {
    spoken: Vec<(String, Priority)>,
    cancels: usize,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that reports the given voices as installed
    pub fn with_voices(voices: &[&str]) -> Self {
        Self { voices: voices.iter().map(|v| v.to_string()).collect(), ..Self::default() }
    }

    /// Utterances in the order they were spoken
    pub fn spoken(&self) -> Vec<(String, Priority)> {
        self.log.borrow().spoken.clone()
    }

    /// Number of times speech was cancelled
    pub fn cancels(&self) -> usize {
        self.log.borrow().cancels
    }
}

impl SpeechBridge for RecordingSpeech {
    fn speak(&mut self, text: &str, priority: Priority) {
        tracing::debug!("Speaking ({}): {}", priority.as_str(), text);
        self.log.borrow_mut().spoken.push((text.to_string(), priority));
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().cancels += 1;
    }

    fn voices(&self) -> Vec<String> {
        self.voices.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_speech() {
        let handle = RecordingSpeech::with_voices(&["Samantha"]);
        let mut speech: Box<dyn SpeechBridge> = Box::new(handle.clone());
        speech.speak("Room 204 booked", Priority::Polite);
        speech.cancel();
        assert_eq!(handle.spoken(), vec![("Room 204 booked".to_string(), Priority::Polite)]);
        assert_eq!(handle.cancels(), 1);
        assert_eq!(speech.voices(), vec!["Samantha".to_string()]);
    }

    #[test]
    fn test_null_speech() {
        let mut speech = NullSpeech::new();
        speech.speak("ignored", Priority::Assertive);
        assert!(speech.voices().is_empty());
    }
}
