//! Lodge Shell - Main Entry Point
//!
//! `lodge-shell audit <page.html>` prints the accessibility report.
//! `lodge-shell replay <page.html> <keys...>` drives the page with key presses.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use lodge_a11y::{
    A11yConfig, AccessibilityCore, FileStorage, HostSignals, OsPreferences, RecordingSpeech, accessible_name,
};
use lodge_dom::{Document, DomEventType, Key, KeyOutcome, KeyboardEvent, NodeId};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lodge-shell audit <page.html>\n       lodge-shell replay <page.html> <keys...>";

/// Timeline advance per replayed key
const KEY_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("audit") => {
            let page = args.get(1).context(USAGE)?;
            audit(Path::new(page))
        }
        Some("replay") => {
            let page = args.get(1).context(USAGE)?;
            replay(Path::new(page), &args[2..])
        }
        _ => bail!(USAGE),
    }
}

fn load(path: &Path) -> Result<Document> {
    let html = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let url = format!("file://{}", path.display());
    let doc = lodge_html::HtmlParser::new().parse_with_url(&html, &url)?;
    tracing::info!("Loaded {} ({} nodes)", url, doc.connected_len());
    Ok(doc)
}

/// `LODGE_CONFIG` names a JSON config file; defaults otherwise
fn config() -> Result<A11yConfig> {
    match std::env::var_os("LODGE_CONFIG") {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", PathBuf::from(&path).display()))?;
            Ok(A11yConfig::from_json(&json)?)
        }
        None => Ok(A11yConfig::default()),
    }
}

/// `LODGE_PREFS` or a file under the system temp directory
fn prefs_path() -> PathBuf {
    std::env::var_os("LODGE_PREFS")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("lodge-a11y-prefs.json"))
}

fn audit(page: &Path) -> Result<()> {
    let mut doc = load(page)?;
    let storage = FileStorage::new(prefs_path());
    let mut core = AccessibilityCore::new(config()?, Box::new(storage), OsPreferences::default())?;
    core.attach(&mut doc);

    let report = core.generate_report(&doc);
    println!("{}", report.to_json_pretty()?);
    Ok(())
}

fn replay(page: &Path, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        bail!(USAGE);
    }
    let mut doc = load(page)?;
    let storage = FileStorage::new(prefs_path());
    let speech = RecordingSpeech::new();
    let mut core = AccessibilityCore::new(config()?, Box::new(storage), OsPreferences::default())?
        .with_speech(Box::new(speech.clone()));
    core.attach(&mut doc);
    if let Ok(agent) = std::env::var("LODGE_USER_AGENT") {
        core.set_host_signals(&doc, HostSignals::new(&agent));
    }
    doc.take_events();

    for chord in keys {
        doc.advance(KEY_INTERVAL);
        let announced_before = core.announcer().pending_nodes();
        let event = KeyboardEvent::parse(chord, doc.active_element());

        let mut outcome = core.handle_key(&mut doc, &event);
        if !outcome.is_handled() && event.key == Key::Tab && !event.modifiers.has_command_modifier() {
            // Nothing claimed the Tab; let the browser default run
            if doc.focus_sequential(!event.modifiers.shift).is_some() {
                outcome = KeyOutcome::Handled;
            }
        }
        let expired = core.poll(&mut doc);

        tracing::info!("{} -> {:?}", chord, outcome);
        for ev in doc.take_events() {
            if ev.event_type == DomEventType::Focus {
                tracing::info!("  focus {}", describe(&doc, ev.target));
            }
        }
        for node in core.announcer().pending_nodes() {
            if !announced_before.contains(&node) {
                tracing::info!("  announce \"{}\"", doc.tree().text_content(node));
            }
        }
        if expired > 0 {
            tracing::debug!("  {} announcements expired", expired);
        }
    }

    println!("focus: {}", describe(&doc, doc.active_element()));
    println!("preferences: {:?}", core.preferences());
    for (text, priority) in speech.spoken() {
        println!("spoken ({}): {}", priority.as_str(), text);
    }
    Ok(())
}

/// `tag#id "name"` for log lines
fn describe(doc: &Document, node: NodeId) -> String {
    let Some(elem) = doc.element(node) else {
        return node.to_string();
    };
    let mut out = elem.tag.clone();
    if let Some(id) = elem.id() {
        out.push('#');
        out.push_str(id);
    }
    let name = accessible_name(doc, node);
    if !name.is_empty() {
        out.push_str(&format!(" \"{}\"", name));
    }
    out
}
