//! Focus trap engine
//!
//! Confines Tab / Shift+Tab to a container while a modal surface is open.
//! Sessions nest as a stack; releasing one restores focus to whatever was
//! focused when it opened.

use lodge_dom::{Document, Key, KeyOutcome, KeyboardEvent, NodeId, query};

/// Focus trap session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrapId(u64);

impl std::fmt::Display for TrapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trap-{}", self.0)
    }
}

/// Options for opening a trap
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapOptions {
    /// Element to focus instead of the first focusable descendant
    pub initial_focus: Option<NodeId>,
    /// Escape releases the trap
    pub escape_closes: bool,
}

impl TrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_focus(mut self, node: NodeId) -> Self {
        self.initial_focus = Some(node);
        self
    }

    pub fn escape_closes(mut self, closes: bool) -> Self {
        self.escape_closes = closes;
        self
    }
}

#[derive(Debug, Clone)]
struct Session {
    id: TrapId,
    container: NodeId,
    previously_focused: Option<NodeId>,
    escape_closes: bool,
}

/// Stack of open focus trap sessions
#[derive(Debug, Default)]
pub struct FocusTrapEngine {
    stack: Vec<Session>,
    next_id: u64,
}

impl FocusTrapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a trap on `container` and move focus into it.
    ///
    /// A container with nothing focusable still gets a session; focus is
    /// left where it is.
    pub fn open(&mut self, doc: &mut Document, container: NodeId, options: TrapOptions) -> TrapId {
        self.next_id += 1;
        let id = TrapId(self.next_id);
        let previously_focused = doc.focused();

        self.stack.push(Session {
            id,
            container,
            previously_focused,
            escape_closes: options.escape_closes,
        });

        let initial = options.initial_focus
            .filter(|&n| doc.contains(container, n) && query::is_focus_target(doc, n))
            .or_else(|| query::focusable_descendants(doc, container).first().copied());
        match initial {
            Some(target) => {
                doc.focus(target);
            }
            None => tracing::warn!("Focus trap {} opened on {} with nothing focusable", id, container),
        }
        tracing::debug!("Opened {} on {} (depth {})", id, container, self.stack.len());
        id
    }

    /// Release a session and restore focus.
    ///
    /// Sessions opened after it are released first. Releasing a closed or
    /// unknown session returns false and leaves focus alone.
    pub fn release(&mut self, doc: &mut Document, id: TrapId) -> bool {
        let Some(pos) = self.stack.iter().position(|s| s.id == id) else {
            return false;
        };
        while self.stack.len() > pos + 1 {
            if let Some(inner) = self.stack.pop() {
                tracing::debug!("Releasing {} nested above {}", inner.id, id);
            }
        }
        let Some(session) = self.stack.pop() else {
            return false;
        };
        self.restore(doc, &session);
        tracing::debug!("Released {} (depth {})", id, self.stack.len());
        true
    }

    fn restore(&self, doc: &mut Document, session: &Session) {
        if let Some(previous) = session.previously_focused {
            if doc.is_connected(previous) && doc.focus(previous) {
                return;
            }
        }
        let fallback = self.stack.last()
            .and_then(|outer| query::focusable_descendants(doc, outer.container).first().copied());
        match fallback {
            Some(target) if doc.focus(target) => {}
            _ => doc.focus_body(),
        }
    }

    /// Handle Tab, Shift+Tab and Escape for the topmost session
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyboardEvent) -> KeyOutcome {
        let Some(top) = self.stack.last().cloned() else {
            return KeyOutcome::Ignored;
        };
        if event.modifiers.has_command_modifier() {
            return KeyOutcome::Ignored;
        }

        match event.key {
            Key::Escape if self.escape(doc) => KeyOutcome::Handled,
            Key::Tab => self.handle_tab(doc, &top, event.modifiers.shift),
            _ => KeyOutcome::Ignored,
        }
    }

    /// Release the topmost session if it opted in to closing on Escape
    pub fn escape(&mut self, doc: &mut Document) -> bool {
        match self.stack.last() {
            Some(top) if top.escape_closes => {
                let id = top.id;
                self.release(doc, id)
            }
            _ => false,
        }
    }

    fn handle_tab(&mut self, doc: &mut Document, session: &Session, backward: bool) -> KeyOutcome {
        if !doc.is_connected(session.container) {
            tracing::warn!("Container of {} left the document; releasing", session.id);
            self.release(doc, session.id);
            return KeyOutcome::Ignored;
        }

        // Recomputed on every press so dynamic content stays reachable
        let order = query::focusable_descendants(doc, session.container);
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return KeyOutcome::Handled;
        };

        let focused = doc.focused().filter(|&f| doc.contains(session.container, f));
        let target = match focused.map(|f| order.iter().position(|&n| n == f)) {
            // Focus escaped, or sits on something outside the tab sequence
            None | Some(None) => Some(if backward { last } else { first }),
            Some(Some(pos)) if !backward && pos == order.len() - 1 => Some(first),
            Some(Some(0)) if backward => Some(last),
            Some(Some(_)) => None,
        };

        match target {
            Some(node) => {
                doc.focus(node);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    /// Any session open
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of open sessions
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Topmost session
    pub fn top(&self) -> Option<TrapId> {
        self.stack.last().map(|s| s.id)
    }

    /// Check whether a session is still open
    pub fn contains(&self, id: TrapId) -> bool {
        self.stack.iter().any(|s| s.id == id)
    }

    /// Container of an open session
    pub fn container(&self, id: TrapId) -> Option<NodeId> {
        self.stack.iter().find(|s| s.id == id).map(|s| s.container)
    }
}
