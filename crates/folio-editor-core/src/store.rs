//! Committed content and change fan-out.
//!
//! The editor never calls the form directly. It commits into a
//! `ContentStore`, and the store notifies every subscribed listener once
//! per commit.

use std::cell::RefCell;
use std::rc::Rc;

use smol_str::SmolStr;

/// Receives the reconciled content after every accepted mutation.
pub trait ChangeListener {
    fn content_changed(&mut self, content: &str);
}

impl<F: FnMut(&str)> ChangeListener for F {
    fn content_changed(&mut self, content: &str) {
        self(content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct ContentStore {
    content: String,
    revision: u64,
    next_listener: u64,
    listeners: Vec<(ListenerId, Box<dyn ChangeListener>)>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("content", &self.content)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ContentStore {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of commits so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Store `content` and notify every listener exactly once.
    pub fn commit(&mut self, content: String) {
        self.content = content;
        self.revision += 1;
        tracing::trace!(
            target: "folio::store",
            revision = self.revision,
            len = self.content.len(),
            "commit"
        );
        for (_, listener) in &mut self.listeners {
            listener.content_changed(&self.content);
        }
    }

    /// Replace the content without notifying. Used for seeding and for
    /// flushing a surface on mode or tab switches.
    pub fn replace_silently(&mut self, content: String) {
        self.content = content;
    }
}

/// A form field mirroring the editor content.
#[derive(Debug, Clone)]
pub struct FormField {
    name: SmolStr,
    value: Rc<RefCell<String>>,
}

impl FormField {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            value: Rc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }
}

impl ChangeListener for FormField {
    fn content_changed(&mut self, content: &str) {
        tracing::trace!(target: "folio::store", field = %self.name, "form field updated");
        content.clone_into(&mut self.value.borrow_mut());
    }
}
