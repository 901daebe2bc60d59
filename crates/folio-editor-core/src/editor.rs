//! The dual-mode content editor.
//!
//! `ContentEditor` owns both surfaces and the committed content. Exactly one
//! surface is active at a time; every operation dispatches on the current
//! `(DisplayMode, ActiveTab)` pair. Accepted mutations commit the active
//! surface into the `ContentStore`, which fires one change notification per
//! commit. Mode and tab switches move content between surfaces silently.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::format::{ColorOption, FormatCommand};
use crate::html::Sanitizer;
use crate::media::{MediaInsertion, MediaItem};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::paste::{ClipboardPayload, PasteContent, classify_paste};
use crate::platform::ClipboardPlatform;
use crate::store::{ChangeListener, ContentStore, ListenerId};
use crate::surface::{RawSurface, Surface, VisualSurface};
use crate::types::{Affinity, Selection};

pub const IMAGE_INSERTED: &str = "Image inserted successfully";
pub const HTML_COPIED: &str = "HTML copied to clipboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Visual,
    RawHtml,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Visual => Self::RawHtml,
            Self::RawHtml => Self::Visual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    #[default]
    Editor,
    Preview,
}

pub struct ContentEditor {
    store: ContentStore,
    mode: DisplayMode,
    tab: ActiveTab,
    visual: VisualSurface,
    raw: RawSurface,
    seed: Option<String>,
    media_dialog_open: bool,
    sanitizer: Option<Sanitizer>,
    config: EditorConfig,
    notifier: Box<dyn Notifier>,
}

impl Default for ContentEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ContentEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: ContentStore::default(),
            mode: DisplayMode::Visual,
            tab: ActiveTab::Editor,
            visual: VisualSurface::new(config.undo_depth),
            raw: RawSurface::new(config.undo_depth),
            seed: None,
            media_dialog_open: false,
            sanitizer: config.sanitize_paste.then(Sanitizer::default),
            config,
            notifier: Box::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Register an `onChange` listener.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    // === State ===

    /// The committed content (`serializedHtml`).
    pub fn content(&self) -> &str {
        self.store.content()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn tab(&self) -> ActiveTab {
        self.tab
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn is_media_dialog_open(&self) -> bool {
        self.media_dialog_open
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn palette(&self) -> &[ColorOption] {
        &self.config.palette
    }

    pub fn visual(&self) -> &VisualSurface {
        &self.visual
    }

    pub fn raw(&self) -> &RawSurface {
        &self.raw
    }

    /// Selection of the active surface.
    pub fn selection(&self) -> Option<Selection> {
        self.surface().selection()
    }

    fn surface(&self) -> &dyn Surface {
        match self.mode {
            DisplayMode::Visual => &self.visual,
            DisplayMode::RawHtml => &self.raw,
        }
    }

    fn surface_mut(&mut self) -> &mut dyn Surface {
        match self.mode {
            DisplayMode::Visual => &mut self.visual,
            DisplayMode::RawHtml => &mut self.raw,
        }
    }

    fn editing(&self, op: &'static str) -> bool {
        if self.tab == ActiveTab::Preview {
            tracing::debug!(target: "folio::editor", op, "ignored while previewing");
            return false;
        }
        true
    }

    /// Commit the active surface. Called once per accepted mutation.
    fn commit_active(&mut self) {
        let content = self.surface().content();
        self.store.commit(content);
    }

    fn commit_if(&mut self, changed: bool) -> bool {
        if changed {
            self.commit_active();
        }
        changed
    }

    /// Write the active surface into the store without notifying.
    fn flush(&mut self) {
        let content = self.surface().content();
        self.store.replace_silently(content);
    }

    fn load_active(&mut self) {
        let content = self.store.content().to_owned();
        self.surface_mut().load(&content);
    }

    // === Lifecycle ===

    /// Seed the editor from the form's initial value.
    ///
    /// A repeat of the current seed is ignored, so re-renders of the host
    /// never clobber edits in progress. Returns whether the seed was applied.
    pub fn initialize(&mut self, seed: &str) -> bool {
        if self.seed.as_deref() == Some(seed) {
            return false;
        }
        tracing::debug!(target: "folio::editor", len = seed.len(), "seeding editor");
        self.seed = Some(seed.to_owned());
        self.store.replace_silently(seed.to_owned());
        self.visual.load(seed);
        self.raw.load(seed);
        true
    }

    /// Switch between the visual and raw-HTML surfaces.
    pub fn toggle_mode(&mut self) {
        if self.tab == ActiveTab::Editor {
            self.flush();
            self.mode = self.mode.toggled();
            self.load_active();
        } else {
            // The entering surface is loaded when the editor tab comes back.
            self.mode = self.mode.toggled();
        }
        tracing::debug!(target: "folio::editor", mode = ?self.mode, "display mode toggled");
    }

    pub fn set_tab(&mut self, tab: ActiveTab) {
        match (self.tab, tab) {
            (ActiveTab::Editor, ActiveTab::Preview) => self.flush(),
            (ActiveTab::Preview, ActiveTab::Editor) => self.load_active(),
            _ => return,
        }
        self.tab = tab;
        tracing::debug!(target: "folio::editor", tab = ?tab, "tab switched");
    }

    /// Content for the preview tab, or the placeholder when there is none.
    pub fn preview(&self) -> Cow<'_, str> {
        let content = self.store.content();
        if content.trim().is_empty() {
            Cow::Owned(self.config.preview_placeholder.clone())
        } else {
            Cow::Borrowed(content)
        }
    }

    // === Commands ===

    /// Apply a toolbar command to the active surface.
    ///
    /// `color` is a CSS color or the name of a palette entry; it is only
    /// read by `TextColor`, which does nothing without one.
    pub fn apply_formatting(&mut self, command: FormatCommand, color: Option<&str>) -> bool {
        if !self.editing("format") {
            return false;
        }
        let color = color.map(|c| self.config.color(c).unwrap_or(c));
        let Some(markup) = command.markup(color) else {
            tracing::debug!(target: "folio::editor", %command, "no color value, skipping");
            return false;
        };
        let changed = self.surface_mut().wrap_selection(&markup);
        self.commit_if(changed)
    }

    /// Insert an image at the cursor, or append it without cursor context.
    pub fn insert_media(&mut self, url: &str, alt_text: &str) -> bool {
        if !self.editing("insert_media") {
            return false;
        }
        if url.trim().is_empty() {
            self.notifier
                .notify(Notice::error(EditorError::MissingMediaUrl.to_string()));
            return false;
        }
        let html = MediaInsertion::new(url.trim(), alt_text).to_html(&self.config.image_style);
        let changed = self.surface_mut().insert_markup(&html);
        self.commit_if(changed)
    }

    /// Ask the host to show the media library.
    pub fn open_media_dialog(&mut self) {
        if self.editing("open_media_dialog") {
            self.media_dialog_open = true;
        }
    }

    pub fn cancel_media_dialog(&mut self) {
        self.media_dialog_open = false;
    }

    /// Handle the media library's selection.
    pub fn select_media(&mut self, item: &MediaItem) -> bool {
        self.media_dialog_open = false;
        let insertion = match item.insertion() {
            Ok(insertion) => insertion,
            Err(err) => {
                tracing::warn!(
                    target: "folio::editor",
                    media = %item.id,
                    %err,
                    "media item has no link"
                );
                self.notifier.notify(Notice::error(err.to_string()));
                return false;
            }
        };
        if !self.insert_media(&insertion.url, &insertion.alt_text) {
            return false;
        }
        self.notifier.notify(Notice::success(IMAGE_INSERTED));
        true
    }

    /// Insert clipboard content into the active surface.
    ///
    /// The visual surface prefers html and sniffs markup in plain text; the
    /// raw surface takes the text verbatim, as a textarea does.
    pub fn handle_paste(&mut self, payload: &ClipboardPayload) -> bool {
        if !self.editing("paste") || payload.is_empty() {
            return false;
        }
        let changed = match self.mode {
            DisplayMode::Visual => match classify_paste(payload, self.sanitizer.as_ref()) {
                Some(PasteContent::Html(html)) => self.visual.insert_markup(&html),
                Some(PasteContent::Text(text)) => self.visual.insert_text(&text),
                None => false,
            },
            DisplayMode::RawHtml => {
                let text = payload
                    .text
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .or(payload.html.as_deref())
                    .unwrap_or_default();
                self.raw.insert_text(text)
            }
        };
        self.commit_if(changed)
    }

    // === Keystrokes ===

    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.editing("insert_text") {
            return false;
        }
        let changed = self.surface_mut().insert_text(text);
        self.commit_if(changed)
    }

    pub fn delete_backward(&mut self) -> bool {
        if !self.editing("delete_backward") {
            return false;
        }
        let changed = self.surface_mut().delete_backward();
        self.commit_if(changed)
    }

    pub fn delete_forward(&mut self) -> bool {
        if !self.editing("delete_forward") {
            return false;
        }
        let changed = self.surface_mut().delete_forward();
        self.commit_if(changed)
    }

    /// Set the active surface's selection. `affinity` only matters to the
    /// visual surface.
    pub fn set_selection(&mut self, selection: Option<Selection>, affinity: Affinity) {
        match self.mode {
            DisplayMode::Visual => self.visual.set_selection_with_affinity(selection, affinity),
            DisplayMode::RawHtml => self.raw.set_selection(selection),
        }
    }

    pub fn clear_selection(&mut self) {
        self.surface_mut().set_selection(None);
    }

    /// Replace the textarea value. Only meaningful in raw-HTML mode.
    pub fn set_raw_text(&mut self, text: &str) -> bool {
        if !self.editing("set_raw_text") {
            return false;
        }
        if self.mode != DisplayMode::RawHtml {
            tracing::debug!(target: "folio::editor", "raw text input outside raw mode, ignoring");
            return false;
        }
        let changed = self.raw.set_text(text);
        self.commit_if(changed)
    }

    /// Adopt the markup of the visual surface's DOM after the browser
    /// edited it natively (line breaks, spellcheck replacements).
    pub fn sync_visual_html(&mut self, html: &str) -> bool {
        if !self.editing("sync_visual_html") {
            return false;
        }
        if self.mode != DisplayMode::Visual {
            tracing::debug!(
                target: "folio::editor",
                "visual dom sync outside visual mode, ignoring"
            );
            return false;
        }
        let changed = self.visual.set_html(html);
        self.commit_if(changed)
    }

    pub fn undo(&mut self) -> bool {
        if !self.editing("undo") {
            return false;
        }
        let changed = self.surface_mut().undo();
        self.commit_if(changed)
    }

    pub fn redo(&mut self) -> bool {
        if !self.editing("redo") {
            return false;
        }
        let changed = self.surface_mut().redo();
        self.commit_if(changed)
    }

    /// Copy the current HTML to the clipboard. Not a mutation.
    pub fn copy_html(&self, clipboard: &dyn ClipboardPlatform) -> bool {
        let html = match self.tab {
            ActiveTab::Editor => self.surface().content(),
            ActiveTab::Preview => self.store.content().to_owned(),
        };
        match clipboard.write_text(&html) {
            Ok(()) => {
                self.notifier.notify(Notice::success(HTML_COPIED));
                true
            }
            Err(err) => {
                tracing::warn!(target: "folio::editor", %err, "clipboard write failed");
                self.notifier
                    .notify(Notice::error(format!("Failed to copy HTML: {err}")));
                false
            }
        }
    }
}
