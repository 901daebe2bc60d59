//! The contenteditable element hosting the visual surface.
//!
//! Rendering is wholesale: the surface's HTML goes into `innerHTML` and the
//! selection is restored afterwards. Selections are translated between DOM
//! points and visible-text offsets by counting characters of text nodes,
//! which is the same measure the core offset map uses.

use folio_editor_core::{Affinity, ContentEditor, DisplayMode, PlatformError, Selection, Surface};
use wasm_bindgen::JsCast;

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

pub struct ContentEditableHost {
    element: web_sys::HtmlElement,
}

impl ContentEditableHost {
    pub fn new(element: web_sys::HtmlElement) -> Self {
        Self { element }
    }

    /// Look up the editor element by id.
    pub fn from_id(id: &str) -> Result<Self, PlatformError> {
        let document = document()?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| PlatformError(format!("no element with id {id}")))?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| PlatformError(format!("element {id} is not an HTML element")))?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &web_sys::HtmlElement {
        &self.element
    }

    pub fn render(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    pub fn extract(&self) -> String {
        self.element.inner_html()
    }

    /// The DOM selection as visible-text offsets, with the affinity implied
    /// by where the focus point sits. `None` when there is no range inside
    /// the editor.
    pub fn selection(&self) -> Option<(Selection, Affinity)> {
        let window = web_sys::window()?;
        let selection = window.get_selection().ok()??;
        if selection.range_count() == 0 {
            return None;
        }
        let anchor_node = selection.anchor_node()?;
        let focus_node = selection.focus_node()?;
        let root: &web_sys::Node = self.element.as_ref();
        if !root.contains(Some(&anchor_node)) || !root.contains(Some(&focus_node)) {
            return None;
        }

        let anchor = self.visible_offset(&anchor_node, selection.anchor_offset())?;
        let head = self.visible_offset(&focus_node, selection.focus_offset())?;

        let in_text = focus_node.node_type() == web_sys::Node::TEXT_NODE;
        let affinity = if in_text && selection.focus_offset() > 0 {
            Affinity::Before
        } else {
            Affinity::After
        };
        Some((Selection::new(anchor, head), affinity))
    }

    /// Characters of text between the start of the editor and a DOM point.
    fn visible_offset(&self, node: &web_sys::Node, offset: u32) -> Option<usize> {
        let range = document().ok()?.create_range().ok()?;
        range.set_start(self.element.as_ref(), 0).ok()?;
        range.set_end(node, offset).ok()?;
        Some(String::from(range.to_string()).chars().count())
    }

    /// Place the DOM selection at visible-text offsets. `None` removes it.
    pub fn restore_selection(&self, selection: Option<Selection>) -> Result<(), PlatformError> {
        let window = web_sys::window().ok_or("no window")?;
        let dom_selection = window
            .get_selection()
            .map_err(|e| PlatformError(format!("{e:?}")))?
            .ok_or("no selection object")?;
        dom_selection
            .remove_all_ranges()
            .map_err(|e| PlatformError(format!("{e:?}")))?;

        let Some(selection) = selection else {
            return Ok(());
        };

        let (start_node, start_offset) = self.dom_point(selection.start())?;
        let (end_node, end_offset) = self.dom_point(selection.end())?;
        let range = document()?
            .create_range()
            .map_err(|e| PlatformError(format!("{e:?}")))?;
        range
            .set_start(&start_node, start_offset)
            .and_then(|_| range.set_end(&end_node, end_offset))
            .map_err(|e| PlatformError(format!("{e:?}")))?;
        dom_selection
            .add_range(&range)
            .map_err(|e| PlatformError(format!("{e:?}")))?;
        Ok(())
    }

    /// Find the text node and UTF-16 offset for a visible-text offset.
    ///
    /// Offsets on a boundary between two text nodes resolve to the end of
    /// the earlier one. Without any text the point is the end of the root.
    fn dom_point(&self, visible: usize) -> Result<(web_sys::Node, u32), PlatformError> {
        let walker = document()?
            .create_tree_walker_with_what_to_show(self.element.as_ref(), SHOW_TEXT)
            .map_err(|e| PlatformError(format!("{e:?}")))?;

        let mut remaining = visible;
        let mut last: Option<(web_sys::Node, u32)> = None;
        while let Ok(Some(node)) = walker.next_node() {
            let text = node.text_content().unwrap_or_default();
            let len = text.chars().count();
            if remaining <= len {
                let utf16: usize = text.chars().take(remaining).map(char::len_utf16).sum();
                return Ok((node, utf16 as u32));
            }
            remaining -= len;
            let end: usize = text.chars().map(char::len_utf16).sum();
            last = Some((node, end as u32));
        }

        match last {
            Some(point) => Ok(point),
            None => {
                let root: web_sys::Node = self.element.clone().into();
                let children = root.child_nodes().length();
                Ok((root, children))
            }
        }
    }

    /// Push the DOM selection into the editor.
    pub fn sync_selection(&self, editor: &mut ContentEditor) {
        match self.selection() {
            Some((selection, affinity)) => editor.set_selection(Some(selection), affinity),
            None => editor.clear_selection(),
        }
    }

    /// Re-render the visual surface and put the caret back.
    pub fn refresh(&self, editor: &ContentEditor) {
        if editor.mode() != DisplayMode::Visual {
            return;
        }
        self.render(&editor.visual().content());
        if let Err(e) = self.restore_selection(editor.selection()) {
            tracing::debug!(target: "folio::dom", "could not restore selection: {}", e);
        }
    }
}

fn document() -> Result<web_sys::Document, PlatformError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| PlatformError::from("no document"))
}
