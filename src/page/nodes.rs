//! The element model the page behaviors operate on
//!
//! These nodes mirror the contract surface the original script consumed
//! from the live document: message containers, alert banners with their
//! dismiss controls, forms with an optional submit button (optionally
//! carrying an icon), and textarea inputs. The host constructs them from
//! whatever real page representation it owns and hands them to `Page`.

// Allow dead code - the node API is exercised through the page module
// and its tests; not every accessor has a caller in the binary
#![allow(dead_code)]

use super::scheduler::TimerHandle;

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAuthor {
    User,
    Assistant,
}

/// A message container whose inner HTML gets rewritten in place.
///
/// Only assistant messages are Markdown-rendered, and each content
/// version is rendered at most once (the pipeline is not idempotent).
#[derive(Debug, Clone)]
pub struct MessageNode {
    html: String,
    author: MessageAuthor,
    rendered: bool,
}

impl MessageNode {
    pub fn new(author: MessageAuthor, html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            author,
            rendered: false,
        }
    }

    pub fn assistant(html: impl Into<String>) -> Self {
        Self::new(MessageAuthor::Assistant, html)
    }

    pub fn user(html: impl Into<String>) -> Self {
        Self::new(MessageAuthor::User, html)
    }

    /// Current inner HTML.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn author(&self) -> MessageAuthor {
        self.author
    }

    /// Whether the current content version has been rendered already.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Replace the content with its rendered form, consuming the
    /// one render this content version is entitled to.
    pub(super) fn apply_rendered(&mut self, html: String) {
        self.html = html;
        self.rendered = true;
    }

    /// Swap in new raw content, re-arming rendering for it.
    pub(super) fn reset_content(&mut self, html: String) {
        self.html = html;
        self.rendered = false;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Alerts
// ─────────────────────────────────────────────────────────────────────────────

/// An alert banner. Dismissal goes through its dismiss control; a banner
/// without one simply stays on screen when its timer fires.
#[derive(Debug, Clone)]
pub struct AlertNode {
    open: bool,
    has_dismiss_control: bool,
    pub(super) dismiss_timer: Option<TimerHandle>,
}

impl AlertNode {
    pub fn new(has_dismiss_control: bool) -> Self {
        Self {
            open: true,
            has_dismiss_control,
            dismiss_timer: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn has_dismiss_control(&self) -> bool {
        self.has_dismiss_control
    }

    /// Trigger the dismiss control, if there is one.
    pub(super) fn trigger_dismiss(&mut self) {
        if self.has_dismiss_control {
            self.open = false;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Forms
// ─────────────────────────────────────────────────────────────────────────────

/// A form's submit button, optionally carrying an icon element whose
/// class is swapped to a spinner while a submission is pending.
#[derive(Debug, Clone)]
pub struct SubmitButton {
    pub disabled: bool,
    pub icon_class: Option<String>,
}

impl SubmitButton {
    pub fn new() -> Self {
        Self {
            disabled: false,
            icon_class: None,
        }
    }

    pub fn with_icon(icon_class: impl Into<String>) -> Self {
        Self {
            disabled: false,
            icon_class: Some(icon_class.into()),
        }
    }
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self::new()
    }
}

/// A form, which may or may not contain a submit button.
#[derive(Debug, Clone, Default)]
pub struct FormNode {
    pub submit: Option<SubmitButton>,
    pub(super) saved_icon_class: Option<String>,
    pub(super) restore_timer: Option<TimerHandle>,
}

impl FormNode {
    pub fn new(submit: Option<SubmitButton>) -> Self {
        Self {
            submit,
            saved_icon_class: None,
            restore_timer: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Textareas
// ─────────────────────────────────────────────────────────────────────────────

/// A textarea input that grows with its content.
#[derive(Debug, Clone)]
pub struct TextAreaNode {
    content: String,
    height_px: u32,
}

impl TextAreaNode {
    pub fn new(initial_height_px: u32) -> Self {
        Self {
            content: String::new(),
            height_px: initial_height_px,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Height the content would need: one line minimum.
    pub fn scroll_height(&self, line_height_px: u32) -> u32 {
        let lines = self.content.split('\n').count().max(1) as u32;
        lines * line_height_px
    }

    /// Replace the content and grow/shrink to its scroll height.
    pub(super) fn resize_to_content(&mut self, content: String, line_height_px: u32) {
        self.content = content;
        self.height_px = self.scroll_height(line_height_px);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_starts_unrendered() {
        let message = MessageNode::assistant("hi");
        assert!(!message.is_rendered());
        assert_eq!(message.html(), "hi");
    }

    #[test]
    fn test_reset_content_rearms_rendering() {
        let mut message = MessageNode::assistant("hi");
        message.apply_rendered("<p>hi</p>".to_string());
        assert!(message.is_rendered());

        message.reset_content("bye".to_string());
        assert!(!message.is_rendered());
        assert_eq!(message.html(), "bye");
    }

    #[test]
    fn test_alert_without_control_ignores_dismiss() {
        let mut alert = AlertNode::new(false);
        alert.trigger_dismiss();
        assert!(alert.is_open());
    }

    #[test]
    fn test_alert_with_control_closes() {
        let mut alert = AlertNode::new(true);
        alert.trigger_dismiss();
        assert!(!alert.is_open());
    }

    #[test]
    fn test_textarea_scroll_height_tracks_lines() {
        let mut textarea = TextAreaNode::new(24);
        assert_eq!(textarea.scroll_height(24), 24);

        textarea.resize_to_content("a\nb\nc".to_string(), 24);
        assert_eq!(textarea.height_px(), 72);
    }

    #[test]
    fn test_textarea_shrinks_back() {
        let mut textarea = TextAreaNode::new(24);
        textarea.resize_to_content("a\nb\nc".to_string(), 24);
        textarea.resize_to_content("a".to_string(), 24);
        assert_eq!(textarea.height_px(), 24);
    }
}
