//! Page initialization and event-driven behaviors
//!
//! This module replaces the original script's implicit document-wide
//! queries with an explicit `Page` value: the host constructs it from
//! the elements it wants managed and calls `initialize` once per page
//! load. Everything the script did on DOM events becomes a method the
//! host calls (`submit_form`, `textarea_input`), and everything it did
//! on browser timers goes through the virtual-time [`Scheduler`].

// Allow dead code - accessors on the page API are exercised by tests
#![allow(dead_code)]

mod nodes;
mod scheduler;

pub use nodes::*;
pub use scheduler::{Scheduler, TimerAction, TimerHandle};

use crate::config::Settings;
use crate::http::{CsrfToken, MetaTag, Request};
use crate::markdown::render_markdown;
use log::{debug, info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Page Elements
// ─────────────────────────────────────────────────────────────────────────────

/// The set of elements a page hands over for management.
#[derive(Debug, Default)]
pub struct PageElements {
    pub metas: Vec<MetaTag>,
    pub messages: Vec<MessageNode>,
    pub alerts: Vec<AlertNode>,
    pub forms: Vec<FormNode>,
    pub textareas: Vec<TextAreaNode>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// A managed page: injected elements, the CSRF token (if any), and the
/// timers driving alert dismissal and submit-button restore.
#[derive(Debug)]
pub struct Page {
    settings: Settings,
    csrf: Option<CsrfToken>,
    messages: Vec<MessageNode>,
    alerts: Vec<AlertNode>,
    forms: Vec<FormNode>,
    textareas: Vec<TextAreaNode>,
    scheduler: Scheduler,
    initialized: bool,
}

impl Page {
    pub fn new(settings: Settings, elements: PageElements) -> Self {
        let PageElements {
            metas,
            messages,
            alerts,
            forms,
            textareas,
        } = elements;

        let csrf = CsrfToken::from_meta(
            &metas,
            &settings.csrf_meta_name,
            &settings.csrf_header_name,
        );
        if csrf.is_none() {
            // Recognized absence: header injection is skipped entirely
            debug!("No CSRF meta tag on this page");
        }

        Self {
            settings,
            csrf,
            messages,
            alerts,
            forms,
            textareas,
            scheduler: Scheduler::new(),
            initialized: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Initialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the page-load behaviors: render every pending assistant
    /// message exactly once and start one dismissal timer per alert.
    ///
    /// Calling this more than once is harmless; already-rendered
    /// messages and already-scheduled alerts are skipped.
    pub fn initialize(&mut self) {
        let rendered = self.render_messages();

        let mut scheduled = 0;
        for (index, alert) in self.alerts.iter_mut().enumerate() {
            if alert.dismiss_timer.is_some() || !alert.is_open() {
                continue;
            }
            let handle = self.scheduler.schedule(
                self.settings.alert_dismiss_delay_ms,
                TimerAction::DismissAlert(index),
            );
            alert.dismiss_timer = Some(handle);
            scheduled += 1;
        }

        if !self.initialized {
            info!(
                "Page initialized: {} message(s) rendered, {} alert timer(s) started",
                rendered, scheduled
            );
        }
        self.initialized = true;
    }

    /// Render every assistant message whose current content version has
    /// not been rendered yet. Returns how many were rendered.
    ///
    /// Rendering runs at most once per content version: the pipeline
    /// double-wraps if re-applied to its own output.
    pub fn render_messages(&mut self) -> usize {
        let mut count = 0;
        for message in &mut self.messages {
            if message.author() != MessageAuthor::Assistant || message.is_rendered() {
                continue;
            }
            let html = render_markdown(message.html());
            message.apply_rendered(html);
            count += 1;
        }
        count
    }

    /// Swap in new raw content for a message, re-arming rendering.
    ///
    /// Rendering does NOT happen automatically on content updates; the
    /// host decides when to call [`Page::render_messages`] again.
    pub fn set_message_content(&mut self, index: usize, html: impl Into<String>) {
        match self.messages.get_mut(index) {
            Some(message) => message.reset_content(html.into()),
            None => warn!("set_message_content: no message at index {}", index),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Stamp an outgoing request with the CSRF header.
    ///
    /// GET requests and token-less pages pass through untouched.
    pub fn prepare_request(&self, request: &mut Request) {
        if let Some(token) = &self.csrf {
            token.apply(request);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a form submission: disable the submit button, swap its
    /// icon to the spinner, and schedule the unconditional restore.
    ///
    /// The restore fires after the configured delay whether or not the
    /// actual round trip has finished; a slow submission can therefore
    /// see its button re-enabled while still outstanding. The returned
    /// handle lets a host that tracks the round trip cancel the timer
    /// and restore on its own terms.
    pub fn submit_form(&mut self, index: usize) -> Option<TimerHandle> {
        let Some(form) = self.forms.get_mut(index) else {
            warn!("submit_form: no form at index {}", index);
            return None;
        };
        let button = form.submit.as_mut()?;

        button.disabled = true;
        if let Some(icon_class) = button.icon_class.take() {
            form.saved_icon_class = Some(icon_class);
            button.icon_class = Some(self.settings.spinner_icon_class.clone());
        }

        let handle = self.scheduler.schedule(
            self.settings.submit_restore_delay_ms,
            TimerAction::RestoreSubmit(index),
        );
        form.restore_timer = Some(handle);
        debug!("Form {} submitted, restore in {}ms", index, self.settings.submit_restore_delay_ms);
        Some(handle)
    }

    /// Cancel a pending timer (e.g. a submit restore the host wants to
    /// control itself). Returns `true` if it was still pending.
    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Textareas
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle textarea input: store the content and resize the element
    /// to its scroll height.
    pub fn textarea_input(&mut self, index: usize, content: impl Into<String>) {
        let line_height = self.settings.textarea_line_height_px;
        match self.textareas.get_mut(index) {
            Some(textarea) => textarea.resize_to_content(content.into(), line_height),
            None => warn!("textarea_input: no textarea at index {}", index),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Time
    // ─────────────────────────────────────────────────────────────────────────

    /// Advance virtual time and apply every timer that came due.
    pub fn advance(&mut self, dt_ms: u64) {
        for action in self.scheduler.advance(dt_ms) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: TimerAction) {
        match action {
            TimerAction::DismissAlert(index) => match self.alerts.get_mut(index) {
                Some(alert) => {
                    alert.dismiss_timer = None;
                    alert.trigger_dismiss();
                }
                None => warn!("DismissAlert: no alert at index {}", index),
            },
            TimerAction::RestoreSubmit(index) => match self.forms.get_mut(index) {
                Some(form) => {
                    form.restore_timer = None;
                    let saved = form.saved_icon_class.take();
                    if let Some(button) = form.submit.as_mut() {
                        button.disabled = false;
                        if saved.is_some() {
                            button.icon_class = saved;
                        }
                    }
                }
                None => warn!("RestoreSubmit: no form at index {}", index),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn message(&self, index: usize) -> Option<&MessageNode> {
        self.messages.get(index)
    }

    pub fn alert(&self, index: usize) -> Option<&AlertNode> {
        self.alerts.get(index)
    }

    pub fn form(&self, index: usize) -> Option<&FormNode> {
        self.forms.get(index)
    }

    pub fn textarea(&self, index: usize) -> Option<&TextAreaNode> {
        self.textareas.get(index)
    }

    pub fn has_csrf_token(&self) -> bool {
        self.csrf.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
