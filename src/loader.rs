//! The fetch-render cycle: fetch parameter definitions for a job, swap the
//! fragment into the panel, run the host's rehydration callback.

use std::cell::Cell;
use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{fetch_parameters, parameters_url, LoadError};

/// Drives the parameter panel for one job reference field.
///
/// The loader holds explicit handles to everything it touches: the
/// descriptor endpoint URL, the execution context token, the panel element
/// and the rehydration callback. It never queries the document, so several
/// independent panels can coexist on one page.
///
/// Overlapping cycles are resolved latest-issued-wins: each [`load`] call
/// takes a ticket from a monotonic counter and a response is only rendered
/// if no newer ticket has been issued since. Superseded requests are not
/// aborted, their responses are just dropped.
///
/// [`load`]: PanelLoader::load
#[derive(Clone)]
pub struct PanelLoader {
    descriptor_url: String,
    context: String,
    panel: NodeRef<Div>,
    rehydrate: Option<Callback<web_sys::HtmlDivElement>>,
    seq: Sequencer,
}

impl PanelLoader {
    /// `rehydrate` is called with the panel element after every successful
    /// swap, never after an error.
    pub fn new(
        descriptor_url: impl Into<String>,
        context: impl Into<String>,
        panel: NodeRef<Div>,
        rehydrate: Option<Callback<web_sys::HtmlDivElement>>,
    ) -> Self {
        Self {
            descriptor_url: descriptor_url.into(),
            context: context.into(),
            panel,
            rehydrate,
            seq: Sequencer::default(),
        }
    }

    /// Start one fetch-render cycle for the given job name.
    ///
    /// Empty job names are sent to the server unchanged; there is no
    /// client-side fast path. No timeout and no retry.
    pub fn load(&self, job: &str) {
        let url = parameters_url(&self.descriptor_url, job, &self.context);
        let ticket = self.seq.begin();
        log::debug!("loading parameter definitions from {}", url);

        let seq = self.seq.clone();
        let panel = self.panel;
        let rehydrate = self.rehydrate;
        spawn_local(async move {
            let outcome = fetch_parameters(&url).await;
            if let Err(LoadError::Transport(reason)) = &outcome {
                log::warn!("parameter request to {} failed: {}", url, reason);
            }
            if !seq.is_current(ticket) {
                log::debug!("discarding stale parameter response from {}", url);
                return;
            }
            let Some(el) = panel.get_untracked() else {
                log::warn!("parameter panel is not mounted, dropping response from {}", url);
                return;
            };
            resolve(&DomPanel { el, rehydrate }, outcome);
        });
    }
}

/// Monotonic ticket counter shared by all cycles of one loader.
#[derive(Clone, Default)]
struct Sequencer(Rc<Cell<u64>>);

impl Sequencer {
    fn begin(&self) -> u64 {
        let ticket = self.0.get() + 1;
        self.0.set(ticket);
        ticket
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

/// Where a cycle's outcome lands. The one production impl writes the DOM;
/// tests substitute a recording double.
trait PanelSink {
    fn replace_html(&self, html: &str);
    fn rehydrate(&self);
}

struct DomPanel {
    el: web_sys::HtmlDivElement,
    rehydrate: Option<Callback<web_sys::HtmlDivElement>>,
}

impl PanelSink for DomPanel {
    fn replace_html(&self, html: &str) {
        self.el.set_inner_html(html);
    }

    fn rehydrate(&self) {
        if let Some(cb) = self.rehydrate {
            cb.run(self.el.clone());
        }
    }
}

/// Render a resolved cycle into the panel. Success replaces the content and
/// rehydrates; failure replaces the content with the inline error fragment
/// and does not rehydrate.
fn resolve<S: PanelSink>(sink: &S, outcome: Result<String, LoadError>) {
    match outcome {
        Ok(html) => {
            sink.replace_html(&html);
            sink.rehydrate();
        }
        Err(err) => sink.replace_html(&error_fragment(err.reason())),
    }
}

fn error_fragment(reason: &str) -> String {
    format!(
        "<b>ERROR</b>: Failed to load parameter definitions: {}",
        html_escape(reason)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPanel {
        html: RefCell<Vec<String>>,
        rehydrated: Cell<usize>,
    }

    impl RecordingPanel {
        fn content(&self) -> String {
            self.html.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl PanelSink for RecordingPanel {
        fn replace_html(&self, html: &str) {
            self.html.borrow_mut().push(html.to_string());
        }

        fn rehydrate(&self) {
            self.rehydrated.set(self.rehydrated.get() + 1);
        }
    }

    #[test]
    fn test_success_replaces_content_and_rehydrates_once() {
        let panel = RecordingPanel::default();
        resolve(&panel, Ok("<input name='X'/>".to_string()));
        assert_eq!(panel.content(), "<input name='X'/>");
        assert_eq!(panel.rehydrated.get(), 1);
    }

    #[test]
    fn test_rejected_renders_error_without_rehydration() {
        let panel = RecordingPanel::default();
        resolve(
            &panel,
            Err(LoadError::Rejected {
                status: 404,
                status_text: "Not Found".to_string(),
            }),
        );
        assert_eq!(
            panel.content(),
            "<b>ERROR</b>: Failed to load parameter definitions: Not Found"
        );
        assert_eq!(panel.rehydrated.get(), 0);
    }

    #[test]
    fn test_transport_failure_renders_error_without_rehydration() {
        let panel = RecordingPanel::default();
        resolve(
            &panel,
            Err(LoadError::Transport("connection refused".to_string())),
        );
        assert_eq!(
            panel.content(),
            "<b>ERROR</b>: Failed to load parameter definitions: connection refused"
        );
        assert_eq!(panel.rehydrated.get(), 0);
    }

    #[test]
    fn test_error_reason_is_html_escaped() {
        let panel = RecordingPanel::default();
        resolve(
            &panel,
            Err(LoadError::Transport("<script>alert(1)</script>".to_string())),
        );
        assert_eq!(
            panel.content(),
            "<b>ERROR</b>: Failed to load parameter definitions: \
             &lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let seq = Sequencer::default();
        let first = seq.begin();
        let second = seq.begin();
        assert!(second > first);
    }

    #[test]
    fn test_latest_issued_request_wins() {
        let seq = Sequencer::default();
        let panel = RecordingPanel::default();

        // Two cycles issued back to back, responses arrive out of order:
        // the second response lands first, then the first straggles in.
        let first = seq.begin();
        let second = seq.begin();

        assert!(seq.is_current(second));
        resolve(&panel, Ok("<input name='second'/>".to_string()));

        assert!(!seq.is_current(first));

        assert_eq!(panel.content(), "<input name='second'/>");
        assert_eq!(panel.rehydrated.get(), 1);
    }

    #[test]
    fn test_duplicate_cycle_for_same_value_is_harmless() {
        let seq = Sequencer::default();
        let panel = RecordingPanel::default();

        let stale = seq.begin();
        let current = seq.begin();

        if seq.is_current(stale) {
            resolve(&panel, Ok("<input name='stale'/>".to_string()));
        }
        if seq.is_current(current) {
            resolve(&panel, Ok("<input name='current'/>".to_string()));
        }

        assert_eq!(panel.html.borrow().len(), 1);
        assert_eq!(panel.content(), "<input name='current'/>");
    }
}
