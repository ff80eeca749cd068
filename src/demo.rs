//! Standalone demo page: one job field bound to one parameter panel.
//!
//! Build with `--features demo` and serve the wasm bundle; the descriptor
//! endpoint is expected at `/descriptor/parameters` on the same origin.

use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::loader::PanelLoader;
use crate::panel::{JobReferenceField, ParamsPanel};

#[component]
fn DemoForm() -> impl IntoView {
    let job = RwSignal::new(String::new());
    let panel_ref = NodeRef::new();

    let rehydrate = Callback::new(|el: web_sys::HtmlDivElement| {
        log::debug!(
            "rehydrating parameter panel with {} elements",
            el.child_element_count()
        );
    });
    let loader = PanelLoader::new("/descriptor", "", panel_ref, Some(rehydrate));

    view! {
        <form>
            <label for="job">"Job name"</label>
            <JobReferenceField id="job" value=job loader=loader load_on_mount=true/>
            <ParamsPanel node_ref=panel_ref/>
        </form>
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(DemoForm);
}
