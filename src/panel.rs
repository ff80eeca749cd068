//! The two entry points: the panel container and the job reference field.

use leptos::html::Div;
use leptos::prelude::*;

use crate::loader::PanelLoader;

/// The panel whose content is owned and replaced wholesale by the loader.
///
/// The host creates the `NodeRef` and hands the same handle to
/// [`PanelLoader::new`]; nothing else may assume persistent structure
/// inside this element.
#[component]
pub fn ParamsPanel(node_ref: NodeRef<Div>) -> impl IntoView {
    view! { <div class="params-panel" node_ref=node_ref></div> }
}

/// Text input naming the job whose parameters should be loaded.
///
/// Blur fires one fetch-render cycle with the field's live value; with
/// `load_on_mount` an extra cycle runs once after mount so a pre-filled
/// value populates the panel on initial render.
#[component]
pub fn JobReferenceField(
    #[prop(into)] id: String,
    #[prop(into)] value: RwSignal<String>,
    loader: PanelLoader,
    #[prop(optional)] load_on_mount: bool,
) -> impl IntoView {
    let blur_loader = loader.clone();

    if load_on_mount {
        let mount_loader = loader.clone();
        Effect::new(move || {
            mount_loader.load(&value.get_untracked());
        });
    }

    view! {
        <input
            type="text"
            id=id
            class="job-reference-field"
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev))
            on:blur=move |_| blur_loader.load(&value.get_untracked())
        />
    }
}
