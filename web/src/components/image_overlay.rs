//! Full-size image overlay, opened from a report popup thumbnail.

use leptos::*;

/// Shows `image` full-screen when set. Closes on the close button or a click
/// on the background scrim; either click is swallowed so it never reaches
/// the map underneath.
#[component]
pub fn ImageOverlay(
    #[prop(into)] image: Signal<Option<String>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        {move || {
            image
                .get()
                .map(|src| {
                    view! {
                        <div
                            class="image-overlay"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                on_close.call(());
                            }
                        >
                            <img
                                class="image-overlay-full"
                                src=src
                                alt="Flood report"
                                on:click=|ev| ev.stop_propagation()
                            />
                            <button
                                class="image-overlay-close"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    on_close.call(());
                                }
                            >
                                "Close"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
