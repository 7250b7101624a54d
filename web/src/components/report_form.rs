//! Report composer – image selection (picker, drag-drop, live camera) and
//! submission.
//!
//! The draft (selected file + derived preview URL) lives here and nowhere
//! else. A failed submission keeps the draft so the user can retry without
//! re-selecting; a successful one clears it.

use leptos::html::Input;
use leptos::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, Url};

use crate::api::{self, ApiError, ImageUpload};
use crate::components::camera_capture::{camera_supported, CameraCapture};
use crate::model::{Coordinate, FloodReport};

pub(crate) const MISSING_IMAGE: &str = "Please select an image.";
pub(crate) const MISSING_LOCATION: &str = "Location not available yet.";
const GENERIC_SUBMIT_ERROR: &str = "Failed to submit report.";

#[component]
pub fn ReportForm(
    #[prop(into)] location: Signal<Option<Coordinate>>,
    #[prop(into)] on_submitted: Callback<FloodReport>,
) -> impl IntoView {
    let (file, set_file) = create_signal::<Option<File>>(None);
    let (preview, set_preview) = create_signal::<Option<String>>(None);
    let (loading, set_loading) = create_signal(false);
    let (error, set_error) = create_signal::<Option<String>>(None);
    let (camera_open, set_camera_open) = create_signal(false);
    let input_ref = create_node_ref::<Input>();

    // Sole owner of the preview object URL; every replacement and teardown
    // path revokes through here so at most one URL is ever live.
    let clear_preview = move || {
        if let Some(url) = preview.get_untracked() {
            let _ = Url::revoke_object_url(&url);
        }
        set_preview.set(None);
    };
    on_cleanup(clear_preview);

    // Shared by the picker, drag-drop, and the camera.
    let select_file = move |candidate: File| {
        if !is_image(&candidate.type_()) {
            set_error.set(Some("Please select an image file.".into()));
            return;
        }
        clear_preview();
        if let Ok(url) = Url::create_object_url_with_blob(&candidate) {
            set_preview.set(Some(url));
        }
        set_file.set(Some(candidate));
        set_error.set(None);
    };

    let on_input_change = move |ev: ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        if let Some(picked) = input.files().and_then(|files| files.get(0)) {
            select_file(picked);
        }
        // Allow picking the same file again later.
        input.set_value("");
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        let dropped = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0));
        if let Some(dropped) = dropped {
            select_file(dropped);
        }
    };

    let on_capture = Callback::new(move |captured: File| {
        set_camera_open.set(false);
        select_file(captured);
    });
    let on_camera_cancel = Callback::new(move |_| set_camera_open.set(false));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        if let Some(message) = draft_error(
            file.get_untracked().is_some(),
            location.get_untracked().is_some(),
        ) {
            set_error.set(Some(message.into()));
            return;
        }
        let (Some(selected), Some(coordinate)) =
            (file.get_untracked(), location.get_untracked())
        else {
            return;
        };

        set_error.set(None);
        set_loading.set(true);
        spawn_local(async move {
            let upload = match read_upload(&selected).await {
                Ok(upload) => upload,
                Err(err) => {
                    log::warn!("Could not read selected image: {err:?}");
                    set_error.set(Some(GENERIC_SUBMIT_ERROR.into()));
                    set_loading.set(false);
                    return;
                }
            };
            match api::submit_report(upload, coordinate).await {
                Ok(report) => {
                    clear_preview();
                    set_file.set(None);
                    if let Some(input) = input_ref.get_untracked() {
                        input.set_value("");
                    }
                    on_submitted.call(report);
                }
                // Draft stays intact for retry.
                Err(err) => set_error.set(Some(submit_error_message(err))),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="upload-form-container">
            <h2>"Report Flood"</h2>
            {move || match location.get() {
                Some(coordinate) => {
                    view! {
                        <p class="location-info">
                            {format!(
                                "Location: {:.4}, {:.4}",
                                coordinate.latitude,
                                coordinate.longitude,
                            )}
                        </p>
                    }
                        .into_view()
                }
                None => {
                    view! { <p class="location-warning">"Waiting for location..."</p> }
                        .into_view()
                }
            }}

            <form on:submit=on_submit>
                <div
                    class="drop-zone"
                    on:dragover=|ev| ev.prevent_default()
                    on:drop=on_drop
                    on:click=move |_| {
                        if let Some(input) = input_ref.get() {
                            input.click();
                        }
                    }
                >
                    {move || match preview.get() {
                        Some(url) => {
                            view! { <img class="preview-image" src=url alt="Selected image"/> }
                                .into_view()
                        }
                        None => {
                            view! {
                                <p class="drop-hint">"Drop a photo here or click to browse"</p>
                            }
                                .into_view()
                        }
                    }}
                </div>
                <input
                    type="file"
                    accept="image/*"
                    class="file-input"
                    node_ref=input_ref
                    on:change=on_input_change
                />

                <Show when=camera_supported>
                    <button
                        type="button"
                        class="camera-button"
                        on:click=move |_| set_camera_open.set(true)
                    >
                        "Take Photo"
                    </button>
                </Show>

                {move || error.get().map(|message| view! { <p class="error-message">{message}</p> })}

                <button
                    type="submit"
                    class="submit-button"
                    disabled=move || loading.get() || location.get().is_none()
                >
                    {move || if loading.get() { "Submitting..." } else { "Submit Report" }}
                </button>
            </form>

            <Show when=move || camera_open.get()>
                <CameraCapture on_capture=on_capture on_cancel=on_camera_cancel/>
            </Show>
        </div>
    }
}

/// Submit preconditions, checked before any network work.
pub(crate) fn draft_error(has_image: bool, has_location: bool) -> Option<&'static str> {
    if !has_image {
        return Some(MISSING_IMAGE);
    }
    if !has_location {
        return Some(MISSING_LOCATION);
    }
    None
}

/// Only blobs that declare an image MIME type are accepted.
pub(crate) fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

fn submit_error_message(err: ApiError) -> String {
    match err {
        ApiError::Rejected(message) => message,
        other => {
            log::warn!("Upload error: {other}");
            GENERIC_SUBMIT_ERROR.into()
        }
    }
}

/// Detach the blob from its DOM handle so the request owns plain bytes.
async fn read_upload(file: &File) -> Result<ImageUpload, wasm_bindgen::JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageUpload {
        bytes,
        file_name: file.name(),
        mime: file.type_(),
    })
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_without_image_fails_validation() {
        assert_eq!(draft_error(false, true), Some(MISSING_IMAGE));
        // Image is reported first even when both are missing.
        assert_eq!(draft_error(false, false), Some(MISSING_IMAGE));
    }

    #[test]
    fn submit_without_location_fails_validation() {
        assert_eq!(draft_error(true, false), Some(MISSING_LOCATION));
    }

    #[test]
    fn complete_draft_passes_validation() {
        assert_eq!(draft_error(true, true), None);
    }

    #[test]
    fn only_image_mime_types_are_accepted() {
        assert!(is_image("image/jpeg"));
        assert!(is_image("image/png"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("video/mp4"));
        assert!(!is_image(""));
    }

    #[test]
    fn service_error_message_is_surfaced_verbatim() {
        assert_eq!(
            submit_error_message(ApiError::Rejected("too large".into())),
            "too large"
        );
    }

    #[test]
    fn other_failures_fall_back_to_generic_message() {
        assert_eq!(
            submit_error_message(ApiError::Malformed),
            GENERIC_SUBMIT_ERROR
        );
    }
}
