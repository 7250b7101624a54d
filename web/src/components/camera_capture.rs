//! Live camera capture overlay.
//!
//! One component instance is one capture session: the stream is acquired on
//! mount and released on whichever exit happens first – photo taken, cancel,
//! or unmount. Another capture needs a fresh instance.

use leptos::html::{Canvas, Video};
use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FilePropertyBag, MediaStream, MediaStreamConstraints, MediaStreamTrack};

/// JPEG encoding quality for captured stills.
const CAPTURE_QUALITY: f64 = 0.8;

const CAMERA_ERROR: &str = "Could not access camera. Please ensure permissions are granted.";

/// Whether this browser exposes a camera API at all. When it does not, the
/// composer never offers the capture path and only the file picker remains.
pub fn camera_supported() -> bool {
    web_sys::window()
        .map(|window| window.navigator().media_devices().is_ok())
        .unwrap_or(false)
}

#[component]
pub fn CameraCapture(
    #[prop(into)] on_capture: Callback<File>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let video_ref = create_node_ref::<Video>();
    let canvas_ref = create_node_ref::<Canvas>();
    let (error, set_error) = create_signal::<Option<String>>(None);

    // The live stream, shared by every exit path and `take`n exactly once.
    let stream = store_value::<Option<MediaStream>>(None);
    let release_stream = move || {
        if let Some(active) = stream.try_update_value(|slot| slot.take()).flatten() {
            stop_tracks(&active);
        }
    };
    on_cleanup(release_stream);

    spawn_local(async move {
        match acquire_stream().await {
            Ok(media) => {
                if let Some(video) = video_ref.get_untracked() {
                    video.set_src_object(Some(&media));
                }
                // If the component was torn down while the permission prompt
                // was open, there is no slot left; stop the tracks ourselves.
                let stored = stream
                    .try_update_value(|slot| *slot = Some(media.clone()))
                    .is_some();
                if !stored {
                    stop_tracks(&media);
                }
            }
            Err(err) => {
                log::warn!("Error accessing camera: {err:?}");
                set_error.set(Some(CAMERA_ERROR.into()));
            }
        }
    });

    let cancel = move |_| {
        release_stream();
        on_cancel.call(());
    };

    let take_photo = move |_| {
        let (Some(video), Some(canvas)) = (video_ref.get(), canvas_ref.get()) else {
            return;
        };
        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            // Stream not delivering frames yet.
            return;
        }
        canvas.set_width(width);
        canvas.set_height(height);
        let Ok(Some(context)) = canvas.get_context("2d") else {
            return;
        };
        let Ok(context) = context.dyn_into::<web_sys::CanvasRenderingContext2d>() else {
            return;
        };
        if context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .is_err()
        {
            return;
        }

        let callback = Closure::once_into_js(move |value: JsValue| {
            release_stream();
            match value.dyn_into::<Blob>() {
                Ok(blob) => match still_from_blob(&blob) {
                    Ok(file) => on_capture.call(file),
                    Err(err) => log::warn!("Could not build capture file: {err:?}"),
                },
                Err(_) => log::warn!("Canvas produced no blob"),
            }
        });
        if canvas
            .to_blob_with_type_and_encoder_options(
                callback.unchecked_ref(),
                "image/jpeg",
                &JsValue::from_f64(CAPTURE_QUALITY),
            )
            .is_err()
        {
            release_stream();
            log::warn!("Could not encode capture");
        }
    };

    view! {
        <div class="camera-overlay">
            {move || match error.get() {
                Some(message) => {
                    view! {
                        <div class="camera-error">
                            <p>{message}</p>
                            <button class="camera-close" on:click=cancel>
                                "Close"
                            </button>
                        </div>
                    }
                        .into_view()
                }
                None => {
                    view! {
                        <video
                            class="camera-preview"
                            node_ref=video_ref
                            autoplay=true
                            playsinline=true
                        ></video>
                        <canvas class="camera-canvas" node_ref=canvas_ref></canvas>
                        <div class="camera-controls">
                            <button class="camera-cancel" on:click=cancel>
                                "Cancel"
                            </button>
                            <button class="camera-shutter" on:click=take_photo>
                                "Snap Photo"
                            </button>
                        </div>
                    }
                        .into_view()
                }
            }}
        </div>
    }
}

/// Request a video-only stream, preferring the rear-facing camera.
async fn acquire_stream() -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints());
    constraints.set_audio(&JsValue::FALSE);
    let promise = devices.get_user_media_with_constraints(&constraints)?;
    JsFuture::from(promise).await?.dyn_into::<MediaStream>()
}

/// `{ facingMode: { ideal: "environment" } }`
fn video_constraints() -> JsValue {
    let facing = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&facing, &"ideal".into(), &"environment".into());
    let video = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&video, &"facingMode".into(), &facing);
    video.into()
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Wrap an encoded frame in a `File`, named like the files a phone camera
/// roll produces.
fn still_from_blob(blob: &Blob) -> Result<File, JsValue> {
    let parts = js_sys::Array::of1(blob);
    let options = FilePropertyBag::new();
    options.set_type("image/jpeg");
    File::new_with_blob_sequence_and_options(
        &parts,
        &capture_file_name(js_sys::Date::now()),
        &options,
    )
}

fn capture_file_name(timestamp_ms: f64) -> String {
    format!("camera_capture_{}.jpg", timestamp_ms as u64)
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_file_names_carry_timestamp_and_extension() {
        assert_eq!(
            capture_file_name(1_754_900_000_123.0),
            "camera_capture_1754900000123.jpg"
        );
    }

    #[test]
    fn capture_quality_stays_below_max() {
        assert!(CAPTURE_QUALITY > 0.0 && CAPTURE_QUALITY < 1.0);
    }
}
