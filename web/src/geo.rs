//! One-shot device geolocation with graceful fallback.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::model::Coordinate;

/// Request the current position once. `on_position` fires only on success;
/// every failure mode (unsupported API, permission denied, timeout) is
/// logged and otherwise ignored so the app keeps working without a
/// location: the map stays on its default centre and submission stays
/// disabled.
pub fn request_current_position(on_position: impl Fn(Coordinate) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let geolocation = match window.navigator().geolocation() {
        Ok(geolocation) => geolocation,
        Err(_) => {
            log::warn!("Geolocation is not supported by this browser");
            return;
        }
    };

    let success = Closure::<dyn FnMut(web_sys::Position)>::new(
        move |position: web_sys::Position| {
            let coords = position.coords();
            match Coordinate::new(coords.latitude(), coords.longitude()) {
                Some(coordinate) => on_position(coordinate),
                None => log::warn!("Device reported out-of-range coordinates"),
            }
        },
    );
    let failure = Closure::<dyn FnMut(web_sys::PositionError)>::new(
        |error: web_sys::PositionError| {
            log::warn!("Error getting location: {}", error.message());
        },
    );

    if geolocation
        .get_current_position_with_error_callback(
            success.as_ref().unchecked_ref(),
            Some(failure.as_ref().unchecked_ref()),
        )
        .is_err()
    {
        log::warn!("Geolocation request was rejected");
    }

    // One shot per session; the callbacks live until the page goes away.
    success.forget();
    failure.forget();
}
