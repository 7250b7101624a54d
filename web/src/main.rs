//! WASM entry point – mounts the app into the document body.

use seeflood_web::app::App;

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount_to_body(App);
}
