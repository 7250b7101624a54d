pub mod camera_capture;
pub mod image_overlay;
pub mod map_view;
pub mod report_form;
