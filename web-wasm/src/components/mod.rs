pub mod error_banner;
pub mod export_buttons;
pub mod header;
pub mod preview_modal;
pub mod progress_bar;
pub mod results_panel;
pub mod settings_panel;
pub mod upload_area;
