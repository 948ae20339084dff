pub mod api_card;
pub mod auth_button;
pub mod classification_demo;
pub mod demo_modal;
pub mod demo_panel;
pub mod detection_demo;
pub mod header;
pub mod results;
pub mod search_demo;
pub mod segmentation_demo;
pub mod toast;
pub mod upload_section;
pub mod utils;
