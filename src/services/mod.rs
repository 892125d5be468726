pub mod api_client;
pub mod csv_service;
pub mod flows;
pub mod render_service;
pub mod ui_slots;
pub mod validation;
