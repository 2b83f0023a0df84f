pub mod color;
pub mod format_state;
pub mod html_converter;
pub mod selection;
pub mod structured_document;
pub mod structured_editor;
pub mod theme;
