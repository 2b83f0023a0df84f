// Library exports for journal-richtext

pub mod config;
pub mod engine;
pub mod keymap;
pub mod palette;
pub mod richtext;

pub use config::EditorConfig;
pub use engine::{Engine, SerializedResult};
pub use richtext::format_state::FormatState;
pub use richtext::selection::{Selection, SelectionPoint};
pub use richtext::structured_editor::EditCommand;
pub use richtext::theme::ThemeMode;
