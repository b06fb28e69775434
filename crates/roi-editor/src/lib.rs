pub mod config;
pub mod dispatch;
pub mod input;
pub mod shortcuts;
pub mod tools;

pub use config::EditorConfig;
pub use dispatch::{Claims, Cursor, InputHandler, Response, dispatch};
pub use input::{Button, InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{CurveEditor, EditState};
