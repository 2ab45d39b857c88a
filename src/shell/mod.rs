//! Presentation shell: session state, line commands, text rendering and
//! background saves

mod command;
mod session;
mod render;
mod dispatch;

pub use command::{Command, MetaField, Panel, HELP};
pub use session::{Session, Panels};
pub use render::render;
pub use dispatch::SaveDispatcher;
