mod actions;
mod app_state;
pub mod markup;
mod sessions;

pub use actions::*;
pub use app_state::*;
pub use sessions::*;
