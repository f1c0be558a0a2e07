//! Plain data types shared by the state container, the backend client and the
//! front end.

mod action;
mod backend;
mod error;
mod event;
mod message;
mod mode;
mod model_name;
mod role;
mod session;

pub use action::*;
pub use backend::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use mode::*;
pub use model_name::*;
pub use role::*;
pub use session::*;
