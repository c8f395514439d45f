//! Interactive command shell over a [`solid_bsp::BspTree`].

pub mod command;
pub mod session;

pub use command::{Command, CommandError};
pub use session::{Outcome, Session, HELP};
