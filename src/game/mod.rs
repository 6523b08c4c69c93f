//! Game module

pub mod reveal;
pub mod round;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod words;

pub use round::{RoundController, RoundPhase};
pub use runner::{spawn_session, SessionTx};
pub use session::{Session, SessionCommand};
pub use words::WordList;
