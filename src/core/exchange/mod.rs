//! Polling hand-off between the signing learner and the observing instructor.

pub mod poll;
pub mod state;

pub use poll::{GesturePoll, ReplyPoll};
pub use state::{ExchangeError, ExchangeState, GestureStatus, InstructorReply, LearnerGesture};
