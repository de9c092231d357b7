pub mod events;
pub mod outcome;
pub mod team;

pub use events::{EventKind, RejectReason, SessionEvent, SessionSummary};
pub use outcome::{AttemptOutcome, DiveDirection, ShotInput, DIRECTION_EPSILON};
pub use team::{Team, TeamColor};
