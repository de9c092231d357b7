pub mod session_json;

pub use session_json::{run_session_json, SessionRequest, SessionResponse, ShotData};
