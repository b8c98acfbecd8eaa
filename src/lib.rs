// Library surface: the scoring engine and its session-side collaborators.
// Keep this lean; there is no UI or transport layer here.
pub mod error;
pub mod event;
pub mod history;
pub mod mistypes;
pub mod recorder;
pub mod scorer;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use event::{KeyAction, KeyEvent, TypedStatus};
pub use mistypes::MistypeTable;
pub use recorder::{SessionRecorder, SessionReport};
pub use scorer::{score, SessionStats};
