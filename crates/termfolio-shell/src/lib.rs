//! Interactive command engine behind the portfolio terminal: line editing,
//! history recall, completion, theme state and command dispatch, wired
//! together by [`Session`].

pub mod clock;
pub mod commands;
pub mod completion;
pub mod editor;
pub mod history;
pub mod session;
pub mod theme;

pub use clock::{Clock, FixedClock, SystemClock, format_local_datetime};
pub use commands::{CommandContext, Outcome, Picker, dispatch, parse_line, vocabulary};
pub use completion::{Completion, complete};
pub use editor::LineEditor;
pub use history::{HistoryBuffer, RecallDirection};
pub use session::{InputEvent, OutputEntry, OutputLog, Session, SessionOptions, SessionState};
pub use theme::ThemeState;
