//! Presentation shell domain module.
//!
//! ```text
//! Idle --submit--> Loading --result--> ShownSuccess | ShownError
//! Shown* --clear--> Idle
//! ShownSuccess --send--> ShownSuccess (+ transient status)
//! ```

mod model;

pub use model::{
    EMPTY_PROMPT_MESSAGE, NOTHING_TO_SEND_MESSAGE, SENDING_STATUS, STATUS_DISPLAY,
    ShellModel, ShellPhase, StatusTicket, UNEXPECTED_REPLY_MESSAGE,
};
