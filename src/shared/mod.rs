pub mod busy_flag;
pub mod errors;
pub mod logging;

pub use busy_flag::{BusyFlag, BusyGuard};
pub use errors::{LaunchError, WizardError};
pub use logging::{append_event_log, now_secs};
