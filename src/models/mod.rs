// Domain models (ported from the original Go service)

mod fields;
mod report;
mod session;

pub use fields::{BrowserClient, DecodeError, Platform, Resolution};
pub use report::{PeakInterval, ReportRow};
pub use session::{BrowserClientInfo, ViewerSession};
