//! System orchestration, startup, and shutdown logic.

pub mod clinic_system;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod seed;

pub use self::clinic_system::*;
pub use self::config::*;
pub use self::dashboard::*;
pub use self::error::*;
pub use self::logging::*;
pub use self::seed::*;
