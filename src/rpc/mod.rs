//! Direct methods invoked by the cloud.
//!
//! ```text
//!  MethodCall ──▶ CommandDispatcher ──▶ MethodHandler ──▶ CommandResponse
//!                  (bound + lookup)      (name table)      (status + JSON)
//! ```

pub mod dispatcher;
pub mod methods;

use crate::app::ports::PeriodicTimer;
use crate::error::RegistryError;
use crate::termination::TerminationFlag;

use dispatcher::CommandDispatcher;
use methods::{HaltApplication, SetSensorPollTime};

/// Dispatcher with the standard method table.
pub fn standard_dispatcher<T>(
    termination: &TerminationFlag,
    timer: T,
) -> Result<CommandDispatcher, RegistryError>
where
    T: PeriodicTimer + 'static,
{
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(Box::new(HaltApplication::new(termination.clone())))?;
    dispatcher.register(Box::new(SetSensorPollTime::new(timer)))?;
    Ok(dispatcher)
}
