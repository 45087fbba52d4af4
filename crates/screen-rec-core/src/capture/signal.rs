use crate::CoreResult;

/// Control signals delivered directly to the capture process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Freeze encoding (SIGSTOP).
    Pause,
    /// Unfreeze encoding (SIGCONT).
    Resume,
    /// Ask the process to finalize its output and exit (SIGINT).
    Interrupt,
}

/// Delivers signals to, and probes, processes by pid.
pub trait ProcessSignaller: Send + Sync {
    /// Deliver `signal` to `pid`.
    ///
    /// # Errors
    ///
    /// `SignalDeliveryFailed` when the signal cannot be delivered.
    fn signal(&self, pid: i32, signal: ControlSignal) -> CoreResult<()>;

    /// Whether `pid` refers to a live process.
    fn is_alive(&self, pid: i32) -> bool;
}

/// [`ProcessSignaller`] using POSIX signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

#[cfg(unix)]
impl ProcessSignaller for NixSignaller {
    #[track_caller]
    fn signal(&self, pid: i32, signal: ControlSignal) -> CoreResult<()> {
        use crate::CoreError;

        use std::panic::Location;

        use error_location::ErrorLocation;
        use nix::{
            sys::signal::{Signal, kill},
            unistd::Pid,
        };
        use tracing::debug;

        // 0 and negative pids address process groups.
        if pid <= 0 {
            return Err(CoreError::SignalDeliveryFailed {
                pid,
                reason: "refusing to signal a process group".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let sig = match signal {
            ControlSignal::Pause => Signal::SIGSTOP,
            ControlSignal::Resume => Signal::SIGCONT,
            ControlSignal::Interrupt => Signal::SIGINT,
        };

        kill(Pid::from_raw(pid), sig).map_err(|e| CoreError::SignalDeliveryFailed {
            pid,
            reason: format!("{}: {}", sig, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(pid, signal = %sig, "Signal delivered");

        Ok(())
    }

    fn is_alive(&self, pid: i32) -> bool {
        use nix::{sys::signal::kill, unistd::Pid};

        pid > 0 && kill(Pid::from_raw(pid), None).is_ok()
    }
}

#[cfg(not(unix))]
impl ProcessSignaller for NixSignaller {
    #[track_caller]
    fn signal(&self, pid: i32, signal: ControlSignal) -> CoreResult<()> {
        Err(crate::CoreError::SignalDeliveryFailed {
            pid,
            reason: format!("{:?} is not supported on this platform", signal),
            location: error_location::ErrorLocation::from(std::panic::Location::caller()),
        })
    }

    fn is_alive(&self, _pid: i32) -> bool {
        false
    }
}
