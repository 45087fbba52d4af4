use crate::EngineResult;

/// Signals the engine sends to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sig {
    /// Freeze (SIGSTOP).
    Stop,
    /// Unfreeze (SIGCONT).
    Cont,
    /// Finalize and exit (SIGINT).
    Interrupt,
}

#[cfg(unix)]
mod imp {
    use crate::{EngineError, EngineResult, process::Sig};

    use std::panic::Location;

    use error_location::ErrorLocation;
    use nix::{
        sys::signal::{Signal, kill},
        unistd::Pid,
    };
    use tracing::debug;

    pub fn is_alive(pid: i32) -> bool {
        pid > 0 && kill(Pid::from_raw(pid), None).is_ok()
    }

    #[track_caller]
    pub fn send(pid: i32, sig: Sig) -> EngineResult<()> {
        let signal = match sig {
            Sig::Stop => Signal::SIGSTOP,
            Sig::Cont => Signal::SIGCONT,
            Sig::Interrupt => Signal::SIGINT,
        };

        kill(Pid::from_raw(pid), signal).map_err(|e| EngineError::SignalFailed {
            pid,
            reason: format!("{}: {}", signal, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(pid, %signal, "Signal sent");
        Ok(())
    }
}

#[cfg(not(unix))]
mod imp {
    use crate::{EngineError, EngineResult, process::Sig};

    use std::panic::Location;

    use error_location::ErrorLocation;

    pub fn is_alive(_pid: i32) -> bool {
        false
    }

    #[track_caller]
    pub fn send(pid: i32, sig: Sig) -> EngineResult<()> {
        Err(EngineError::SignalFailed {
            pid,
            reason: format!("{:?} is not supported on this platform", sig),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Whether `pid` refers to a live process.
pub fn is_alive(pid: i32) -> bool {
    imp::is_alive(pid)
}

/// Deliver `sig` to `pid`.
#[track_caller]
pub fn send(pid: i32, sig: Sig) -> EngineResult<()> {
    imp::send(pid, sig)
}
