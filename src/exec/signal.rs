// src/exec/signal.rs

use tracing::debug;

use crate::errors::Result;
use crate::shutdown::ShutdownSignal;

/// Send `signal` to `pid`. A process that no longer exists is not an error.
#[cfg(unix)]
pub fn send_signal(pid: u32, signal: ShutdownSignal) -> Result<()> {
    use anyhow::anyhow;
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| anyhow!("pid {pid} does not fit in pid_t"))?;

    match kill(Pid::from_raw(raw), signal.as_nix()) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => {
            debug!(pid, signal = %signal, "process already gone; nothing to signal");
            Ok(())
        }
        Err(e) => Err(anyhow!("kill({pid}, {signal}) failed: {e}").into()),
    }
}

#[cfg(not(unix))]
pub fn send_signal(pid: u32, signal: ShutdownSignal) -> Result<()> {
    debug!(
        pid,
        signal = %signal,
        "signal forwarding is unix-only; the console delivers Ctrl+C to children"
    );
    Ok(())
}
