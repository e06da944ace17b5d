// /proc-backed process table implementation

use super::{ProcEntry, ProcessTable};
use crate::engine::priority::PriorityLevel;
use anyhow::{anyhow, bail, Result};
use nix::sys::signal::{self, killpg, Signal};
use nix::unistd::{getpgid, Pid};
use procfs::process::Process;
use std::fs;
use std::io::Error;

/// Live process table backed by /proc and Unix signals
#[derive(Debug, Default)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SystemProcessTable {
    /// Enumerate all processes visible under /proc.
    ///
    /// Processes that disappear mid-enumeration are skipped silently.
    /// Enumeration order is whatever the kernel hands back, stable within
    /// one call but not across runs.
    fn snapshot(&self) -> Result<Vec<ProcEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir("/proc")? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            // Check if directory name is a number (PID)
            if let Ok(pid) = name.parse::<i32>() {
                if let Ok(stat) = Process::new(pid).and_then(|p| p.stat()) {
                    entries.push(ProcEntry {
                        pid,
                        name: stat.comm,
                    });
                }
            }
        }

        Ok(entries)
    }

    fn set_priority(&self, pid: i32, level: PriorityLevel) -> Result<()> {
        let nice = level
            .nice()
            .ok_or_else(|| anyhow!("no such priority level: ordinal {}", level.ordinal()))?;

        let result = unsafe { libc::setpriority(libc::PRIO_PROCESS, pid as libc::id_t, nice) };

        if result != 0 {
            let err = Error::last_os_error();
            bail!("failed to set niceness of pid {} to {}: {}", pid, nice, err);
        }

        log::debug!("Set niceness of pid {} to {}", pid, nice);
        Ok(())
    }

    fn terminate(&self, pid: i32, entire_tree: bool) -> Result<()> {
        let nix_pid = Pid::from_raw(pid);

        if entire_tree {
            // Get the process group ID and signal the entire group
            match getpgid(Some(nix_pid)) {
                Ok(pgid) => {
                    log::debug!("Killing process group {} (leader pid {})", pgid, pid);
                    killpg(pgid, Signal::SIGKILL).map_err(|e| signal_error(pid, e))
                }
                Err(e) => {
                    log::warn!(
                        "Failed to get process group for pid {}: {}. Falling back to single process kill.",
                        pid,
                        e
                    );
                    signal::kill(nix_pid, Signal::SIGKILL).map_err(|e| signal_error(pid, e))
                }
            }
        } else {
            signal::kill(nix_pid, Signal::SIGKILL).map_err(|e| signal_error(pid, e))
        }
    }
}

fn signal_error(pid: i32, errno: nix::errno::Errno) -> anyhow::Error {
    match errno {
        nix::errno::Errno::ESRCH => anyhow!("process {} no longer exists", pid),
        nix::errno::Errno::EPERM => anyhow!("permission denied signalling process {}", pid),
        e => anyhow!("signal error for process {}: {}", pid, e),
    }
}
