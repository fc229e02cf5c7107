use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once; honors `RUST_LOG`, defaults to `info`.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Sharing/lock violations and similar errors that usually clear up after a
/// moment (antivirus scanners, sync clients, network drives).
#[cfg(windows)]
fn is_transient(e: &io::Error) -> bool {
    // 5 access denied, 32 sharing violation, 33 lock violation, 1224 mapped section open
    e.kind() == io::ErrorKind::Interrupted || matches!(e.raw_os_error(), Some(5 | 32 | 33 | 1224))
}

#[cfg(not(windows))]
fn is_transient(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::Interrupted
}

/// Run `op` up to `tries` times, sleeping `delay_ms * attempt` after each
/// transient failure. Other errors return immediately.
fn with_backoff<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let tries = tries.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Err(e) if attempt < tries && is_transient(&e) => {
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
            }
            other => return other,
        }
    }
}

/// Create (truncate) a file, retrying transient failures.
pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_backoff(tries, delay_ms, || File::create(path))
}

/// Move `tmp` over `dest`. Falls back to copy + remove when rename is refused
/// (e.g. across filesystems).
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    let (tries, delay_ms) = (20, 50);
    if with_backoff(tries, delay_ms, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    with_backoff(tries, delay_ms, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    with_backoff(tries, delay_ms, || match fs::remove_file(tmp) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    })
    .with_context(|| format!("remove {}", tmp.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_gives_up_on_permanent_errors() {
        let mut calls = 0;
        let res: io::Result<()> = with_backoff(5, 0, || {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
        });
        assert!(res.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn backoff_retries_transient_errors() {
        let mut calls = 0;
        let res = with_backoff(3, 0, || {
            calls += 1;
            if calls < 3 { Err(io::Error::from(io::ErrorKind::Interrupted)) } else { Ok(calls) }
        });
        assert_eq!(res.unwrap(), 3);
    }

    #[cfg(windows)]
    #[test]
    fn sharing_violation_is_retried_on_windows() {
        let mut calls = 0;
        let res = with_backoff(3, 0, || {
            calls += 1;
            if calls < 3 { Err(io::Error::from_raw_os_error(32)) } else { Ok(calls) }
        });
        assert_eq!(res.unwrap(), 3);
    }

    // EIO and EPIPE share their numbers with Windows' access denied and
    // sharing violation codes.
    #[cfg(unix)]
    #[test]
    fn eio_and_epipe_are_not_retried() {
        for code in [5, 32] {
            let mut calls = 0;
            let res: io::Result<()> = with_backoff(16, 0, || {
                calls += 1;
                Err(io::Error::from_raw_os_error(code))
            });
            assert!(res.is_err());
            assert_eq!(calls, 1, "errno {code}");
        }
    }

    #[test]
    fn replace_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("a.tmp");
        let dest = dir.path().join("a.tsv");
        fs::write(&dest, "old").unwrap();
        fs::write(&tmp, "new").unwrap();
        replace_file_atomic_backoff(&tmp, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(!tmp.exists());
    }
}
