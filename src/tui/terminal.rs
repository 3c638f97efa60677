//! Terminal mode control
//!
//! Raw mode sits behind [`RawTerminal`] so the browser can be driven by a
//! fake terminal in tests. [`RawModeGuard`] restores the previous mode when
//! dropped, which covers normal exits, early returns on errors and panics.
//! Termination signals never unwind, so [`install_termination_signals`]
//! runs a [`TerminalRestorer`] from a listener thread before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use tracing::{debug, warn};

use crate::error::{DouglasError, Result};

/// Capability to switch a terminal into raw mode and back
#[cfg_attr(test, mockall::automock(type Token = ();))]
pub trait RawTerminal {
    /// Proof of a raw-mode switch; hand it back to [`RawTerminal::restore`]
    type Token;

    /// Raw, non-canonical, non-echoing input
    fn enter_raw_mode(&mut self) -> Result<Self::Token>;

    /// Return to the mode active before the matching `enter_raw_mode`
    fn restore(&mut self, token: Self::Token) -> Result<()>;
}

/// Restore token for [`CrosstermTerminal`]
#[derive(Debug)]
pub struct CrosstermToken {
    was_raw: bool,
}

/// The process's controlling terminal, via crossterm
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl RawTerminal for CrosstermTerminal {
    type Token = CrosstermToken;

    fn enter_raw_mode(&mut self) -> Result<CrosstermToken> {
        let was_raw = is_raw_mode_enabled().map_err(|e| DouglasError::Terminal(e.to_string()))?;
        enable_raw_mode().map_err(|e| DouglasError::Terminal(e.to_string()))?;
        Ok(CrosstermToken { was_raw })
    }

    fn restore(&mut self, token: CrosstermToken) -> Result<()> {
        if token.was_raw {
            return Ok(());
        }
        disable_raw_mode().map_err(|e| DouglasError::Terminal(e.to_string()))
    }
}

/// Raw mode held for a scope
pub struct RawModeGuard<'a, T: RawTerminal> {
    terminal: &'a mut T,
    token: Option<T::Token>,
}

impl<'a, T: RawTerminal> RawModeGuard<'a, T> {
    /// Enter raw mode until the guard is dropped
    pub fn acquire(terminal: &'a mut T) -> Result<Self> {
        let token = terminal.enter_raw_mode()?;
        Ok(Self {
            terminal,
            token: Some(token),
        })
    }

    /// Run `f` with the terminal back in its previous (cooked) mode, then
    /// re-enter raw mode.
    pub fn suspend<R>(&mut self, f: impl FnOnce() -> R) -> Result<R> {
        if let Some(token) = self.token.take() {
            self.terminal.restore(token)?;
        }
        let result = f();
        self.token = Some(self.terminal.enter_raw_mode()?);
        Ok(result)
    }

    pub fn is_raw(&self) -> bool {
        self.token.is_some()
    }
}

impl<T: RawTerminal> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            if let Err(e) = self.terminal.restore(token) {
                warn!("failed to restore terminal mode: {}", e);
            }
        }
    }
}

/// Restores the terminal at most once, from whichever thread gets there first
#[derive(Clone)]
pub struct TerminalRestorer {
    restored: Arc<AtomicBool>,
    restore: Arc<dyn Fn() -> Result<()> + Send + Sync>,
}

impl TerminalRestorer {
    pub fn new(restore: impl Fn() -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            restored: Arc::new(AtomicBool::new(false)),
            restore: Arc::new(restore),
        }
    }

    /// Leave raw mode on the controlling terminal
    pub fn crossterm() -> Self {
        Self::new(|| disable_raw_mode().map_err(|e| DouglasError::Terminal(e.to_string())))
    }

    pub fn restore(&self) -> Result<()> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        (self.restore)()
    }

    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    SigInt,
    SigTerm,
}

impl TerminationSignal {
    /// Conventional `128 + signo` shell status
    pub fn exit_code(self) -> i32 {
        match self {
            TerminationSignal::SigInt => 130,
            TerminationSignal::SigTerm => 143,
        }
    }

    #[cfg(unix)]
    fn from_raw(signo: i32) -> Option<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};

        match signo {
            SIGINT => Some(TerminationSignal::SigInt),
            SIGTERM => Some(TerminationSignal::SigTerm),
            _ => None,
        }
    }
}

/// SIGINT/SIGTERM listener; stops listening when dropped
pub struct SignalCleanup {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: Option<std::thread::JoinHandle<()>>,
}

/// Restore the terminal and exit with `128 + signo` on SIGINT or SIGTERM.
///
/// Keep the returned value alive for as long as raw mode may be active.
#[cfg(unix)]
pub fn install_termination_signals(restorer: TerminalRestorer) -> Result<SignalCleanup> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();
    let thread = std::thread::spawn(move || {
        for signo in signals.forever() {
            let Some(signal) = TerminationSignal::from_raw(signo) else {
                continue;
            };
            debug!(?signal, "termination signal");
            if let Err(e) = restorer.restore() {
                warn!("failed to restore terminal mode: {}", e);
            }
            std::process::exit(signal.exit_code());
        }
    });

    Ok(SignalCleanup {
        handle,
        thread: Some(thread),
    })
}

#[cfg(not(unix))]
pub fn install_termination_signals(_restorer: TerminalRestorer) -> Result<SignalCleanup> {
    Ok(SignalCleanup {})
}

#[cfg(unix)]
impl Drop for SignalCleanup {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_guard_restores_on_drop() {
        let mut terminal = MockRawTerminal::new();
        let mut seq = Sequence::new();
        terminal
            .expect_enter_raw_mode()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        terminal
            .expect_restore()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let guard = RawModeGuard::acquire(&mut terminal).unwrap();
        assert!(guard.is_raw());
        drop(guard);
    }

    #[test]
    fn test_failed_acquire_restores_nothing() {
        let mut terminal = MockRawTerminal::new();
        terminal
            .expect_enter_raw_mode()
            .times(1)
            .returning(|| Err(DouglasError::Terminal("not a tty".to_string())));
        terminal.expect_restore().never();

        assert!(RawModeGuard::acquire(&mut terminal).is_err());
    }

    #[test]
    fn test_suspend_restores_then_reenters() {
        let mut terminal = MockRawTerminal::new();
        let mut seq = Sequence::new();
        terminal
            .expect_enter_raw_mode()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        terminal
            .expect_restore()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        terminal
            .expect_enter_raw_mode()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        terminal
            .expect_restore()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut guard = RawModeGuard::acquire(&mut terminal).unwrap();
        let answer = guard.suspend(|| 42).unwrap();
        assert_eq!(answer, 42);
        assert!(guard.is_raw());
    }

    #[test]
    fn test_restore_failure_on_drop_is_swallowed() {
        let mut terminal = MockRawTerminal::new();
        terminal.expect_enter_raw_mode().returning(|| Ok(()));
        terminal
            .expect_restore()
            .times(1)
            .returning(|_| Err(DouglasError::Terminal("gone".to_string())));

        let guard = RawModeGuard::acquire(&mut terminal).unwrap();
        drop(guard);
    }

    #[test]
    fn test_guard_restores_during_unwind() {
        let mut terminal = MockRawTerminal::new();
        terminal.expect_enter_raw_mode().returning(|| Ok(()));
        terminal.expect_restore().times(1).returning(|_| Ok(()));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RawModeGuard::acquire(&mut terminal).unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        terminal.checkpoint();
    }

    #[test]
    fn test_restorer_runs_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let restorer = TerminalRestorer::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let from_signal_thread = restorer.clone();

        assert!(!restorer.is_restored());
        std::thread::spawn(move || from_signal_thread.restore().unwrap())
            .join()
            .unwrap();
        restorer.restore().unwrap();
        restorer.restore().unwrap();

        assert!(restorer.is_restored());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restorer_failure_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let restorer = TerminalRestorer::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DouglasError::Terminal("gone".to_string()))
        });

        assert!(restorer.restore().is_err());
        assert!(restorer.restore().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_termination_exit_codes() {
        assert_eq!(TerminationSignal::SigInt.exit_code(), 130);
        assert_eq!(TerminationSignal::SigTerm.exit_code(), 143);
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_listener_stops_on_drop() {
        let restorer = TerminalRestorer::new(|| Ok(()));
        let cleanup = install_termination_signals(restorer.clone()).unwrap();
        drop(cleanup);
        assert!(!restorer.is_restored());
    }
}
