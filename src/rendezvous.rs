//! One-shot startup handshake between a launching thread and its worker.
//!
//! [`pair()`] creates two linked halves.  The worker consumes its
//! [`StartSignal`] as the very first action of its entry routine; the
//! launcher consumes the matching [`StartAwait`] and is blocked until the
//! signal has fired.  Once `StartAwait::wait` returns, the worker has
//! provably reached its signal point; there is no window in which the
//! launcher resumes while the worker has not yet begun executing.
//!
//! Each half is single-use by construction: `signal` and `wait` take
//! `self`, so firing either side twice is a compile error rather than a
//! runtime one.  Dropping the signal half without signalling would leave
//! the waiter blocked forever; the waiter traps that programming error
//! with a panic instead.

use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Signalled,
    Abandoned,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<State>,
    signalled: Condvar,
}

/// creates the two linked halves of a rendezvous.
pub fn pair() -> (StartSignal, StartAwait) {
    let inner = Arc::new(Inner {
        state: Mutex::new(State::Pending),
        signalled: Condvar::new(),
    });
    (
        StartSignal {
            inner: inner.clone(),
        },
        StartAwait { inner },
    )
}

/// the worker-side half of the handshake.
#[derive(Debug)]
pub struct StartSignal {
    inner: Arc<Inner>,
}

impl StartSignal {
    /// marks the worker as started and wakes the awaiting launcher.
    ///
    /// Must be invoked before any job-specific work.
    pub fn signal(self) {
        let mut state = self.inner.state.lock().unwrap();
        debug_assert_eq!(State::Pending, *state);
        *state = State::Signalled;
        drop(state);
        self.inner.signalled.notify_one();
    }
}

impl Drop for StartSignal {
    fn drop(&mut self) {
        // a signal half that goes away unsignalled can never complete the
        // handshake; wake the waiter so it can trap the error.
        let mut state = self.inner.state.lock().unwrap();
        if *state == State::Pending {
            *state = State::Abandoned;
            drop(state);
            self.inner.signalled.notify_one();
        }
    }
}

/// the launcher-side half of the handshake.
#[derive(Debug)]
pub struct StartAwait {
    inner: Arc<Inner>,
}

impl StartAwait {
    /// blocks the calling thread until the paired [StartSignal] fires.
    ///
    /// # Panics
    ///
    /// Panics if the signal half was dropped without signalling.  The
    /// handshake can then never complete, and blocking forever would hide
    /// the bug.
    pub fn wait(self) {
        let mut state = self.inner.state.lock().unwrap();
        while *state == State::Pending {
            state = self.inner.signalled.wait(state).unwrap();
        }
        match *state {
            State::Signalled => (),
            State::Abandoned => {
                panic!("rendezvous signal half dropped without signalling")
            }
            State::Pending => unreachable!(),
        }
    }
}
