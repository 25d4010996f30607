use std::sync::atomic::{AtomicBool, Ordering};

/// Failures from calling a lifecycle-gated method out of order.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("this component has already been bootstrapped")]
    AlreadyBootstrapped,

    #[error("this component has not been bootstrapped yet")]
    NotYetBootstrapped,
}

/// The bootstrapped/shut-down state machine every long-lived runtime
/// component (today: [`crate::Project`]) embeds as a field.
///
/// A component may only be bootstrapped once, `shutdown()` requires a
/// prior `bootstrap()`, and dropping a still-bootstrapped component is a
/// bug. `Drop` cannot run async code or propagate an error, so it logs
/// instead.
#[derive(Debug, Default)]
pub struct Lifecycle {
    bootstrapped: AtomicBool,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::Acquire)
    }

    pub fn assert_not_bootstrapped(&self) -> Result<(), LifecycleError> {
        if self.is_bootstrapped() {
            Err(LifecycleError::AlreadyBootstrapped)
        } else {
            Ok(())
        }
    }

    pub fn assert_bootstrapped(&self) -> Result<(), LifecycleError> {
        if self.is_bootstrapped() {
            Ok(())
        } else {
            Err(LifecycleError::NotYetBootstrapped)
        }
    }

    pub fn mark_bootstrapped(&self) {
        self.bootstrapped.store(true, Ordering::Release);
    }

    pub fn mark_shut_down(&self) {
        self.bootstrapped.store(false, Ordering::Release);
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        if self.is_bootstrapped() {
            tracing::error!(
                "a component was dropped while still bootstrapped; call shutdown() before dropping it"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_bootstrapped() {
        let lifecycle = Lifecycle::new();
        assert!(lifecycle.assert_not_bootstrapped().is_ok());
        assert!(lifecycle.assert_bootstrapped().is_err());
    }

    #[test]
    fn mark_bootstrapped_flips_state() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_bootstrapped();
        assert!(lifecycle.assert_bootstrapped().is_ok());
        assert!(lifecycle.assert_not_bootstrapped().is_err());
    }

    #[test]
    fn mark_shut_down_resets_state() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_bootstrapped();
        lifecycle.mark_shut_down();
        assert!(lifecycle.assert_not_bootstrapped().is_ok());
    }
}
