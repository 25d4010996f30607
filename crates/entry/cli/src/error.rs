use std::fmt;

/// A localizable, user-facing error: fatal, but understanding or fixing
/// it never requires Betty's internals or a stack trace. The top-level
/// error handler in [`crate::run`] prints these as a bare message;
/// every other error gets its full `anyhow` chain printed instead.
#[derive(Debug)]
pub struct UserFacingError(String);

impl UserFacingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UserFacingError {}

/// Print `error`: a bare message if any cause in the chain is a
/// [`UserFacingError`], the full chain otherwise.
pub fn print_error(error: &anyhow::Error) {
    for cause in error.chain() {
        if let Some(user_facing) = cause.downcast_ref::<UserFacingError>() {
            betty_logging::print_error(&user_facing.to_string());
            return;
        }
    }
    betty_logging::print_error(&format!("{error:#}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_the_message_only() {
        let error = UserFacingError::new("something went wrong");
        assert_eq!(error.to_string(), "something went wrong");
    }
}
