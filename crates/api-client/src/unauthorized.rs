/// Strategy invoked when the backend rejects the session with 401.
///
/// By the time it runs the session has already been cleared. The handler decides what "go to
/// the login page" means for the embedding application (navigate, prompt, exit). The failed
/// call still returns its error to the caller afterwards.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, login_path: &str);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_unauthorized(&self, login_path: &str) {
        self(login_path)
    }
}

/// Default handler: records the redirect in the log and does nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogUnauthorized;

impl UnauthorizedHandler for LogUnauthorized {
    fn on_unauthorized(&self, login_path: &str) {
        tracing::warn!("session expired; sign in again at {login_path}");
    }
}
