use thiserror::Error;

/// How a remote call failed, as a closed tag rather than an overloaded
/// numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout or connectivity loss before a response arrived.
    Transport,
    /// The server answered with a non-2xx status.
    Protocol,
    /// HTTP 200, but the service envelope reported `status: "fail"`.
    Business,
    /// Anything else (decode failures, malformed bodies).
    Unknown,
}

/// A normalized remote-call failure.
///
/// `code` carries the legacy numeric convention for display: the HTTP status
/// for `Protocol`, `0` for `Business`, `-1` otherwise. `kind` is what callers
/// should branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            code: -1,
            message: message.into(),
        }
    }

    pub fn protocol(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Protocol,
            code: status as i32,
            message: message.into(),
        }
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Business,
            code: 0,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            code: -1,
            message: message.into(),
        }
    }

    /// Whether resubmitting the same request can reasonably succeed.
    ///
    /// Business rejections need user correction, not a retry; unknown
    /// failures are treated conservatively.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::Transport => true,
            ErrorKind::Protocol => {
                matches!(self.code, 500..=599) || self.code == 408 || self.code == 429
            }
            ErrorKind::Business | ErrorKind::Unknown => false,
        }
    }
}

/// Tagged outcome of a remote operation: exactly one of success, failure, or
/// in-flight. Used everywhere instead of throwing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ApiError),
    Loading,
}

impl<T> Outcome<T> {
    /// Transform the success payload. Failure and Loading pass through
    /// unchanged; the closure is never invoked for them.
    pub fn map<R>(self, transform: impl FnOnce(T) -> R) -> Outcome<R> {
        match self {
            Outcome::Success(value) => Outcome::Success(transform(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
            Outcome::Loading => Outcome::Loading,
        }
    }

    /// Run `action` if this is a success, then return self for chaining.
    pub fn on_success(self, action: impl FnOnce(&T)) -> Self {
        if let Outcome::Success(value) = &self {
            action(value);
        }
        self
    }

    /// Run `action` if this is a failure, then return self for chaining.
    pub fn on_failure(self, action: impl FnOnce(&ApiError)) -> Self {
        if let Outcome::Failure(error) = &self {
            action(error);
        }
        self
    }

    /// Run `action` if the operation is still in flight.
    pub fn on_loading(self, action: impl FnOnce()) -> Self {
        if let Outcome::Loading = &self {
            action();
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Outcome::Loading)
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn err(&self) -> Option<&ApiError> {
        match self {
            Outcome::Failure(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_state_holds() {
        let cases: Vec<Outcome<i32>> = vec![
            Outcome::Success(1),
            Outcome::Failure(ApiError::business("rejected")),
            Outcome::Loading,
        ];
        for outcome in cases {
            let flags = [
                outcome.is_success(),
                outcome.is_failure(),
                outcome.is_loading(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        }
    }

    #[test]
    fn map_transforms_success_only() {
        let mapped = Outcome::Success(21).map(|v| v * 2);
        assert_eq!(mapped, Outcome::Success(42));

        let error = ApiError::transport("request timeout");
        let failed: Outcome<i32> = Outcome::Failure(error.clone());
        let mapped = failed.map(|v| v * 2);
        assert_eq!(mapped, Outcome::Failure(error));

        let loading: Outcome<i32> = Outcome::Loading;
        assert_eq!(loading.map(|v| v * 2), Outcome::Loading);
    }

    #[test]
    fn map_never_invokes_transform_on_non_success() {
        let failed: Outcome<i32> = Outcome::Failure(ApiError::unknown("boom"));
        let mapped = failed.map(|_| panic!("transform must not run"));
        assert!(mapped.is_failure());

        let loading: Outcome<i32> = Outcome::Loading;
        let mapped = loading.map(|_: i32| -> i32 { panic!("transform must not run") });
        assert!(mapped.is_loading());
    }

    #[test]
    fn hooks_fire_at_most_once_and_chain() {
        let mut successes = 0;
        let mut failures = 0;
        Outcome::Success("ok")
            .on_success(|_| successes += 1)
            .on_failure(|_| failures += 1)
            .on_loading(|| failures += 1);
        assert_eq!(successes, 1);
        assert_eq!(failures, 0);
    }

    #[test]
    fn accessors() {
        assert_eq!(Outcome::Success(5).ok(), Some(5));
        let failed: Outcome<i32> = Outcome::Failure(ApiError::business("no"));
        assert!(failed.clone().ok().is_none());
        assert_eq!(failed.err().map(|e| e.code), Some(0));
    }

    #[test]
    fn retryability_follows_the_taxonomy() {
        assert!(ApiError::transport("timeout").is_retryable());
        assert!(ApiError::protocol(503, "unavailable").is_retryable());
        assert!(ApiError::protocol(429, "slow down").is_retryable());
        assert!(!ApiError::protocol(404, "not found").is_retryable());
        assert!(!ApiError::business("bad coupon").is_retryable());
        assert!(!ApiError::unknown("???").is_retryable());
    }
}
