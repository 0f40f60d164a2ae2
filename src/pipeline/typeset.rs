//! Best-effort MathJax typesetting inside the loaded page.
//!
//! Fragments reference MathJax from a CDN and full documents may bring their
//! own copy. Either way the script loads asynchronously after the document
//! content, and may never load at all (offline host, blocked CDN, no math
//! on the page). The contract is therefore:
//!
//! 1. Poll for `window.MathJax.typesetPromise` until it exists or
//!    `math_timeout_ms` elapses.
//! 2. If it appeared, call it and wait for the returned promise.
//! 3. If it never appeared, carry on and print the page as-is.
//!
//! Only step 3's absence/timeout is swallowed. A DevTools failure while
//! polling, or a rejected typeset promise, is returned to the caller.

use crate::error::Html2PdfError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

/// Expression that is truthy once MathJax can typeset.
pub const MATHJAX_READY_EXPR: &str =
    "Boolean(window.MathJax && typeof window.MathJax.typesetPromise === 'function')";

/// Expression that typesets the page and resolves when done.
pub const MATHJAX_TYPESET_EXPR: &str = "window.MathJax.typesetPromise().then(() => true)";

/// Delay between readiness checks.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A page that can evaluate JavaScript.
///
/// Implemented for the Chromium page in [`crate::pipeline::render`] and by
/// scripted fakes in tests.
pub trait ScriptHost: Send + Sync {
    /// Evaluate `expr` and coerce the result to a boolean.
    fn eval_bool<'a>(
        &'a self,
        expr: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, Html2PdfError>> + Send + 'a>>;

    /// Evaluate `expr`, awaiting it if it returns a promise.
    fn eval_await<'a>(
        &'a self,
        expr: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), Html2PdfError>> + Send + 'a>>;
}

/// What happened to the math on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypesetOutcome {
    /// MathJax was found and finished typesetting.
    Typeset { waited_ms: u64 },
    /// MathJax did not become available within the wait budget.
    Unavailable,
}

/// Wait up to `wait` for MathJax, then typeset if it showed up.
pub async fn typeset_math<H: ScriptHost + ?Sized>(
    host: &H,
    wait: Duration,
) -> Result<TypesetOutcome, Html2PdfError> {
    let start = Instant::now();

    let ready = match timeout(wait, wait_until_ready(host)).await {
        Ok(result) => result?,
        Err(_elapsed) => false,
    };

    if !ready {
        info!(
            wait_ms = wait.as_millis() as u64,
            "MathJax not available; printing without typesetting"
        );
        return Ok(TypesetOutcome::Unavailable);
    }

    let waited_ms = start.elapsed().as_millis() as u64;
    debug!(waited_ms, "MathJax ready, typesetting");
    host.eval_await(MATHJAX_TYPESET_EXPR).await?;

    Ok(TypesetOutcome::Typeset { waited_ms })
}

async fn wait_until_ready<H: ScriptHost + ?Sized>(host: &H) -> Result<bool, Html2PdfError> {
    loop {
        if host.eval_bool(MATHJAX_READY_EXPR).await? {
            return Ok(true);
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Becomes ready after `ready_after` polls (never, if `None`).
    struct FakePage {
        ready_after: Option<usize>,
        polls: AtomicUsize,
        typesets: AtomicUsize,
        fail_poll: bool,
        fail_typeset: bool,
    }

    impl FakePage {
        fn new(ready_after: Option<usize>) -> Self {
            Self {
                ready_after,
                polls: AtomicUsize::new(0),
                typesets: AtomicUsize::new(0),
                fail_poll: false,
                fail_typeset: false,
            }
        }
    }

    impl ScriptHost for FakePage {
        fn eval_bool<'a>(
            &'a self,
            expr: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<bool, Html2PdfError>> + Send + 'a>> {
            Box::pin(async move {
                assert_eq!(expr, MATHJAX_READY_EXPR);
                if self.fail_poll {
                    return Err(Html2PdfError::render("evaluate", "target closed"));
                }
                let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(self.ready_after.is_some_and(|after| n >= after))
            })
        }

        fn eval_await<'a>(
            &'a self,
            expr: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<(), Html2PdfError>> + Send + 'a>> {
            Box::pin(async move {
                assert_eq!(expr, MATHJAX_TYPESET_EXPR);
                self.typesets.fetch_add(1, Ordering::SeqCst);
                if self.fail_typeset {
                    return Err(Html2PdfError::render("typeset", "promise rejected"));
                }
                Ok(())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typesets_when_ready_immediately() {
        let page = FakePage::new(Some(1));
        let out = typeset_math(&page, Duration::from_millis(4000))
            .await
            .unwrap();
        assert!(matches!(out, TypesetOutcome::Typeset { .. }));
        assert_eq!(page.typesets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typesets_after_a_few_polls() {
        let page = FakePage::new(Some(5));
        let out = typeset_math(&page, Duration::from_millis(4000))
            .await
            .unwrap();
        match out {
            TypesetOutcome::Typeset { waited_ms } => assert!(waited_ms >= 400),
            other => panic!("expected Typeset, got {other:?}"),
        }
        assert_eq!(page.polls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn absent_mathjax_is_not_an_error() {
        let page = FakePage::new(None);
        let out = typeset_math(&page, Duration::from_millis(4000))
            .await
            .unwrap();
        assert_eq!(out, TypesetOutcome::Unavailable);
        assert_eq!(page.typesets.load(Ordering::SeqCst), 0);
        // ~40 polls in 4s at 100ms intervals
        assert!(page.polls.load(Ordering::SeqCst) >= 30);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_wait_skips_typesetting() {
        let page = FakePage::new(None);
        let out = typeset_math(&page, Duration::ZERO).await.unwrap();
        assert_eq!(out, TypesetOutcome::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_failure_propagates() {
        let mut page = FakePage::new(Some(1));
        page.fail_poll = true;
        let err = typeset_math(&page, Duration::from_millis(4000))
            .await
            .unwrap_err();
        assert!(matches!(err, Html2PdfError::Render { stage: "evaluate", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn typeset_failure_propagates() {
        let mut page = FakePage::new(Some(1));
        page.fail_typeset = true;
        let err = typeset_math(&page, Duration::from_millis(4000))
            .await
            .unwrap_err();
        assert!(matches!(err, Html2PdfError::Render { stage: "typeset", .. }));
    }
}
