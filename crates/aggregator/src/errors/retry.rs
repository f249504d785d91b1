/// Classification for retry policy.
///
/// Used by the upstream client to decide whether a failed attempt is worth
/// repeating after a backoff sleep.
///
/// # Behavior Summary
///
/// | Class | Retry? | Typical cause |
/// |-------|--------|---------------|
/// | `Never` | No | bad request, 4xx/5xx other than 429/503, network or decode failure |
/// | `WithBackoff` | Yes, up to the policy budget | HTTP 429 (rate limited) or 503 (unavailable) |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the failure is terminal for this attempt chain.
    Never,

    /// Transient failure. Sleep with exponential backoff and try again.
    WithBackoff,
}
