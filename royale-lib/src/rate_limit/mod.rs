//! Rate limiting driven by the API's own quota headers.

mod guard;

pub use guard::RateLimitGuard;
pub use guard::RateLimitState;
pub use guard::RateLimitStatus;
pub use guard::LIMIT_HEADER;
pub use guard::REMAINING_HEADER;
pub use guard::RESET_HEADER;
