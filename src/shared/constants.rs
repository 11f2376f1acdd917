/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ACCESS NOTICES
// =============================================================================

/// Where anonymous callers are sent for guarded views
pub const SIGN_IN_PATH: &str = "/auth";

/// Where signed-in callers without the required role are sent
pub const HOME_PATH: &str = "/";

pub const SIGN_IN_NOTICE: &str = "Please sign in";

pub const SUBMIT_SIGN_IN_NOTICE: &str = "Please sign in to submit a complaint";

pub const COMMENT_SIGN_IN_NOTICE: &str = "Please sign in to comment";

pub const AUTHORITY_REQUIRED_NOTICE: &str = "Access denied. Authority role required.";

pub const ADMIN_REQUIRED_NOTICE: &str = "Access denied. Admin role required.";
