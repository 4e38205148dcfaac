//! Domain-level constants.
//!
//! These constants define storage layout and business rules shared by
//! every crate in the workspace.

// =============================================================================
// Storage Keys
// =============================================================================

/// Storage slot for the task collection.
///
/// Keys carry a schema version suffix so data written by an incompatible
/// release is ignored instead of misread.
pub const STORAGE_KEY_TASKS: &str = "caresync_tasks_v10";

/// Storage slot for the user collection
pub const STORAGE_KEY_USERS: &str = "caresync_users_v10";

/// Storage slot for the elderly profile collection
pub const STORAGE_KEY_ELDERLY: &str = "caresync_elderly_v10";

/// Storage slot for the session pointer (current user id)
pub const STORAGE_KEY_SESSION: &str = "caresync_session_v10";

/// Storage slot for the UI theme (unversioned)
pub const STORAGE_KEY_THEME: &str = "theme";

// =============================================================================
// Users & Roles
// =============================================================================

/// Administrator role identifier
pub const ROLE_ADMIN: &str = "ADMIN";

/// Standard participant role identifier
pub const ROLE_MEMBER: &str = "MEMBER";

/// Seeded primary administrator; cannot be deleted or demoted
pub const PRIMARY_ADMIN_ID: &str = "admin_user";

/// Badge color given to users created through signup
pub const DEFAULT_USER_COLOR: &str = "bg-indigo-100 text-indigo-800";

// =============================================================================
// Avatars
// =============================================================================

/// Avatar generator endpoint
pub const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// Background color used for generated avatars
pub const AVATAR_BACKGROUND: &str = "b6e3f4";

// =============================================================================
// Identifiers
// =============================================================================

/// Prefix for generated user ids
pub const USER_ID_PREFIX: &str = "u";

/// Prefix for generated task ids
pub const TASK_ID_PREFIX: &str = "t";

/// Prefix for generated elderly profile ids
pub const ELDERLY_ID_PREFIX: &str = "e";

/// `createdBy` value for tasks generated by the seeder
pub const SYSTEM_CREATOR_ID: &str = "system";
