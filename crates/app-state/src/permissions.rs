//! Role checks applied before any mutation reaches the data layer.
//!
//! These mirror what the screens allow; the data layer itself does not
//! enforce them.

use common::{AppError, AppResult};
use domain::{Task, User};

/// Signed-in user or `Forbidden`
pub fn require_user(actor: Option<&User>) -> AppResult<&User> {
    actor.ok_or_else(|| AppError::forbidden("Sign in first"))
}

/// Signed-in administrator or `Forbidden`
pub fn require_admin(actor: Option<&User>) -> AppResult<&User> {
    let user = require_user(actor)?;
    if !user.is_admin() {
        return Err(AppError::forbidden("Only administrators can do this"));
    }
    Ok(user)
}

/// Deleting a user or changing their role: admins only, never on
/// themselves or on the primary administrator.
pub fn check_user_management(actor: Option<&User>, target: &User) -> AppResult<()> {
    let admin = require_admin(actor)?;
    if admin.id == target.id {
        return Err(AppError::forbidden("You cannot change your own account"));
    }
    if target.is_primary_admin() {
        return Err(AppError::forbidden("The primary administrator cannot be changed"));
    }
    Ok(())
}

/// Only the assignee may complete or reopen a task; unassigned tasks
/// must be taken first.
pub fn check_completion(actor: Option<&User>, task: &Task) -> AppResult<()> {
    let user = require_user(actor)?;
    match task.assigned_to_id.as_deref() {
        None => Err(AppError::forbidden("Assign this task before completing it")),
        Some(assignee) if assignee != user.id => Err(AppError::forbidden(
            "This task is assigned to someone else",
        )),
        Some(_) => Ok(()),
    }
}
