/**
 * Authentication
 *
 * Admin accounts, bcrypt password verification and JWT session tokens.
 * The rest of the system only ever sees the authenticated username — it
 * is the actor identity written into createdBy/updatedBy fields.
 */

pub mod accounts;
pub mod handlers;
pub mod sessions;

pub use accounts::Account;
