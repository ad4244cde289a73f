/**
 * Categories
 *
 * Classification entities referenced by content items. A category can
 * not be deleted while any content item references it — the guard is
 * checked explicitly and backed by the foreign key.
 */

pub mod db;
pub mod handlers;

pub use db::Category;
