/**
 * Documents
 *
 * Legal/administrative documents with typed file attachments stored on
 * local disk. Attachments are classified pdf/img/other; an update that
 * carries new files replaces the old attachments of the same class.
 */

pub mod db;
pub mod handlers;

pub use db::{Document, DocumentAttachment, DocumentWithAttachments};
