/**
 * Portal CMS Backend
 *
 * REST backend for a municipal content portal: news, actions, services
 * and projects share one generic content pipeline (CRUD, search, date
 * and category filters, offset pagination, view counting), backed by
 * PostgreSQL. Supporting modules cover categories, documents with file
 * attachments, JWT-authenticated accounts, image uploads and an SSE
 * notification channel.
 */

pub mod auth;
pub mod category;
pub mod content;
pub mod documents;
pub mod error;
pub mod middleware;
pub mod realtime;
pub mod response;
pub mod routes;
pub mod server;
pub mod slug;
pub mod upload;
