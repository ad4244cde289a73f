/**
 * Master-Detail Content Repository
 *
 * The one generic piece of the CMS: a paginated master-detail repository
 * instantiated once per content kind (news, actions, services, projects).
 * A master row carries the card fields (title, summary, category, view
 * count, featured flag, image); the detail row carries the long-form body,
 * joined at read time.
 */

pub mod filter;
pub mod handlers;
pub mod model;
pub mod repository;

pub use filter::ContentFilter;
pub use model::{ContentDetail, ContentItem, ContentKind, ContentPage, ContentWithBody};
pub use repository::ContentRepository;
