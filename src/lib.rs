pub mod cache;
pub mod error;
pub mod exporter;
pub mod logger;
pub mod resolver;
pub mod schema;
pub mod transliterate;

// Exporting types for convenience
pub use cache::IdCache;
pub use error::ExportError;
pub use exporter::Contact;
pub use resolver::{IdLookup, IdResolver, LookupClient};
pub use schema::FriendsPageSchema;
