mod ancestry;
mod error;
mod favicon;
mod pipeline;
mod resource;
mod schema;
mod sitemap;

pub use ancestry::{Ancestry, Entity, Renderer};
pub use error::GenerationError;
pub use favicon::FAVICON_ICO;
pub use pipeline::GenerationPipeline;
pub use resource::{create_file, create_html_resource, create_json_resource};
pub use schema::{generate_openapi_specification, generate_schema_document};
pub use sitemap::{write_sitemap_files, MAX_URLS_PER_SITEMAP};
