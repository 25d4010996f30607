//! The asset repository: an ordered overlay of directories from which
//! extensions, themes and the project itself contribute static files,
//! templates and translations.

mod error;
mod repository;

pub use error::AssetError;
pub use repository::AssetRepository;
