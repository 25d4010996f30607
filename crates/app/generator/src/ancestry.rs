/// A single genealogical entity — a person, event, place, source, file or
/// citation. The generation pipeline only needs to know an entity's
/// identity and how to serialize it; the ancestry data model itself
/// (entity classes, date arithmetic, localized strings) is an external
/// collaborator's concern.
pub trait Entity: Send + Sync {
    /// This entity's identifier, unique within its entity type.
    fn id(&self) -> &str;

    /// The machine name of this entity's type, matching a key in the
    /// project configuration's `entity_types` mapping.
    fn entity_type(&self) -> &str;

    /// Whether this entity is visible to anonymous site visitors. Private
    /// entities are still written to the JSON API, but never get an HTML
    /// page.
    fn is_public(&self) -> bool {
        true
    }

    /// Whether this entity's ID was generated (rather than sourced from
    /// the ancestry's own records) and so should not appear as its own
    /// page — generated IDs exist only to let other entities reference
    /// it.
    fn has_generated_id(&self) -> bool {
        false
    }

    /// This entity's JSON representation, written verbatim to its
    /// `index.json`.
    fn to_json(&self) -> serde_json::Value;
}

/// The ancestry: every entity the project knows about, grouped by type.
///
/// An external collaborator (e.g. a Gramps XML importer) populates this;
/// the pipeline only reads from it.
pub trait Ancestry: Send + Sync {
    /// Every entity type with at least one entity, in a stable order.
    fn entity_types(&self) -> Vec<String>;

    /// Every entity of `entity_type`, in a stable order.
    fn entities_of_type(&self, entity_type: &str) -> Vec<&dyn Entity>;
}

/// Renders ancestry content to HTML. The template engine and its
/// concrete templates are external collaborators; the pipeline only
/// needs these three render points to exist.
pub trait Renderer: Send + Sync {
    /// The site's root page for `locale`.
    fn render_index(&self, locale: &str) -> Result<String, anyhow::Error>;

    /// The listing page for every entity of `entity_type`, for `locale`.
    fn render_entity_type_list(
        &self,
        entity_type: &str,
        entities: &[&dyn Entity],
        locale: &str,
    ) -> Result<String, anyhow::Error>;

    /// A single entity's page, for `locale`.
    fn render_entity(&self, entity: &dyn Entity, locale: &str) -> Result<String, anyhow::Error>;
}
