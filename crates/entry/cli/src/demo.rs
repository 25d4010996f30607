use betty_generator::{Ancestry, Entity};

/// A single demonstration person: a handful of named people, no real
/// genealogical data.
struct DemoPerson {
    id: &'static str,
    name: &'static str,
}

impl Entity for DemoPerson {
    fn id(&self) -> &str {
        self.id
    }

    fn entity_type(&self) -> &str {
        "person"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "id": self.id, "name": self.name })
    }
}

/// The small, hard-coded ancestry `betty demo` generates a site from.
/// Real ancestries (e.g. imported from Gramps XML) are an external
/// collaborator's concern; this one exists only so the CLI's `demo`
/// command has something to render end to end.
pub struct DemoAncestry {
    people: Vec<DemoPerson>,
}

impl Default for DemoAncestry {
    fn default() -> Self {
        Self {
            people: vec![
                DemoPerson {
                    id: "betty-01",
                    name: "Bettie Bouwman",
                },
                DemoPerson {
                    id: "betty-02",
                    name: "Jan Bouwman",
                },
            ],
        }
    }
}

impl Ancestry for DemoAncestry {
    fn entity_types(&self) -> Vec<String> {
        vec!["person".to_string()]
    }

    fn entities_of_type(&self, entity_type: &str) -> Vec<&dyn Entity> {
        if entity_type == "person" {
            self.people.iter().map(|person| person as &dyn Entity).collect()
        } else {
            Vec::new()
        }
    }
}

/// The plain-HTML renderer `betty demo` uses. A real project injects a
/// templating-backed [`betty_generator::Renderer`]; the template engine
/// itself is out of this crate's scope.
pub struct DemoRenderer;

impl betty_generator::Renderer for DemoRenderer {
    fn render_index(&self, locale: &str) -> Result<String, anyhow::Error> {
        Ok(format!("<html lang=\"{locale}\"><body><h1>Betty demo</h1></body></html>"))
    }

    fn render_entity_type_list(
        &self,
        entity_type: &str,
        entities: &[&dyn Entity],
        locale: &str,
    ) -> Result<String, anyhow::Error> {
        let items: String = entities
            .iter()
            .map(|entity| format!("<li>{}</li>", entity.id()))
            .collect();
        Ok(format!(
            "<html lang=\"{locale}\"><body><h1>{entity_type}</h1><ul>{items}</ul></body></html>"
        ))
    }

    fn render_entity(&self, entity: &dyn Entity, locale: &str) -> Result<String, anyhow::Error> {
        Ok(format!(
            "<html lang=\"{locale}\"><body><h1>{}</h1></body></html>",
            entity.id()
        ))
    }
}
