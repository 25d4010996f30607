use std::path::{Path, PathBuf};

use betty_config::ProjectConfiguration;
use betty_extension::ExtensionDispatcher;
use betty_pool::{Task, WorkerPool};
use betty_project::{JobContext, Project};
use serde_json::Value as Json;

use crate::ancestry::{Ancestry, Entity, Renderer};
use crate::error::GenerationError;
use crate::schema::{generate_openapi_specification, generate_schema_document};
use crate::sitemap::write_sitemap_files;

const CONCURRENCY_PER_THREAD: usize = 4;
const STATIC_PUBLIC_ASSETS_DIRECTORY: &str = "public/static";
const LOCALIZED_PUBLIC_ASSETS_DIRECTORY: &str = "public/localized";
const ERROR_RESPONSES: [(u16, &str); 3] =
    [(401, "Unauthorized"), (403, "Forbidden"), (404, "Not Found")];

/// Orchestrates a full generation run: purging and recreating the output
/// directory, copying static assets, dispatching extensions, and
/// delegating every per-entity rendering and write to a [`WorkerPool`].
///
/// Rendering the ancestry
/// to HTML and JSON is done synchronously against the borrowed `Ancestry`/
/// `Renderer`, since an entity reference borrowed from `Ancestry` cannot be
/// captured by a `'static` pool task; only the resulting bytes are handed
/// to the pool, so file writes still happen concurrently across threads.
pub struct GenerationPipeline<'a> {
    ancestry: &'a dyn Ancestry,
    renderer: &'a dyn Renderer,
}

impl<'a> GenerationPipeline<'a> {
    #[must_use]
    pub fn new(ancestry: &'a dyn Ancestry, renderer: &'a dyn Renderer) -> Self {
        Self { ancestry, renderer }
    }

    pub async fn generate(&self, project: &Project) -> Result<(), anyhow::Error> {
        let configuration = project.configuration();
        let output_directory = configuration.output_directory_path();
        let www_directory = configuration.www_directory_path();

        recreate_output_directory(&output_directory).await?;
        self.copy_static_public_assets(project, &www_directory)?;
        write_error_responses(&www_directory, configuration).await?;
        write_favicon(&www_directory).await?;

        if configuration.locales().is_multilingual() {
            write_multilingual_root_redirect(&www_directory, configuration).await?;
        }

        if let Some(registry) = project.extensions() {
            ExtensionDispatcher::new(registry)
                .dispatch_generate()
                .await
                .map_err(|source| GenerationError::ExtensionDispatch { source })?;
        }

        let pool = WorkerPool::start(CONCURRENCY_PER_THREAD);
        let context = project.job_context();

        self.delegate_index(&pool, context, &www_directory, configuration)?;
        self.delegate_sitemap(&pool, &www_directory, configuration)?;
        self.delegate_schema_document(&pool, &www_directory)?;
        self.delegate_openapi_specification(&pool, &www_directory)?;
        self.delegate_localized_public_assets(project, &pool, &www_directory, configuration)?;
        self.delegate_entity_types(&pool, context, &www_directory, configuration)?;

        pool.join()?;
        normalize_permissions(&output_directory).await?;
        Ok(())
    }

    fn copy_static_public_assets(
        &self,
        project: &Project,
        www_directory: &Path,
    ) -> Result<(), anyhow::Error> {
        project
            .assets()
            .copy_tree(STATIC_PUBLIC_ASSETS_DIRECTORY, www_directory)
            .map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn delegate_localized_public_assets(
        &self,
        project: &Project,
        pool: &WorkerPool,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
    ) -> Result<(), anyhow::Error> {
        for locale in configuration.locales().iter() {
            let source = format!("{LOCALIZED_PUBLIC_ASSETS_DIRECTORY}/{}", locale.locale());
            let destination = locale_directory(www_directory, configuration, locale.alias());
            let assets = project.assets().clone();
            pool.delegate(Box::new(move || {
                Box::pin(async move { assets.copy_tree(source, destination).map_err(anyhow::Error::from) })
            }))?;
        }
        Ok(())
    }

    fn delegate_index(
        &self,
        pool: &WorkerPool,
        context: &JobContext,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
    ) -> Result<(), anyhow::Error> {
        for locale in configuration.locales().iter() {
            let directory = locale_directory(www_directory, configuration, locale.alias());
            if !context.claim(format!("index:{}", directory.display())) {
                continue;
            }
            let html = self.renderer.render_index(locale.locale())?;
            pool.delegate(task_write_html(directory, html))?;
        }
        Ok(())
    }

    fn delegate_sitemap(
        &self,
        pool: &WorkerPool,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
    ) -> Result<(), anyhow::Error> {
        for locale in configuration.locales().iter() {
            let mut urls = Vec::new();
            for entity_type in self.ancestry.entity_types() {
                for entity in self.ancestry.entities_of_type(&entity_type) {
                    if !entity.is_public() || entity.has_generated_id() {
                        continue;
                    }
                    urls.push(entity_url(configuration, locale.alias(), &entity_type, entity.id())?);
                }
            }
            let directory = locale_directory(www_directory, configuration, locale.alias());
            pool.delegate(Box::new(move || {
                Box::pin(async move { write_sitemap_files(&directory, &urls).await })
            }))?;
        }
        Ok(())
    }

    fn delegate_schema_document(
        &self,
        pool: &WorkerPool,
        www_directory: &Path,
    ) -> Result<(), anyhow::Error> {
        let json = generate_schema_document();
        pool.delegate(task_write_json_file(www_directory.join("schema.json"), json))
    }

    fn delegate_openapi_specification(
        &self,
        pool: &WorkerPool,
        www_directory: &Path,
    ) -> Result<(), anyhow::Error> {
        let entity_types = self.ancestry.entity_types();
        let json = generate_openapi_specification(&entity_types);
        let directory = www_directory.join("api");
        pool.delegate(task_write_json(directory, json))
    }

    fn delegate_entity_types(
        &self,
        pool: &WorkerPool,
        context: &JobContext,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
    ) -> Result<(), anyhow::Error> {
        for entity_type in self.ancestry.entity_types() {
            let entities = self.ancestry.entities_of_type(&entity_type);
            let generate_html_list = configuration
                .entity_types()
                .get(&entity_type)
                .is_some_and(|configuration| configuration.generate_html_list());

            self.delegate_entity_type_listing(
                pool,
                context,
                www_directory,
                configuration,
                &entity_type,
                &entities,
                generate_html_list,
            )?;

            for entity in &entities {
                self.delegate_entity(pool, context, www_directory, configuration, &entity_type, *entity)?;
            }
        }
        Ok(())
    }

    fn delegate_entity_type_listing(
        &self,
        pool: &WorkerPool,
        context: &JobContext,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
        entity_type: &str,
        entities: &[&dyn Entity],
        generate_html_list: bool,
    ) -> Result<(), anyhow::Error> {
        let listing_json: Json = Json::Array(entities.iter().map(|entity| entity.to_json()).collect());
        pool.delegate(task_write_json(www_directory.join(entity_type), listing_json))?;

        if generate_html_list {
            for locale in configuration.locales().iter() {
                let directory =
                    locale_directory(www_directory, configuration, locale.alias()).join(entity_type);
                if !context.claim(format!("entity-type-listing:{}", directory.display())) {
                    continue;
                }
                let html = self
                    .renderer
                    .render_entity_type_list(entity_type, entities, locale.locale())?;
                pool.delegate(task_write_html(directory, html))?;
            }
        }
        Ok(())
    }

    fn delegate_entity(
        &self,
        pool: &WorkerPool,
        context: &JobContext,
        www_directory: &Path,
        configuration: &ProjectConfiguration,
        entity_type: &str,
        entity: &dyn Entity,
    ) -> Result<(), anyhow::Error> {
        if entity.has_generated_id() {
            return Ok(());
        }

        pool.delegate(task_write_json(
            www_directory.join(entity_type).join(entity.id()),
            entity.to_json(),
        ))?;

        if entity.is_public() {
            for locale in configuration.locales().iter() {
                let directory = locale_directory(www_directory, configuration, locale.alias())
                    .join(entity_type)
                    .join(entity.id());
                if !context.claim(format!("entity:{}", directory.display())) {
                    continue;
                }
                let html = self.renderer.render_entity(entity, locale.locale())?;
                pool.delegate(task_write_html(directory, html))?;
            }
        }
        Ok(())
    }
}

/// Whether this project generates under locale-prefixed directories. A
/// monolingual project's content sits directly under `www/`.
fn locale_directory(www_directory: &Path, configuration: &ProjectConfiguration, alias: &str) -> PathBuf {
    if configuration.locales().is_multilingual() {
        www_directory.join(alias)
    } else {
        www_directory.to_path_buf()
    }
}

fn entity_url(
    configuration: &ProjectConfiguration,
    locale_alias: &str,
    entity_type: &str,
    entity_id: &str,
) -> Result<String, anyhow::Error> {
    let mut segments = Vec::new();
    if !configuration.root_path().is_empty() {
        segments.push(configuration.root_path().to_string());
    }
    if configuration.locales().is_multilingual() {
        segments.push(locale_alias.to_string());
    }
    segments.push(entity_type.to_string());
    segments.push(entity_id.to_string());
    let path = format!("{}/", segments.join("/"));
    let url = configuration.base_url().join(&path)?;
    Ok(url.to_string())
}

fn task_write_html(directory: PathBuf, html: String) -> Task {
    Box::new(move || Box::pin(async move { crate::resource::create_html_resource(&directory, &html).await }))
}

fn task_write_json(directory: PathBuf, json: Json) -> Task {
    Box::new(move || Box::pin(async move { crate::resource::create_json_resource(&directory, &json).await }))
}

/// Like [`task_write_json`], but writes `json` verbatim to `path` rather
/// than under `<directory>/index.json` — for the handful of resources
/// with a fixed, literal file name (`schema.json`, `sitemap.xml`).
fn task_write_json_file(path: PathBuf, json: Json) -> Task {
    Box::new(move || {
        Box::pin(async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let contents = serde_json::to_vec_pretty(&json)?;
            tokio::fs::write(&path, contents).await?;
            Ok(())
        })
    })
}

/// Write `.error/{401,403,404}.json` beneath every locale's directory, so
/// an HTTP server fronting the output tree can serve a matching JSON body
/// for each of those statuses. Written synchronously, before the pool
/// starts, alongside the rest of the static public assets.
async fn write_error_responses(
    www_directory: &Path,
    configuration: &ProjectConfiguration,
) -> Result<(), anyhow::Error> {
    for locale in configuration.locales().iter() {
        let directory = locale_directory(www_directory, configuration, locale.alias()).join(".error");
        for (status, message) in ERROR_RESPONSES {
            let path = directory.join(format!("{status}.json"));
            let body = serde_json::json!({ "status": status, "message": message });
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, serde_json::to_vec_pretty(&body)?).await?;
        }
    }
    Ok(())
}

/// For a multilingual project, write a root `index.html` that redirects to
/// the default locale's directory (e.g. `/en/`), so visiting the web root
/// itself lands somewhere renderable. Monolingual projects render their
/// index directly at the web root and need no redirect.
async fn write_multilingual_root_redirect(
    www_directory: &Path,
    configuration: &ProjectConfiguration,
) -> Result<(), anyhow::Error> {
    let default_alias = configuration.locales().default().alias();
    let destination = format!("{default_alias}/");
    let html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><meta http-equiv=\"refresh\" content=\"0; url={destination}\"><link rel=\"canonical\" href=\"{destination}\"></head><body></body></html>\n"
    );
    tokio::fs::write(www_directory.join("index.html"), html).await?;
    Ok(())
}

/// Copy the built-in [`crate::FAVICON_ICO`] to the web root, unconditionally,
/// so downstream HTTP servers never 404 on it.
async fn write_favicon(www_directory: &Path) -> Result<(), anyhow::Error> {
    tokio::fs::write(www_directory.join("favicon.ico"), crate::favicon::FAVICON_ICO).await?;
    Ok(())
}

async fn recreate_output_directory(output_directory: &Path) -> Result<(), anyhow::Error> {
    if output_directory.exists() {
        tokio::fs::remove_dir_all(output_directory)
            .await
            .map_err(|source| GenerationError::OutputDirectory {
                path: output_directory.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::create_dir_all(output_directory)
        .await
        .map_err(|source| GenerationError::OutputDirectory {
            path: output_directory.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Normalize every generated file and directory's permissions to 0755
/// (directories) and 0644 (files), so the output is safe to serve
/// regardless of the host's umask. A no-op on non-Unix targets, since
/// Betty only ships a Unix-permission model.
async fn normalize_permissions(output_directory: &Path) -> Result<(), anyhow::Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        for entry in walkdir::WalkDir::new(output_directory)
            .into_iter()
            .filter_map(Result::ok)
        {
            let mode = if entry.file_type().is_dir() { 0o755 } else { 0o644 };
            std::fs::set_permissions(entry.path(), std::fs::Permissions::from_mode(mode)).map_err(
                |source| GenerationError::Permissions {
                    path: entry.path().to_path_buf(),
                    source,
                },
            )?;
        }
    }
    #[cfg(not(unix))]
    {
        tracing::warn!("permission normalization is a no-op on non-Unix targets");
    }
    Ok(())
}
