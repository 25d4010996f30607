use std::path::{Path, PathBuf};
use std::time::Duration;

use betty_extension::discover;
use betty_generator::GenerationPipeline;
use betty_project::temporary_project;
use indicatif::{ProgressBar, ProgressStyle};

use crate::demo::{DemoAncestry, DemoRenderer};
use crate::error::UserFacingError;

fn generation_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("generating site...");
    spinner
}

/// `betty generate`: load the project at `configuration_file_path`,
/// bootstrap its extensions, and render the static site.
///
/// This crate has no ancestry-loading extension point yet (the ancestry
/// data model is out of its scope), so it renders the same minimal
/// ancestry `betty demo` does; a concrete project supplies its own
/// [`betty_generator::Ancestry`] and [`betty_generator::Renderer`] once
/// one exists.
pub async fn generate(configuration_file_path: &Path) -> Result<(), anyhow::Error> {
    let mut project = betty_project::load(configuration_file_path)?;
    project.bootstrap(discover())?;

    let ancestry = DemoAncestry::default();
    let renderer = DemoRenderer;
    let spinner = generation_spinner();
    GenerationPipeline::new(&ancestry, &renderer)
        .generate(&project)
        .await?;
    spinner.finish_with_message("site generated");

    project.shutdown()?;
    tracing::info!(
        directory = %project.configuration().www_directory_path().display(),
        "site generated",
    );
    Ok(())
}

/// `betty serve`: verify a site has already been generated and report
/// that this core crate has no built-in HTTP server. Serving the output
/// tree is an external collaborator's concern (a reverse proxy, a static
/// host, or an extension that wraps one), not this crate's.
pub fn serve(configuration_file_path: &Path) -> Result<(), anyhow::Error> {
    let project = betty_project::load(configuration_file_path)?;
    let www_directory = project.configuration().www_directory_path();
    if !www_directory.is_dir() {
        return Err(UserFacingError::new(format!(
            "Web root directory \"{}\" does not exist. Run `betty generate` first.",
            www_directory.display()
        ))
        .into());
    }
    Err(UserFacingError::new(format!(
        "Serving \"{}\" over HTTP is not implemented in this core. Point a static file server or reverse proxy at it instead.",
        www_directory.display()
    ))
    .into())
}

/// The per-user directory storing long-lived artifacts (e.g. built Webpack
/// bundles keyed by a content hash), shared across every project.
fn cache_directory_path() -> Result<PathBuf, anyhow::Error> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine the user's home directory"))?;
    Ok(home.join(".betty"))
}

/// `betty clear-caches`: remove the per-user cache directory, if any. A
/// missing cache directory is not an error. Unlike the other subcommands,
/// this one has no project to load — the cache directory is shared across
/// every project on the host.
pub fn clear_caches() -> Result<(), anyhow::Error> {
    let cache_directory = cache_directory_path()?;
    if cache_directory.is_dir() {
        std::fs::remove_dir_all(&cache_directory)?;
    }
    tracing::info!("all caches cleared");
    Ok(())
}

/// `betty demo`: generate a disposable demonstration site and report
/// where it was written. Serving it over HTTP is left to the caller;
/// this crate's concern is generating static output, not serving it.
pub async fn demo() -> Result<(PathBuf, tempfile::TempDir), anyhow::Error> {
    let (mut project, directory) = temporary_project("https://example.com")?;
    project.bootstrap(discover())?;

    let ancestry = DemoAncestry::default();
    let renderer = DemoRenderer;
    let spinner = generation_spinner();
    GenerationPipeline::new(&ancestry, &renderer)
        .generate(&project)
        .await?;
    spinner.finish_with_message("demo site generated");

    let www_directory = project.configuration().www_directory_path();
    project.shutdown()?;
    Ok((www_directory, directory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_generates_a_site() {
        let (www_directory, _directory) = demo().await.unwrap();
        assert!(www_directory.join("index.html").is_file());
    }

    #[test]
    fn serve_rejects_an_ungenerated_project() {
        let directory = tempfile::tempdir().unwrap();
        let configuration_path = directory.path().join("betty.json");
        std::fs::write(
            &configuration_path,
            r#"{"base_url": "https://example.com"}"#,
        )
        .unwrap();
        assert!(serve(&configuration_path).is_err());
    }

    #[test]
    fn serve_reports_unimplemented_for_a_generated_project() {
        let directory = tempfile::tempdir().unwrap();
        let configuration_path = directory.path().join("betty.json");
        std::fs::write(
            &configuration_path,
            r#"{"base_url": "https://example.com"}"#,
        )
        .unwrap();
        std::fs::create_dir_all(directory.path().join("output/www")).unwrap();
        assert!(serve(&configuration_path).is_err());
    }

    #[test]
    fn cache_directory_path_is_under_the_home_directory() {
        let path = cache_directory_path().unwrap();
        assert_eq!(path.file_name().unwrap(), ".betty");
        assert_eq!(path.parent().unwrap(), dirs::home_dir().unwrap());
    }

    #[test]
    fn clear_caches_is_a_no_op_without_an_existing_cache_directory() {
        clear_caches().unwrap();
    }
}
