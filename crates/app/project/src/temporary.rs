use tempfile::TempDir;

use betty_config::ProjectConfiguration;

use crate::project::Project;

/// Build an unbootstrapped project rooted in a freshly created temporary
/// directory, for tests and the `demo`/`new` CLI commands that need a
/// disposable project to work with.
///
/// The returned [`TempDir`] must be kept alive for as long as the project
/// is used; dropping it removes the directory from disk.
pub fn temporary_project(base_url: &str) -> Result<(Project, TempDir), anyhow::Error> {
    let directory = tempfile::tempdir()?;
    let configuration_file_path = directory.path().join("betty.json");
    let configuration = ProjectConfiguration::new(&configuration_file_path, base_url)?;
    Ok((Project::new(configuration), directory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_project_rooted_in_the_temporary_directory() {
        let (project, directory) = temporary_project("https://example.com").unwrap();
        assert_eq!(project.configuration().project_directory_path(), directory.path());
    }
}
