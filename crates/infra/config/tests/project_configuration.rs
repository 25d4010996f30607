use betty_config::ProjectConfiguration;

#[test]
fn write_then_read_round_trips() {
    let directory = tempfile::tempdir().expect("tempdir");
    let path = directory.path().join("betty.json");

    let mut configuration = ProjectConfiguration::new(&path, "https://ancestry.example.com")
        .expect("valid base URL");
    configuration.set_author(Some("Bart".to_string()));
    configuration.set_clean_urls(true);
    configuration.write_file().expect("write configuration");

    let reloaded = ProjectConfiguration::read_file(&path).expect("read configuration back");
    assert_eq!(reloaded.author(), Some("Bart"));
    assert!(reloaded.clean_urls());
    assert_eq!(reloaded.base_url().as_str(), "https://ancestry.example.com/");
}

#[test]
fn yaml_configuration_round_trips() {
    let directory = tempfile::tempdir().expect("tempdir");
    let path = directory.path().join("betty.yaml");

    let configuration =
        ProjectConfiguration::new(&path, "https://example.com").expect("valid base URL");
    configuration.write_file().expect("write configuration");

    let reloaded = ProjectConfiguration::read_file(&path).expect("read configuration back");
    assert_eq!(reloaded.name(), configuration.name());
}

#[test]
fn rejects_unrecognized_extension() {
    let directory = tempfile::tempdir().expect("tempdir");
    let path = directory.path().join("betty.toml");
    std::fs::write(&path, "").expect("write stub file");
    assert!(ProjectConfiguration::read_file(&path).is_err());
}
