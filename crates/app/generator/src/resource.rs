use std::path::Path;

use tokio::io::AsyncWriteExt;

/// Create every parent directory of `path`, then open it for UTF-8 text
/// writing.
pub async fn create_file(path: &Path) -> Result<tokio::fs::File, anyhow::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(tokio::fs::File::create(path).await?)
}

/// Write `html` as `<directory>/index.html`.
pub async fn create_html_resource(directory: &Path, html: &str) -> Result<(), anyhow::Error> {
    let mut file = create_file(&directory.join("index.html")).await?;
    file.write_all(html.as_bytes()).await?;
    Ok(())
}

/// Write `json` as `<directory>/index.json`.
pub async fn create_json_resource(
    directory: &Path,
    json: &serde_json::Value,
) -> Result<(), anyhow::Error> {
    let mut file = create_file(&directory.join("index.json")).await?;
    let contents = serde_json::to_vec_pretty(json)?;
    file.write_all(&contents).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_html_resource_writes_index_html() {
        let directory = tempfile::tempdir().unwrap();
        create_html_resource(directory.path(), "<html></html>")
            .await
            .unwrap();
        let contents = tokio::fs::read_to_string(directory.path().join("index.html"))
            .await
            .unwrap();
        assert_eq!(contents, "<html></html>");
    }

    #[tokio::test]
    async fn create_json_resource_writes_index_json() {
        let directory = tempfile::tempdir().unwrap();
        create_json_resource(directory.path(), &serde_json::json!({"a": 1}))
            .await
            .unwrap();
        let contents = tokio::fs::read_to_string(directory.path().join("index.json"))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn create_file_creates_parent_directories() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("a/b/c.txt");
        create_file(&path).await.unwrap();
        assert!(path.parent().unwrap().is_dir());
    }
}
