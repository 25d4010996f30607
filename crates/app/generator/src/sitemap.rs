use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// The maximum number of `<url>` entries a single sitemap file may list,
/// per the sitemap protocol.
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Write one or more sitemap files (and, if more than one shard is
/// needed, a sitemap index) for `urls` beneath `www_directory`, splitting
/// at [`MAX_URLS_PER_SITEMAP`].
pub async fn write_sitemap_files(
    www_directory: &Path,
    urls: &[String],
) -> Result<(), anyhow::Error> {
    if urls.len() <= MAX_URLS_PER_SITEMAP {
        write_single_sitemap(&www_directory.join("sitemap.xml"), urls).await
    } else {
        write_multiple_sitemaps(www_directory, urls).await
    }
}

async fn write_single_sitemap(path: &Path, urls: &[String]) -> Result<(), anyhow::Error> {
    let xml = render_urlset(urls)?;
    tokio::fs::write(path, xml).await?;
    Ok(())
}

async fn write_multiple_sitemaps(
    www_directory: &Path,
    urls: &[String],
) -> Result<(), anyhow::Error> {
    let shard_count = urls.len().div_ceil(MAX_URLS_PER_SITEMAP);
    let mut shard_urls = Vec::with_capacity(shard_count);
    for (index, shard) in urls.chunks(MAX_URLS_PER_SITEMAP).enumerate() {
        let file_name = format!("sitemap-{index}.xml");
        write_numbered_sitemap(&www_directory.join(&file_name), shard).await?;
        shard_urls.push(file_name);
    }
    write_sitemap_index(&www_directory.join("sitemap.xml"), www_directory, &shard_urls).await
}

async fn write_numbered_sitemap(path: &Path, urls: &[String]) -> Result<(), anyhow::Error> {
    let xml = render_urlset(urls)?;
    tokio::fs::write(path, xml).await?;
    Ok(())
}

async fn write_sitemap_index(
    path: &Path,
    www_directory: &Path,
    shard_file_names: &[String],
) -> Result<(), anyhow::Error> {
    let _ = www_directory;
    let mut writer = Writer::new(Vec::new());
    let mut root = BytesStart::new("sitemapindex");
    root.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    for file_name in shard_file_names {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", file_name)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    tokio::fs::write(path, writer.into_inner()).await?;
    Ok(())
}

fn render_urlset(urls: &[String]) -> Result<Vec<u8>, anyhow::Error> {
    let mut writer = Writer::new(Vec::new());
    let mut root = BytesStart::new("urlset");
    root.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    for url in urls {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", url)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn small_url_set_produces_a_single_sitemap_without_index() {
        let directory = tempfile::tempdir().unwrap();
        let urls = vec!["https://example.com/".to_string()];
        write_sitemap_files(directory.path(), &urls).await.unwrap();
        assert!(directory.path().join("sitemap.xml").is_file());
        assert!(!directory.path().join("sitemap-0.xml").is_file());
        let contents = tokio::fs::read_to_string(directory.path().join("sitemap.xml"))
            .await
            .unwrap();
        assert!(contents.contains("https://example.com/"));
    }

    #[tokio::test]
    async fn oversized_url_set_shards_and_writes_an_index() {
        let directory = tempfile::tempdir().unwrap();
        let urls: Vec<String> = (0..(MAX_URLS_PER_SITEMAP + 1))
            .map(|i| format!("https://example.com/{i}/"))
            .collect();
        write_sitemap_files(directory.path(), &urls).await.unwrap();
        assert!(directory.path().join("sitemap-0.xml").is_file());
        assert!(directory.path().join("sitemap-1.xml").is_file());
        let index = tokio::fs::read_to_string(directory.path().join("sitemap.xml"))
            .await
            .unwrap();
        assert!(index.contains("sitemap-0.xml"));
        assert!(index.contains("sitemap-1.xml"));
    }
}
