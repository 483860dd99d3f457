//! Text extraction from various file formats

use crate::error::{Result, SkillFitError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// PDF text via `pdf-extract`. Unreadable documents give empty text.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        // The decoder can panic on malformed input; keep that off the caller's task
        let decoded = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| SkillFitError::PdfExtraction(e.to_string()))
        })
        .await
        .unwrap_or_else(|e| Err(SkillFitError::PdfExtraction(format!("decoder crashed: {}", e))));

        match decoded {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!("Could not read '{}', treating it as empty: {}", path.display(), e);
                Ok(String::new())
            }
        }
    }
}

/// Word documents are recognized but not decoded
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        // Still surface a missing or unreadable file as an I/O error
        fs::metadata(path).await?;
        log::warn!(
            "DOCX text extraction is not supported, treating '{}' as empty; convert it to PDF or text",
            path.display()
        );
        Ok(String::new())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(path).await?;
        Self::markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(markdown: &str) -> Result<String> {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Self::html_to_text(&html_output)
    }

    fn html_to_text(html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");

        let re = Regex::new(r"<[^>]*>")
            .map_err(|e| SkillFitError::TextProcessing(format!("Invalid tag regex: {}", e)))?;
        let stripped = re.replace_all(&text, "");

        // Entities last so escaped angle brackets survive tag stripping
        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        let lines: Vec<&str> = decoded
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text() {
        let text = MarkdownExtractor::markdown_to_text(
            "# Jane Doe\n\n## Skills\n\n- **Rust** & Python\n- C++ <templates>\n",
        )
        .unwrap();

        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Rust & Python"));
        assert!(!text.contains("<strong>"));
        assert!(!text.contains('#'));
    }
}
