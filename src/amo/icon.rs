//! Add-on icons
//!
//! Icons are fetched on demand and never cached. A response body only
//! becomes an [`Icon`] when its leading bytes identify a known image format.

use std::path::Path;

use crate::error::Result;

/// Image formats served for add-on icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
}

impl ImageFormat {
    /// Identify the format from the leading bytes of an image
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(PNG) {
            return Some(Self::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }

        // SVG is text: look for the root element near the start
        let head = &bytes[..bytes.len().min(512)];
        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            return Some(Self::Svg);
        }

        None
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }

    /// MIME type
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// A fetched icon image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl Icon {
    /// Decode a response body, or `None` if it is not a recognised image
    pub fn decode(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::sniff(&bytes)?;
        Some(Self { format, bytes })
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the icon to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}
