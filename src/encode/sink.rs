use std::path::PathBuf;

use anyhow::Context;

use crate::encode::png::ExportedImage;
use crate::foundation::error::{RenderError, RenderResult};

/// Destination for exported images.
pub trait ImageSink {
    /// Deliver one image. Returns where it went, if the sink has a notion of location.
    fn write_image(&mut self, image: &ExportedImage) -> RenderResult<Option<PathBuf>>;
}

/// Writes images to the filesystem.
///
/// The target is either a file path, or a directory into which each image is saved under its own
/// file name.
#[derive(Clone, Debug)]
pub struct FileSink {
    target: PathBuf,
    into_dir: bool,
    overwrite: bool,
}

impl FileSink {
    /// Write to exactly `path`.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: path.into(),
            into_dir: false,
            overwrite: true,
        }
    }

    /// Write into `dir` using each image's file name.
    pub fn into_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: dir.into(),
            into_dir: true,
            overwrite: true,
        }
    }

    /// Refuse to replace existing files when `overwrite` is false.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Path `image` would be written to.
    pub fn path_for(&self, image: &ExportedImage) -> PathBuf {
        if self.into_dir {
            self.target.join(&image.file_name)
        } else {
            self.target.clone()
        }
    }
}

impl ImageSink for FileSink {
    fn write_image(&mut self, image: &ExportedImage) -> RenderResult<Option<PathBuf>> {
        let path = self.path_for(image);
        if !self.overwrite && path.exists() {
            return Err(RenderError::encode(format!(
                "refusing to overwrite '{}'",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "wrote image");
        Ok(Some(path))
    }
}

/// Keeps images in memory, in delivery order.
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    /// Images received so far.
    pub images: Vec<ExportedImage>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageSink for InMemorySink {
    fn write_image(&mut self, image: &ExportedImage) -> RenderResult<Option<PathBuf>> {
        self.images.push(image.clone());
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
