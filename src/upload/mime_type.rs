use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Video,
}

impl MediaCategory {
    pub fn matches_mime(&self, mime: &str) -> bool {
        match self {
            MediaCategory::Image => mime.starts_with("image/"),
            MediaCategory::Video => mime.starts_with("video/"),
        }
    }
}

pub fn guess_mime_type(file_ext: &str) -> Option<Cow<'static, str>> {
    match file_ext {
        "mp4" => Some(Cow::Borrowed("video/mp4")),
        "webm" => Some(Cow::Borrowed("video/webm")),
        "mov" => Some(Cow::Borrowed("video/quicktime")),
        "avif" => Some(Cow::Borrowed("image/avif")),
        "webp" => Some(Cow::Borrowed("image/webp")),
        "jpg" | "jpeg" => Some(Cow::Borrowed("image/jpeg")),
        "png" => Some(Cow::Borrowed("image/png")),
        "heif" => Some(Cow::Borrowed("image/heif")),
        "heic" => Some(Cow::Borrowed("image/heic")),
        _ => None,
    }
}

pub fn guess_mime_type_path(path: &camino::Utf8Path) -> Option<Cow<'static, str>> {
    let ext = path.extension()?.to_ascii_lowercase();
    match guess_mime_type(&ext) {
        Some(m) => Some(m),
        None => {
            tracing::warn!(
                "can't guess MIME type for filename '{}'",
                &path
                    .file_name()
                    .map(|p| p.to_string())
                    .unwrap_or(String::new())
            );
            None
        }
    }
}

#[cfg(test)]
mod test {
    use camino::Utf8Path;

    use super::{guess_mime_type_path, MediaCategory};

    #[test]
    fn extension_to_category() {
        let mime = guess_mime_type_path(Utf8Path::new("holiday.JPG")).unwrap();
        assert!(MediaCategory::Image.matches_mime(&mime));
        assert!(!MediaCategory::Video.matches_mime(&mime));

        let mime = guess_mime_type_path(Utf8Path::new("clip.mp4")).unwrap();
        assert!(MediaCategory::Video.matches_mime(&mime));
        assert!(!MediaCategory::Image.matches_mime(&mime));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert!(guess_mime_type_path(Utf8Path::new("notes.txt")).is_none());
        assert!(guess_mime_type_path(Utf8Path::new("no_extension")).is_none());
    }
}
