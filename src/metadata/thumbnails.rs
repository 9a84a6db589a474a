use crate::metadata::types::ThumbnailDescriptor;
use crate::video_id::VideoId;

const THUMBNAIL_HOST: &str = "https://img.youtube.com/vi";

/// (label, css class, file) from largest to smallest. Every video gets all
/// five; the browser hides the ones that 404.
const FORMATS: [(&str, &str, &str); 5] = [
    ("Max Resolution (1280x720)", "maxres", "maxresdefault.jpg"),
    ("Standard (640x480)", "sd", "sddefault.jpg"),
    ("High Quality (480x360)", "hq", "hqdefault.jpg"),
    ("Medium Quality (320x180)", "mq", "mqdefault.jpg"),
    ("Default (120x90)", "default", "default.jpg"),
];

pub fn thumbnails(video_id: &VideoId) -> [ThumbnailDescriptor; 5] {
    FORMATS.map(|(name, css, file)| ThumbnailDescriptor {
        name: name.to_string(),
        css: css.to_string(),
        url: format!("{THUMBNAIL_HOST}/{video_id}/{file}"),
    })
}
