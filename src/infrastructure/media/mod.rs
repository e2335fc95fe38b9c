mod encoder;

pub use encoder::{encode_media, load_media, MediaError};
