pub mod decode;
pub mod store;

pub use decode::{decode_file, DecodedAudio};
pub use store::SampleStore;
