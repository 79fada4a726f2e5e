pub mod media;
pub mod object_url;
pub mod wav_info;
