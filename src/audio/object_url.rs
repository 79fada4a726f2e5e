use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

/// A `blob:` URL that is revoked when dropped.
#[derive(Debug)]
pub struct ObjectUrl {
    href: String,
}

impl ObjectUrl {
    /// URL for an existing blob (e.g. the picked `File`), without copying it.
    pub fn from_blob(blob: &Blob) -> Result<Self, JsValue> {
        let href = Url::create_object_url_with_blob(blob)?;
        Ok(Self { href })
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, JsValue> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        Self::from_blob(&blob)
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.href) {
            log::warn!("Failed to revoke {}: {:?}", self.href, e);
        }
    }
}
