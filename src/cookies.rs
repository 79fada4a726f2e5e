use denoiser_core::{parse_cookie, CookieTokenProvider};
use wasm_bindgen::JsCast;

/// Reads `document.cookie` at the moment a token is asked for.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

impl CookieTokenProvider for DocumentCookies {
    fn token(&self, name: &str) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let html: web_sys::HtmlDocument = document.dyn_into().ok()?;
        let raw = html.cookie().ok()?;
        parse_cookie(&raw, name)
    }
}
