use denoiser_client::DEFAULT_BASE_URL;

/// Service root, fixed at build time via `DENOISE_ENDPOINT`.
pub fn endpoint() -> &'static str {
    option_env!("DENOISE_ENDPOINT").unwrap_or(DEFAULT_BASE_URL)
}
