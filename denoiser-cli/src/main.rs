use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use denoiser_client::{ClientConfig, DenoiseClient, DEFAULT_BASE_URL};
use denoiser_core::{
    is_accepted_file_name, Completion, CookieString, CookieTokenProvider, DenoiseResult,
    DenoiseSession, RequestState, CSRF_COOKIE_NAME,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Parser, Debug)]
#[command(name = "denoise")]
#[command(about = "Send a WAV file to the denoising service and save the cleaned audio")]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Service root URL
    #[arg(short, long, env = "DENOISE_ENDPOINT", default_value = DEFAULT_BASE_URL)]
    endpoint: String,

    /// Where to write the result. Defaults to the name the server suggests,
    /// or `<stem>_denoised.wav`, next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raw cookie string to take the CSRF token from, e.g. "csrftoken=abc; sessionid=xyz"
    #[arg(long, env = "DENOISE_COOKIE")]
    cookie: Option<String>,

    /// CSRF token to send as-is (overrides --cookie)
    #[arg(long, env = "DENOISE_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    force: bool,

    /// Print a JSON summary instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    input: &'a Path,
    generation: u64,
    state: RequestState,
    output: &'a Path,
    bytes: usize,
    content_type: &'a str,
    sha256: String,
}

/// Token source: an explicit token wins over the cookie string.
fn cookie_provider(args: &Args) -> Box<dyn CookieTokenProvider> {
    match (&args.csrf_token, &args.cookie) {
        (Some(token), _) => {
            let token = token.clone();
            Box::new(move |name: &str| (name == CSRF_COOKIE_NAME).then(|| token.clone()))
        }
        (None, Some(raw)) => Box::new(CookieString::new(raw.clone())),
        (None, None) => Box::new(CookieString::default()),
    }
}

fn output_path(input: &Path, explicit: Option<&Path>, suggested: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    match suggested {
        Some(name) => dir.join(name),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "audio".to_string());
            dir.join(format!("{stem}_denoised.wav"))
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

async fn write_result(args: &Args, result: &DenoiseResult) -> Result<PathBuf> {
    let path = output_path(&args.input, args.output.as_deref(), result.suggested_name.as_deref());
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    tokio::fs::write(&path, &result.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Input path has no file name")?;
    if !is_accepted_file_name(&file_name) {
        bail!("{} is not a .wav file", args.input.display());
    }
    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let client = DenoiseClient::new(ClientConfig {
        base_url: args.endpoint.clone(),
        timeout: args.timeout.map(Duration::from_secs),
    })?;
    let cookies = cookie_provider(&args);

    let mut session: DenoiseSession<Infallible> = DenoiseSession::new();
    let generation = session.select_file(file_name, bytes);
    log::info!("Submitting {} to {}", args.input.display(), client.endpoint());

    match session.submit(&client, cookies.as_ref()).await? {
        Completion::Succeeded => {}
        Completion::Failed(e) => bail!("Denoising failed: {e}"),
        Completion::Discarded => bail!("Response was superseded"),
    }
    let result = session
        .result()
        .context("Request succeeded but produced no result")?;
    let path = write_result(&args, result).await?;

    let summary = Summary {
        input: &args.input,
        generation: generation.0,
        state: session.request_state(),
        output: &path,
        bytes: result.bytes.len(),
        content_type: &result.content_type,
        sha256: sha256_hex(&result.bytes),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Wrote {} ({} bytes, {})",
            summary.output.display(),
            summary.bytes,
            summary.content_type
        );
    }

    Ok(())
}
