use crate::fetcher::FetchBackend;
use crate::resolver::SearchBackend;
use crate::structs::*;

const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]";
const AUDIO_FORMAT: &str = "bestaudio/best";

#[derive(serde::Deserialize)]
struct YtdlpPlaylist {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

/// Runs the yt-dlp executable for both searching and downloading
pub struct YtDlp {
    bin: std::path::PathBuf,
}

pub fn search_args(request: &SearchRequest) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = vec!["--dump-single-json".into(), "--no-warnings".into()];
    if request.flat {
        args.push("--flat-playlist".into());
    }
    args.push(format!("ytsearch{}:{}", request.limit, request.query).into());
    args
}

pub fn fetch_args(request: &FetchRequest) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = vec![
        "--no-playlist".into(),
        "--no-progress".into(),
        // A leftover file from an earlier run must not count as this run's result
        "--force-overwrites".into(),
        "--ffmpeg-location".into(),
        request.ffmpeg.clone().into(),
        "-o".into(),
        request.output_template.clone().into(),
    ];
    match request.mode {
        Mode::Audio => {
            for arg in ["-f", AUDIO_FORMAT, "--extract-audio", "--audio-format", "mp3", "--audio-quality", AUDIO_QUALITY]
            {
                args.push(arg.into());
            }
        }
        Mode::Video => {
            for arg in ["-f", VIDEO_FORMAT, "--merge-output-format", "mp4"] {
                args.push(arg.into());
            }
        }
    }
    // Locators are never options
    args.push("--".into());
    args.push(request.locator.clone().into());
    args
}

pub fn parse_search_output(stdout: &[u8]) -> Result<Vec<SearchEntry>, Error> {
    let playlist: YtdlpPlaylist = serde_json::from_slice(stdout)?;
    Ok(playlist.entries)
}

/// Last non-empty stderr line, which is where yt-dlp puts its `ERROR:` message
fn stderr_summary(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}

impl YtDlp {
    pub fn new(bin: impl Into<std::path::PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: Vec<std::ffi::OsString>) -> Result<Vec<u8>, Error> {
        log::debug!("running {} {:?}", self.bin.display(), args);
        let output = tokio::process::Command::new(&self.bin)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| format!("failed to start {}: {}", self.bin.display(), e))?;

        if !output.status.success() {
            return Err(format!("yt-dlp exited with {}: {}", output.status, stderr_summary(&output.stderr)).into());
        }
        Ok(output.stdout)
    }
}

impl SearchBackend for YtDlp {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> futures::future::BoxFuture<'a, Result<Vec<SearchEntry>, Error>> {
        Box::pin(async move {
            let stdout = self.run(search_args(request)).await?;
            parse_search_output(&stdout)
        })
    }
}

impl FetchBackend for YtDlp {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> futures::future::BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            self.run(fetch_args(request)).await?;
            Ok(())
        })
    }
}
