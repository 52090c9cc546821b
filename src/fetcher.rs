use crate::structs::*;

/// Something that can download (and transcode) media from a locator
pub trait FetchBackend: Send + Sync {
    /// Must leave the finished file at `request.output_path`
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> futures::future::BoxFuture<'a, Result<(), Error>>;
}

/// yt-dlp expands `%(...)s` in output templates, so literal percent signs must be doubled
pub fn escape_output_template(s: &str) -> String {
    s.replace('%', "%%")
}

pub struct Fetcher {
    backend: std::sync::Arc<dyn FetchBackend>,
    ffmpeg: Option<std::path::PathBuf>,
    output_dir: std::path::PathBuf,
}

impl Fetcher {
    pub fn new(
        backend: std::sync::Arc<dyn FetchBackend>,
        ffmpeg: Option<std::path::PathBuf>,
        output_dir: std::path::PathBuf,
    ) -> Self {
        Self { backend, ffmpeg, output_dir }
    }

    fn request(&self, locator: &str, base_name: &str, mode: Mode) -> Result<FetchRequest, Error> {
        let ffmpeg = self.ffmpeg.clone().ok_or("ffmpeg could not be found; install it or set FFMPEG_BINARY")?;
        // The directory is part of the template too
        let output_stem = self.output_dir.join(base_name);
        let output_template = format!("{}.%(ext)s", escape_output_template(&output_stem.to_string_lossy()));

        Ok(FetchRequest {
            locator: locator.to_string(),
            mode,
            output_path: mode.output_path(&self.output_dir, base_name),
            output_template,
            ffmpeg,
        })
    }

    async fn try_fetch(&self, locator: &str, base_name: &str, mode: Mode) -> Result<std::path::PathBuf, Error> {
        let request = self.request(locator, base_name, mode)?;
        self.backend.fetch(&request).await?;

        let metadata = tokio::fs::metadata(&request.output_path)
            .await
            .map_err(|e| format!("{} was not created: {}", request.output_path.display(), e))?;
        if metadata.len() == 0 {
            return Err(format!("{} is empty", request.output_path.display()).into());
        }

        Ok(request.output_path)
    }

    /// Downloads `locator` to `<output_dir>/<base_name>.<mp3|mp4>`. Errors are reported to
    /// `notices` and yield an empty result.
    pub async fn fetch(&self, locator: &str, base_name: &str, mode: Mode, notices: &mut Notices) -> FetchResult {
        match self.try_fetch(locator, base_name, mode).await {
            Ok(path) => {
                log::info!("downloaded {} to {}", locator, path.display());
                FetchResult { output_path: Some(path) }
            }
            Err(e) => {
                log::warn!("downloading {} failed: {}", locator, e);
                notices.error(format!("Error while downloading: {}", e));
                FetchResult { output_path: None }
            }
        }
    }
}
