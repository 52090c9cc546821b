use crate::structs::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: std::net::SocketAddr,
    pub ytdlp_bin: std::path::PathBuf,
    /// None if ffmpeg couldn't be found; fetching will refuse to run
    pub ffmpeg: Option<std::path::PathBuf>,
    /// Empty path means the current working directory
    pub output_dir: std::path::PathBuf,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    /// Reads `.env` (if there is one) and then the process environment
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenv::dotenv() {
            log::debug!("not loading .env: {}", e);
        }

        let listen_addr = non_empty_var("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8501".into());
        let listen_addr = listen_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| format!("invalid LISTEN_ADDR {:?}: {}", listen_addr, e))?;

        let ffmpeg = locate_ffmpeg(
            non_empty_var("FFMPEG_BINARY").map(std::path::PathBuf::from),
            std::env::var_os("PATH"),
        );

        Ok(Self {
            listen_addr,
            ytdlp_bin: non_empty_var("YTDLP_BIN").unwrap_or_else(|| "yt-dlp".into()).into(),
            ffmpeg,
            output_dir: non_empty_var("OUTPUT_DIR").map(Into::into).unwrap_or_default(),
        })
    }
}

fn ffmpeg_file_name() -> &'static str {
    if cfg!(windows) {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    }
}

/// An explicitly configured binary wins if it exists, otherwise the first `ffmpeg` on `path_var`
pub fn locate_ffmpeg(
    explicit: Option<std::path::PathBuf>,
    path_var: Option<std::ffi::OsString>,
) -> Option<std::path::PathBuf> {
    if let Some(explicit) = explicit {
        if explicit.is_file() {
            return Some(explicit);
        }
        log::warn!("FFMPEG_BINARY {} doesn't exist, searching PATH", explicit.display());
    }

    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(ffmpeg_file_name()))
        .find(|candidate| candidate.is_file())
}
