pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Maximum number of entries requested from a search
pub const SEARCH_LIMIT: usize = 5;

/// Target bitrate for extracted mp3 audio
pub const AUDIO_QUALITY: &str = "192K";

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Audio,
    Video,
}

impl Mode {
    pub fn extension(self) -> &'static str {
        match self {
            Mode::Audio => "mp3",
            Mode::Video => "mp4",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Mode::Audio => "audio/mpeg",
            Mode::Video => "video/mp4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Audio => "Audio (MP3)",
            Mode::Video => "Video (MP4)",
        }
    }

    /// `<dir>/<base_name>.<ext>`; an empty `dir` yields a bare file name
    pub fn output_path(self, dir: &std::path::Path, base_name: &str) -> std::path::PathBuf {
        dir.join(format!("{}.{}", base_name, self.extension()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    /// Only list entries, don't resolve every video page
    pub flat: bool,
}

/// One entry of a search result. Fields are missing when the extractor didn't provide them.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct SearchEntry {
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCandidate {
    pub locator: Option<String>,
    pub title: Option<String>,
}

impl SearchCandidate {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub locator: String,
    pub mode: Mode,
    /// Where the finished file is expected
    pub output_path: std::path::PathBuf,
    /// yt-dlp `-o` template producing `output_path`
    pub output_template: String,
    pub ffmpeg: std::path::PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResult {
    pub output_path: Option<std::path::PathBuf>,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message shown to the user after a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Collects user-visible messages while a submission runs
#[derive(Debug, Default)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.0.push(Notice { level, text: text.into() });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text)
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text)
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Warning, text)
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text)
    }

    pub fn into_vec(self) -> Vec<Notice> {
        self.0
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Phase {
    Idle,
    Searching,
    NoResults,
    Found,
    Fetching,
    Done,
    Failed,
}

/// A file that finished downloading and may be handed to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub path: std::path::PathBuf,
    pub mode: Mode,
}

impl Download {
    /// Suggested name for the browser's save dialog
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn content_type(&self) -> &'static str {
        self.mode.content_type()
    }
}

/// Outcome of running the workflow once
#[derive(Debug)]
pub struct Submission {
    pub phase: Phase,
    pub candidate: Option<SearchCandidate>,
    pub download: Option<Download>,
    pub notices: Vec<Notice>,
}
