use crate::structs::*;
use crate::utils::*;

const INDEX_HTML: &str = include_str!("../frontend/index.html");

#[derive(serde::Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    query: String,
    #[serde(default)]
    mode: Mode,
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(r#"<div class="notice {}">{}</div>"#, class, escape_html(&notice.text))
}

fn render_page(query: &str, mode: Mode, notices: &[Notice], download: Option<&Download>) -> String {
    let notices = notices.iter().map(render_notice).collect::<Vec<_>>().join("\n");
    let download = match download {
        Some(download) => format!(
            r#"<a class="download" href="/files/{}" download="{}">Download File</a>"#,
            url_path_segment(&download.file_name()),
            escape_html(&download.file_name()),
        ),
        None => String::new(),
    };
    let query = escape_html(query);
    let checked = |m: Mode| if m == mode { "checked" } else { "" };

    fill_template(
        INDEX_HTML,
        &[
            ("QUERY", query.as_str()),
            ("AUDIO_CHECKED", checked(Mode::Audio)),
            ("VIDEO_CHECKED", checked(Mode::Video)),
            ("NOTICES", notices.as_str()),
            ("DOWNLOAD", download.as_str()),
        ],
    )
}

pub async fn get_index() -> axum::response::Html<String> {
    axum::response::Html(render_page("", Mode::default(), &[], None))
}

pub async fn post_index(
    axum::extract::State(state): axum::extract::State<std::sync::Arc<crate::State>>,
    axum::extract::Form(form): axum::extract::Form<SubmitForm>,
) -> axum::response::Html<String> {
    let SubmitForm { query, mode } = form;
    log::info!("submission: {:?} as {}", query, mode.label());

    let submission = {
        let _one_at_a_time = state.submission_lock.lock().await;
        state.workflow.submit(&query, mode).await
    };
    log::debug!("submission for {:?} ended in {:?}", query, submission.phase);

    if let Some(download) = &submission.download {
        state.downloads.lock().insert(download.file_name(), download.clone());
    }

    axum::response::Html(render_page(&query, mode, &submission.notices, submission.download.as_ref()))
}

pub async fn get_file(
    axum::extract::State(state): axum::extract::State<std::sync::Arc<crate::State>>,
    axum::extract::Path(name): axum::extract::Path<String>,
    request: axum::http::Request<axum::body::Body>,
) -> Result<axum::response::Response, axum::response::ErrorResponse> {
    use tower::ServiceExt as _;

    let download = state.downloads.lock().get(&name).cloned().ok_or(axum::http::StatusCode::NOT_FOUND)?;
    if tokio::fs::metadata(&download.path).await.is_err() {
        log::warn!("{} was offered for download but is gone", download.path.display());
        return Err(axum::http::StatusCode::NOT_FOUND.into());
    }

    let response = tower_http::services::ServeFile::new(&download.path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    let mut response = response.map(axum::body::boxed);

    let headers = response.headers_mut();
    headers.insert(
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static(download.content_type()),
    );
    headers.insert(
        axum::http::header::CONTENT_DISPOSITION,
        axum::http::HeaderValue::from_str(&content_disposition(&download.file_name()))
            .map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)?,
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::*;
    use crate::resolver::tests::*;

    fn app(search: StubSearch, dir: &std::path::Path) -> (std::sync::Arc<crate::State>, axum::Router) {
        let workflow = crate::workflow::Workflow::new(
            crate::resolver::Resolver::new(std::sync::Arc::new(search)),
            crate::fetcher::Fetcher::new(
                std::sync::Arc::new(StubFetch::new(StubBehavior::WriteFile)),
                Some("ffmpeg".into()),
                dir.to_path_buf(),
            ),
        );
        let state = std::sync::Arc::new(crate::State::new(workflow));
        (state.clone(), crate::router(state))
    }

    async fn body_string(response: axum::response::Response) -> String {
        use axum::body::HttpBody as _;

        let mut body = response.into_body();
        let mut bytes = Vec::new();
        while let Some(chunk) = body.data().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        String::from_utf8(bytes).unwrap()
    }

    fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::get(uri).body(axum::body::Body::empty()).unwrap()
    }

    fn post_form(body: &'static str) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::post("/")
            .header(axum::http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn index_shows_form() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        let (_, app) = app(StubSearch::default(), dir.path());

        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"name="query""#));
        assert!(html.contains(r#"value="audio" checked"#));
        assert!(!html.contains("NOTICES"));
    }

    #[tokio::test]
    async fn blank_submission_warns() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        let (state, app) = app(StubSearch::default(), dir.path());

        let response = app.oneshot(post_form("query=++&mode=video")).await.unwrap();

        let html = body_string(response).await;
        assert!(html.contains(r#"class="notice warning""#));
        assert!(html.contains(r#"value="video" checked"#));
        assert!(state.downloads.lock().is_empty());
    }

    #[tokio::test]
    async fn submission_offers_file_with_matching_content_type() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        let (state, app) = app(
            StubSearch::with_entries(vec![entry(Some("L1"), Some("<My/Song:Name>"))]),
            dir.path(),
        );

        let response = app.clone().oneshot(post_form("query=my+song&mode=audio")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Found: &lt;My/Song:Name&gt;"));
        assert!(html.contains(r#"href="/files/%5FMy%5FSong%5FName%5F%2Emp3""#));
        assert!(state.downloads.lock().contains_key("_My_Song_Name_.mp3"));

        let response = app.oneshot(get("/files/%5FMy%5FSong%5FName%5F%2Emp3")).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(response.headers()[axum::http::header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_DISPOSITION],
            "attachment; filename=\"_My_Song_Name_.mp3\"; filename*=UTF-8''_My_Song_Name_.mp3"
        );
        assert_eq!(body_string(response).await, "ID3");
    }

    #[tokio::test]
    async fn video_submission_is_served_as_mp4() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        let (state, app) = app(StubSearch::with_entries(vec![entry(Some("L1"), Some("Clip"))]), dir.path());

        let response = app.clone().oneshot(post_form("query=clip&mode=video")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains(r#"href="/files/Clip%2Emp4""#));
        assert_eq!(state.downloads.lock()["Clip.mp4"].mode, Mode::Video);

        let response = app.oneshot(get("/files/Clip%2Emp4")).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(response.headers()[axum::http::header::CONTENT_TYPE], "video/mp4");
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_DISPOSITION],
            "attachment; filename=\"Clip.mp4\"; filename*=UTF-8''Clip.mp4"
        );
    }

    #[tokio::test]
    async fn unknown_file_is_not_served() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        std::fs::write(dir.path().join("secret.mp3"), b"x").unwrap();
        let (_, app) = app(StubSearch::default(), dir.path());

        let response = app.oneshot(get("/files/secret.mp3")).await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn vanished_file_is_not_found() {
        use tower::ServiceExt as _;
        let dir = temp_dir();
        let (state, app) = app(StubSearch::default(), dir.path());
        state.downloads.lock().insert(
            "Gone.mp4".into(),
            Download { path: dir.path().join("Gone.mp4"), mode: Mode::Video },
        );

        let response = app.oneshot(get("/files/Gone.mp4")).await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
