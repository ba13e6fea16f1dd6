use anyhow::Result;
use songs_scraper::app::ports::TableSource;
use songs_scraper::app::scrape_use_case::{RunOutcome, ScrapeUseCase};
use songs_scraper::constants::USER_AGENT;
use songs_scraper::error::ScraperError;
use songs_scraper::infra::{ReqwestFetcher, SqliteStore, TextBarChart};
use songs_scraper::types::CellValue;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table class="infobox"><tr><th>Ignored</th></tr></table>
<table class="wikitable sortable plainrowheaders">
  <tr><th>Rank</th><th>Song</th><th>Artist(s)</th><th>Streams (billions)</th><th>Release date</th></tr>
  <tr><td>1</td><th scope="row">"Blinding Lights"</th><td>The Weeknd</td><td>$4.2B<sup>[12]</sup></td><td>2019</td></tr>
  <tr><td>2</td><th scope="row">"Shape of You"</th><td>Ed Sheeran</td><td>3,9</td><td>2017</td></tr>
  <tr><td>3</td><th scope="row">—</th><td>Unknown</td><td>3.6</td><td>2018</td></tr>
  <tr><td>4</td><th scope="row">"Someone You Loved"</th><td>Lewis Capaldi</td><td>—</td><td>2018</td></tr>
  <tr><td>5</td><th scope="row">"Sunflower"</th><td>Post Malone and Swae Lee</td><td>3.4</td><td>2018</td></tr>
</table>
</body></html>"#;

/// Serve one HTTP response on a local port and hand back the raw request.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    (format!("http://{}/wiki/List_of_Spotify_streaming_records", addr), rx)
}

fn fetcher() -> ReqwestFetcher {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .no_proxy()
        .build()
        .unwrap();
    ReqwestFetcher::from_client(client)
}

#[tokio::test]
async fn test_full_run_against_local_page() -> Result<()> {
    let (url, request) = serve_once("200 OK", PAGE).await;
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");

    let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "spotify_data.db");
    let mut surface = TextBarChart::new(Vec::<u8>::new());
    let mut console: Vec<u8> = Vec::new();

    let outcome = use_case
        .run(|| SqliteStore::open(&db_path), &mut surface, &mut console)
        .await?;
    assert_eq!(outcome, RunOutcome::Stored { rows: 3 });

    // The fixed browser User-Agent went out with the request.
    let request = request.await?;
    assert!(request.contains(USER_AGENT));

    // Persisted verbatim, header text as columns.
    let store = SqliteStore::open(&db_path)?;
    let table = store.load_table("popular_songs")?;
    let columns: Vec<&str> = table.columns.iter().collect();
    assert_eq!(
        columns,
        vec!["Rank", "Song", "Artist(s)", "Streams (billions)", "Release date"]
    );
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.rows[0].cells,
        vec![
            CellValue::Text("1".into()),
            CellValue::Text("linding Lights".into()),
            CellValue::Text("The Weeknd".into()),
            CellValue::Text("4.2".into()),
            CellValue::Text("2019".into()),
        ]
    );
    assert_eq!(table.rows[1].cells[3], CellValue::Text("39".into()));
    assert_eq!(table.rows[2].cells[1], CellValue::Text("Sunflower".into()));

    assert_eq!(
        String::from_utf8(console)?,
        "Data cleaned and stored in spotify_data.db\n"
    );

    let chart = String::from_utf8(surface.into_inner())?;
    let lines: Vec<&str> = chart.lines().collect();
    assert_eq!(lines[0], "Top 10 Most Streamed Songs (in Billions)");
    assert!(chart.contains("Total Streams"));
    assert!(chart.contains("Song Name"));
    let first = lines.iter().position(|l| l.starts_with("linding Lights")).unwrap();
    let last = lines.iter().position(|l| l.starts_with("Sunflower")).unwrap();
    assert!(first < last);
    Ok(())
}

#[tokio::test]
async fn test_rerun_replaces_previous_contents() -> Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");

    for _ in 0..2 {
        let (url, _request) = serve_once("200 OK", PAGE).await;
        let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "db");
        use_case
            .run(
                || SqliteStore::open(&db_path),
                &mut TextBarChart::new(Vec::<u8>::new()),
                &mut Vec::<u8>::new(),
            )
            .await?;
    }

    let table = SqliteStore::open(&db_path)?.load_table("popular_songs")?;
    assert_eq!(table.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_a_fetch_error() -> Result<()> {
    let (url, _request) = serve_once("404 Not Found", "gone").await;
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");

    let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "db");
    let mut surface = TextBarChart::new(Vec::<u8>::new());
    let mut console: Vec<u8> = Vec::new();

    let err = use_case
        .run(|| SqliteStore::open(&db_path), &mut surface, &mut console)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::Fetch(_)));
    assert!(!db_path.exists());
    assert!(console.is_empty());
    assert!(surface.into_inner().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_page_without_marked_table_ends_cleanly() -> Result<()> {
    let (url, _request) =
        serve_once("200 OK", "<html><table class=\"infobox\"><tr><th>x</th></tr></table></html>").await;
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");

    let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "db");
    let mut surface = TextBarChart::new(Vec::<u8>::new());
    let mut console: Vec<u8> = Vec::new();

    let outcome = use_case
        .run(|| SqliteStore::open(&db_path), &mut surface, &mut console)
        .await?;

    assert_eq!(outcome, RunOutcome::TableNotFound);
    assert!(!db_path.exists());
    assert!(surface.into_inner().is_empty());
    assert_eq!(
        String::from_utf8(console)?,
        "Could not find the table on the page.\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_table_leaves_chart_file_untouched() -> Result<()> {
    let (url, _request) =
        serve_once("200 OK", "<html><table class=\"infobox\"><tr><th>x</th></tr></table></html>").await;
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");
    let chart_path = dir.path().join("chart.txt");
    std::fs::write(&chart_path, "chart from an earlier run")?;

    let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "db");
    let mut surface = TextBarChart::to_file(&chart_path);
    let mut console: Vec<u8> = Vec::new();

    let outcome = use_case
        .run(|| SqliteStore::open(&db_path), &mut surface, &mut console)
        .await?;
    drop(surface);

    assert_eq!(outcome, RunOutcome::TableNotFound);
    assert_eq!(
        std::fs::read_to_string(&chart_path)?,
        "chart from an earlier run"
    );
    Ok(())
}

#[tokio::test]
async fn test_stored_run_writes_chart_file() -> Result<()> {
    let (url, _request) = serve_once("200 OK", PAGE).await;
    let dir = tempdir()?;
    let db_path = dir.path().join("spotify_data.db");
    let chart_path = dir.path().join("chart.txt");

    let use_case = ScrapeUseCase::new(Box::new(fetcher()), url, "popular_songs", "db");
    let mut surface = TextBarChart::to_file(&chart_path);
    use_case
        .run(|| SqliteStore::open(&db_path), &mut surface, &mut Vec::<u8>::new())
        .await?;
    drop(surface);

    let chart = std::fs::read_to_string(&chart_path)?;
    assert!(chart.starts_with("Top 10 Most Streamed Songs (in Billions)"));
    Ok(())
}
