// Example: page a simulated upstream into a Controller, switching queries mid-flight.
use std::future::Future;
use std::time::Duration;

use photowall::Photo;
use photowall_adapter::{
    Completion, Controller, Feed, FetchError, PageRequest, PaginationOptions, PhotoPage,
    PhotoSource,
};
use tokio_util::sync::CancellationToken;

struct Simulated;

impl PhotoSource for Simulated {
    fn fetch(
        &self,
        request: PageRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<PhotoPage, FetchError>> + Send {
        async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(FetchError::Aborted),
                _ = tokio::time::sleep(Duration::from_millis(30)) => {
                    let label = request.query.text().unwrap_or("curated").to_string();
                    let start = u64::from(request.page - 1) * u64::from(request.per_page);
                    let photos = (start..start + u64::from(request.per_page))
                        .map(|i| {
                            let width = 4000 + (i % 5) as u32 * 500;
                            Photo::new(i, width, 4000, format!("https://img.example/{i}.jpg"))
                                .with_alt(format!("{label} #{i}"))
                        })
                        .collect();
                    Ok(PhotoPage::new(photos, request.page, request.per_page)
                        .with_total_results(90))
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let options = PaginationOptions::default();
    let mut feed = Feed::new(Simulated, options);
    let mut c = Controller::default();
    c.measure(1024.0, 768.0);

    let mut now_ms = 0u64;
    loop {
        let visible = c.is_sentinel_visible(&options.sentinel);
        if !feed.load_more(visible) && !feed.coordinator().is_loading() {
            break;
        }
        match feed.next_completion().await {
            Some(Completion::Applied { added, has_more, .. }) => {
                let coord = feed.coordinator();
                c.set_photos(coord.photos().to_vec(), coord.version());
                println!(
                    "page added={added} has_more={has_more} total={}",
                    coord.photos().len()
                );
            }
            Some(other) => println!("completion: {other:?}"),
            None => {}
        }
        // Scroll to the end of the content.
        now_ms += 200;
        c.on_scroll(c.content_height(), now_ms);
        c.tick(now_ms);
    }

    // A search superseded before it lands never reaches the controller.
    feed.search("nature");
    feed.search("city");
    if let Some(done) = feed.next_completion().await {
        let coord = feed.coordinator();
        c.set_photos(coord.photos().to_vec(), coord.version());
        let first_alt = c.photos().first().map(|p| p.alt.as_str());
        println!("{done:?} first_alt={first_alt:?}");
    }
}
