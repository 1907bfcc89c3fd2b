use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::config::Settings;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::live::LiveWaitSample;
use crate::parser::{parse_hours_text, parse_queue_times};
use crate::services::park_api::ParkDataApi;

/// queue-times.com: the park's JSON wait feed and its daily calendar page.
pub struct QueueTimesClient<C> {
    http: C,
    settings: Settings,
}

impl<C: HttpClient> QueueTimesClient<C> {
    pub fn new(http: C, settings: &Settings) -> Self {
        Self {
            http,
            settings: settings.clone(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> ParkDataApi for QueueTimesClient<C> {
    async fn current_waits(&self) -> Result<Vec<LiveWaitSample>> {
        let url = self.settings.queue_times_url();
        let bytes = fetch_bytes(&self.http, &url)
            .await
            .map_err(|e| anyhow!("Failed to fetch {}: {}", url, e))?;

        let samples = parse_queue_times(&bytes)?;
        debug!(url = %url, rides = samples.len(), "Live waits fetched");
        Ok(samples)
    }

    async fn operating_hours(&self, date: NaiveDate) -> Result<(NaiveTime, NaiveTime)> {
        let url = self.settings.calendar_day_url(date);
        let bytes = fetch_bytes(&self.http, &url)
            .await
            .map_err(|e| anyhow!("Failed to fetch {}: {}", url, e))?;

        let page = String::from_utf8_lossy(&bytes);
        parse_hours_text(&page).ok_or_else(|| anyhow!("No operating hours found on {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;
    use crate::live::RideStatus;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const WAITS_PATH: &str = "/parks/16/queue_times.json";
    const CALENDAR_PATH: &str = "/en-US/parks/16/calendar/2025/10/17";

    /// The `MockServer` must outlive the client calls.
    async fn mock(route: &str, response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    fn client(server: &MockServer) -> QueueTimesClient<BasicClient> {
        let settings = Settings {
            base_url: server.uri(),
            ..Default::default()
        };
        QueueTimesClient::new(BasicClient::new(), &settings)
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_current_waits_parses_feed() {
        let body = r#"{"lands":[{"rides":[{"id":1,"name":"Autopia","is_open":true,"wait_time":25}]}],
            "rides":[{"id":2,"name":"Astro Orbitor","is_open":false,"wait_time":0}]}"#;
        let server = mock(
            WAITS_PATH,
            ResponseTemplate::new(200).set_body_raw(body, "application/json"),
        )
        .await;

        let samples = client(&server).current_waits().await.unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].ride_name, "Autopia");
        assert_eq!(samples[0].wait_minutes, Some(25));
        assert_eq!(samples[1].status, RideStatus::Closed);
    }

    #[tokio::test]
    async fn test_current_waits_fails_on_server_error() {
        let server = mock(WAITS_PATH, ResponseTemplate::new(500)).await;

        assert!(client(&server).current_waits().await.is_err());
    }

    #[tokio::test]
    async fn test_operating_hours_from_page() {
        let page = "<html><div>Disneyland Park</div><span>08:00-24:00</span></html>";
        let server = mock(
            CALENDAR_PATH,
            ResponseTemplate::new(200).set_body_raw(page, "text/html"),
        )
        .await;

        let (open, close) = client(&server).operating_hours(friday()).await.unwrap();

        assert_eq!(open, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(close, NaiveTime::MIN);
    }

    #[tokio::test]
    async fn test_operating_hours_missing_from_page() {
        let server = mock(
            CALENDAR_PATH,
            ResponseTemplate::new(200).set_body_raw("<html>Private event</html>", "text/html"),
        )
        .await;

        assert!(client(&server).operating_hours(friday()).await.is_err());
    }
}
