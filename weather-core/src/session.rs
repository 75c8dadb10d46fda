//! The caller side of a lookup: drives the renderer around each request.

use crate::{
    client::NetworkClient,
    error::FetchError,
    geolocation::Geolocation,
    model::{PlaceQuery, WeatherReport},
    orchestrator::WeatherFetchOrchestrator,
    storage::KeyValueStore,
};

/// Presentation side of the app.
pub trait Renderer {
    fn show_loading(&mut self);
    fn show_idle(&mut self);
    fn show_report(&mut self, report: &WeatherReport);
    fn show_error(&mut self, error: &FetchError);
    fn show_recent(&mut self, recent: &[String]);
}

pub struct LookupSession<'a, C, S, R> {
    orchestrator: &'a WeatherFetchOrchestrator<C, S>,
    renderer: R,
}

impl<'a, C, S, R> LookupSession<'a, C, S, R>
where
    C: NetworkClient,
    S: KeyValueStore,
    R: Renderer,
{
    pub fn new(orchestrator: &'a WeatherFetchOrchestrator<C, S>, renderer: R) -> Self {
        Self { orchestrator, renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Push the persisted recent list to the renderer.
    pub fn refresh_recent(&mut self) {
        let recent = self.orchestrator.recent().load();
        self.renderer.show_recent(&recent);
    }

    /// Free-text search. Invalid input is reported without entering the
    /// loading state.
    pub async fn search(&mut self, text: &str) -> Result<WeatherReport, FetchError> {
        let query = match PlaceQuery::by_name(text) {
            Ok(query) => query,
            Err(err) => {
                self.renderer.show_error(&err);
                return Err(err);
            }
        };
        self.run(&query).await
    }

    /// Selecting an entry from the recent list behaves like a search for it.
    pub async fn select_recent(&mut self, place: &str) -> Result<WeatherReport, FetchError> {
        self.search(place).await
    }

    pub async fn use_location<G>(&mut self, geolocation: &G) -> Result<WeatherReport, FetchError>
    where
        G: Geolocation + ?Sized,
    {
        self.renderer.show_loading();
        let result = self.orchestrator.fetch_for_location(geolocation).await;
        self.finish(result)
    }

    async fn run(&mut self, query: &PlaceQuery) -> Result<WeatherReport, FetchError> {
        self.renderer.show_loading();
        let result = self.orchestrator.fetch_and_report(query).await;
        self.finish(result)
    }

    fn finish(
        &mut self,
        result: Result<WeatherReport, FetchError>,
    ) -> Result<WeatherReport, FetchError> {
        match &result {
            Ok(report) => {
                self.renderer.show_report(report);
                self.renderer.show_recent(&report.recent_searches);
            }
            Err(err) => self.renderer.show_error(err),
        }
        self.renderer.show_idle();
        result
    }
}
