use weather_core::{CurrentConditions, FetchError, ForecastEntry, Renderer, WeatherReport};

/// Ordered substring → icon table; the first match wins.
const ICONS: &[(&str, &str)] = &[
    ("clear sky", "☀"),
    ("few clouds", "🌤"),
    ("scattered clouds", "☁"),
    ("broken clouds", "☁"),
    ("shower rain", "🌧"),
    ("rain", "🌦"),
    ("thunderstorm", "⚡"),
    ("snow", "❄"),
    ("mist", "🌫"),
];

const DEFAULT_ICON: &str = "☁";

pub fn icon_for(description: &str) -> &'static str {
    let description = description.to_lowercase();
    ICONS
        .iter()
        .find(|(needle, _)| description.contains(needle))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Prints lookups to stdout and failures to stderr.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    verbose: bool,
}

impl TerminalRenderer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Renderer for TerminalRenderer {
    fn show_loading(&mut self) {
        eprintln!("Loading weather data...");
    }

    fn show_idle(&mut self) {}

    fn show_report(&mut self, report: &WeatherReport) {
        println!("{}", format_current(&report.current));
        if !report.forecast.is_empty() {
            println!();
            println!("{}-day forecast", report.forecast.len());
            for entry in &report.forecast {
                println!("{}", format_forecast(entry));
            }
        }
    }

    fn show_error(&mut self, error: &FetchError) {
        eprintln!("{}", error.user_message());
        if self.verbose {
            eprintln!("  ({error})");
        }
    }

    fn show_recent(&mut self, recent: &[String]) {
        if recent.is_empty() {
            return;
        }
        println!();
        println!("Recent searches: {}", recent.join(", "));
    }
}

pub fn format_current(current: &CurrentConditions) -> String {
    format!(
        "{} ({})\n  {} {:.0}°C, {}\n  Humidity: {}%\n  Wind: {:.0} m/s",
        current.place_name,
        current.observed_at_local,
        icon_for(&current.description),
        current.temperature_c,
        current.description,
        current.humidity_pct,
        current.wind_speed_mps,
    )
}

pub fn format_forecast(entry: &ForecastEntry) -> String {
    format!(
        "  {:<12} {} {:>4.0}°C  Wind: {:.0} m/s  Humidity: {}%  {}",
        entry.date_label,
        icon_for(&entry.description),
        entry.temperature_c,
        entry.wind_speed_mps,
        entry.humidity_pct,
        entry.description,
    )
}
