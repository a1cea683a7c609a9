use chrono::{FixedOffset, Local, Offset, Utc};
use clap::{Args, Parser, Subcommand};
use skyboard_core::{
    Config, Dashboard, DashboardView, DisplayUnit, RecentSearches, WeatherError, WeatherFetcher,
    provider::client_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    /// Log requests and decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Display unit; defaults to the configured one.
    #[arg(long, value_parser = parse_unit)]
    pub unit: Option<DisplayUnit>,

    /// Show times in the location's clock instead of this machine's.
    #[arg(long)]
    pub location_time: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and display unit.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, optionally with country, e.g. "Paris, FR". Defaults to the configured city.
        city: Option<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show weather for a latitude/longitude pair.
    Here {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// List place names matching a partial query.
    Suggest {
        query: String,
    },

    /// List recent successful searches.
    Recent,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, display } => {
                let cfg = Config::load()?;
                let city = city.unwrap_or_else(|| cfg.default_city.clone());
                let dash = dashboard(&cfg, &display)?;

                dash.search(&city).await.map_err(user_facing)?;

                if let Err(err) = dash.recent_searches().save() {
                    tracing::warn!(error = %err, "Could not save recent searches");
                }
                render(&dash, display.location_time);
                Ok(())
            }
            Command::Here { lat, lon, display } => {
                let cfg = Config::load()?;
                let dash = dashboard(&cfg, &display)?;

                dash.locate(lat, lon).await.map_err(user_facing)?;

                render(&dash, display.location_time);
                Ok(())
            }
            Command::Suggest { query } => {
                let cfg = Config::load()?;
                let fetcher = WeatherFetcher::from_client(client_from_config(&cfg)?);

                let suggestions = fetcher.suggest(&query).await.map_err(user_facing)?;
                if suggestions.is_empty() {
                    println!("No suggestions.");
                }
                for s in suggestions {
                    println!("{}  ({:.4}, {:.4})", s.label, s.latitude, s.longitude);
                }
                Ok(())
            }
            Command::Recent => {
                let recent = RecentSearches::load()?;
                if recent.is_empty() {
                    println!("No recent searches.");
                }
                for entry in recent.entries() {
                    println!("{entry}");
                }
                Ok(())
            }
        }
    }
}

fn dashboard(cfg: &Config, display: &DisplayArgs) -> anyhow::Result<Dashboard> {
    let fetcher = WeatherFetcher::from_client(client_from_config(cfg)?);
    let recent = RecentSearches::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Ignoring unreadable recent searches");
        RecentSearches::default()
    });

    Ok(Dashboard::new(fetcher, display.unit.unwrap_or(cfg.unit)).with_recent(recent))
}

fn user_facing(err: WeatherError) -> anyhow::Error {
    tracing::debug!(error = %err, kind = ?err.kind(), "Fetch failed");
    anyhow::anyhow!(err.user_message())
}

fn render(dash: &Dashboard, location_time: bool) {
    let view = match dash.snapshot() {
        Some(snapshot) if location_time => {
            let offset = FixedOffset::east_opt(snapshot.current.utc_offset_seconds)
                .unwrap_or_else(|| Utc.fix());
            dash.view(offset)
        }
        _ => dash.view(Local),
    };

    if let Some(view) = view {
        print!("{}", layout(&view));
    }
}

fn layout(view: &DashboardView) -> String {
    let c = &view.current;
    let mut out = format!(
        "{}\n{}\n\n  {}  {}  [{}]\n",
        c.location, c.date, c.temperature, c.description, c.icon
    );
    out.push_str(&format!(
        "  Humidity {}   Wind {}   Pressure {}\n  Sunrise {}   Sunset {}\n",
        c.humidity, c.wind, c.pressure, c.sunrise, c.sunset
    ));

    if !view.days.is_empty() {
        out.push_str("\nForecast\n");
        for d in &view.days {
            out.push_str(&format!(
                "  {:<4} {:<7} {:>5} / {:<5} [{}]\n",
                d.day, d.date, d.max, d.min, d.icon
            ));
        }
    }

    out
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()?;
    cfg.set_api_key(api_key);

    cfg.default_city = inquire::Text::new("Default city:")
        .with_default(&cfg.default_city)
        .prompt()?;

    let units = vec![DisplayUnit::Celsius, DisplayUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == cfg.unit).unwrap_or(0);
    cfg.unit = inquire::Select::new("Display unit:", units).with_starting_cursor(start).prompt()?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_unit(value: &str) -> Result<DisplayUnit, String> {
    DisplayUnit::try_from(value).map_err(|e| e.to_string())
}
