use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Local,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Deserializer
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::PlannerError;
use crate::locale::{
  DEFAULT_LOCALE,
  LocaleFormatter
};
use crate::month::WeekStart;
use crate::preview::DEFAULT_PREVIEW_LIMIT;

pub const CONFIG_ENV: &str =
  "PLANNER_CONFIG";

const CONFIG_FILE: &str = "planner.toml";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct PlannerConfig {
  #[serde(default = "default_version")]
  pub version:  u32,
  #[serde(default = "default_locale")]
  pub locale:   String,
  /// IANA zone deciding "today". The
  /// system zone when absent.
  #[serde(default)]
  pub timezone: Option<String>,
  #[serde(default)]
  pub policies: PlannerPolicies
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct PlannerPolicies {
  #[serde(
    default = "default_week_start",
    deserialize_with = "week_start_value"
  )]
  pub week_start:    String,
  #[serde(
    default = "default_preview_limit"
  )]
  pub preview_limit: usize,
  #[serde(default = "default_color")]
  pub color:         bool
}

impl Default for PlannerConfig {
  fn default() -> Self {
    Self {
      version:  default_version(),
      locale:   default_locale(),
      timezone: None,
      policies: PlannerPolicies::default()
    }
  }
}

impl Default for PlannerPolicies {
  fn default() -> Self {
    Self {
      week_start:    default_week_start(),
      preview_limit: default_preview_limit(),
      color:         default_color()
    }
  }
}

fn default_version() -> u32 {
  1
}

fn default_locale() -> String {
  DEFAULT_LOCALE.to_string()
}

fn default_week_start() -> String {
  WeekStart::default()
    .index()
    .to_string()
}

/// `week_start = 1` and
/// `week_start = "monday"` are both
/// accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeekStartValue {
  Index(i64),
  Name(String)
}

fn week_start_value<'de, D>(
  deserializer: D
) -> Result<String, D::Error>
where
  D: Deserializer<'de>
{
  Ok(
    match WeekStartValue::deserialize(
      deserializer
    )? {
      | WeekStartValue::Index(index) => {
        index.to_string()
      }
      | WeekStartValue::Name(name) => name
    }
  )
}

fn default_preview_limit() -> usize {
  DEFAULT_PREVIEW_LIMIT
}

fn default_color() -> bool {
  true
}

impl PlannerConfig {
  /// Loads from `override_path`, then
  /// `$PLANNER_CONFIG`, then the user
  /// config dir. No file at all means
  /// defaults.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(override_path)
    else {
      debug!(
        "no planner config found; \
         using defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading planner config");
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "invalid config {}",
          path.display()
        )
      })
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(text)
        .map_err(|err| {
          anyhow!(PlannerError::Config(
            err.to_string()
          ))
        })?;
    config.sanitize();
    info!(
      version = config.version,
      locale = %config.locale,
      timezone = ?config.timezone,
      week_start = %config.policies.week_start,
      "loaded planner config"
    );
    Ok(config)
  }

  /// Replaces unusable values with their
  /// defaults, logging each repair.
  pub fn sanitize(&mut self) {
    if WeekStart::parse(
      &self.policies.week_start
    )
    .is_err()
    {
      warn!(
        week_start = %self.policies.week_start,
        "invalid week start; using sunday"
      );
      self.policies.week_start =
        default_week_start();
    }

    if self.policies.preview_limit == 0 {
      warn!(
        "preview limit must be \
         positive; using default"
      );
      self.policies.preview_limit =
        default_preview_limit();
    }

    if LocaleFormatter::new(&self.locale)
      .is_err()
    {
      warn!(locale = %self.locale, "unknown locale; using default");
      self.locale = default_locale();
    }

    if let Some(zone) =
      self.timezone.as_deref()
      && zone.parse::<Tz>().is_err()
    {
      warn!(timezone = %zone, "unknown timezone; using system zone");
      self.timezone = None;
    }
  }

  pub fn week_start(&self) -> WeekStart {
    WeekStart::parse(
      &self.policies.week_start
    )
    .unwrap_or_default()
  }

  pub fn timezone(&self) -> Option<Tz> {
    self
      .timezone
      .as_deref()
      .and_then(|zone| zone.parse().ok())
  }

  /// Current date in the configured
  /// zone.
  pub fn today(&self) -> NaiveDate {
    match self.timezone() {
      | Some(tz) => {
        Utc::now()
          .with_timezone(&tz)
          .date_naive()
      }
      | None => Local::now().date_naive()
    }
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(expand_tilde(path));
  }

  if let Ok(from_env) =
    std::env::var(CONFIG_ENV)
    && !from_env.trim().is_empty()
  {
    return Some(expand_tilde(
      Path::new(&from_env)
    ));
  }

  let candidate = dirs::config_dir()?
    .join("planner")
    .join(CONFIG_FILE);
  candidate.exists().then_some(candidate)
}

pub(crate) fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
