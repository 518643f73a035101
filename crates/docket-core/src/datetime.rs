use std::fmt;
use std::sync::OnceLock;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  Local,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  SecondsFormat,
  SubsecRound,
  TimeZone,
  Utc
};
use chrono_tz::Tz;

pub const TIMEZONE_ENV_VAR: &str =
  "DOCKET_TIMEZONE";

/// Display pattern for due dates,
/// e.g. `October 19, 2026 at 9:00 AM`.
pub const DUE_DISPLAY_FORMAT: &str =
  "%B %-d, %Y at %-I:%M %p";

const NAIVE_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M"
];

/// The zone naive wall-clock inputs
/// are interpreted in and due dates
/// are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
  Local,
  Named(Tz)
}

impl Zone {
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return None;
    }
    if trimmed
      .eq_ignore_ascii_case("local")
    {
      return Some(Self::Local);
    }

    match trimmed.parse::<Tz>() {
      | Ok(tz) => Some(Self::Named(tz)),
      | Err(error) => {
        tracing::warn!(
          timezone = trimmed,
          %error,
          "failed to parse timezone id"
        );
        None
      }
    }
  }

  pub fn to_utc(
    &self,
    local_naive: NaiveDateTime,
    context: &str
  ) -> anyhow::Result<DateTime<Utc>> {
    match self {
      | Self::Local => {
        resolve_local(
          Local.from_local_datetime(
            &local_naive
          ),
          context
        )
      }
      | Self::Named(tz) => {
        resolve_local(
          tz.from_local_datetime(
            &local_naive
          ),
          context
        )
      }
    }
  }

  pub fn format(
    &self,
    dt: DateTime<Utc>,
    pattern: &str
  ) -> String {
    match self {
      | Self::Local => dt
        .with_timezone(&Local)
        .format(pattern)
        .to_string(),
      | Self::Named(tz) => dt
        .with_timezone(tz)
        .format(pattern)
        .to_string()
    }
  }
}

impl fmt::Display for Zone {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Local => f.write_str("local"),
      | Self::Named(tz) => {
        f.write_str(tz.name())
      }
    }
  }
}

fn resolve_local<T: TimeZone>(
  result: LocalResult<DateTime<T>>,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  match result {
    | LocalResult::Single(local_dt) => {
      Ok(local_dt.with_timezone(&Utc))
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      let first = first.with_timezone(&Utc);
      let second =
        second.with_timezone(&Utc);
      tracing::warn!(
        context,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      Ok(first.min(second))
    }
    | LocalResult::None => {
      Err(anyhow!(
        "local datetime does not \
         exist in configured \
         timezone: {context}"
      ))
    }
  }
}

static DISPLAY_ZONE: OnceLock<Zone> =
  OnceLock::new();

/// Zone used when decoding stored
/// naive due dates. Resolved once:
/// an installed zone wins, then
/// `DOCKET_TIMEZONE`, then the system
/// local zone.
pub fn display_zone() -> &'static Zone {
  DISPLAY_ZONE.get_or_init(|| {
    std::env::var(TIMEZONE_ENV_VAR)
      .ok()
      .and_then(|raw| Zone::parse(&raw))
      .unwrap_or(Zone::Local)
  })
}

/// Installs the configured zone. Only
/// the first call has an effect;
/// returns false when a zone was
/// already resolved.
pub fn install_display_zone(
  zone: Zone
) -> bool {
  let installed =
    DISPLAY_ZONE.set(zone).is_ok();
  if !installed {
    tracing::debug!(
      requested = %zone,
      active = %display_zone(),
      "display zone already resolved"
    );
  }
  installed
}

#[tracing::instrument(skip(zone), fields(input = input))]
pub fn parse_due_in(
  input: &str,
  zone: &Zone
) -> anyhow::Result<DateTime<Utc>> {
  let token = input.trim();
  if token.is_empty() {
    return Err(anyhow!(
      "due date is empty"
    ));
  }

  if let Ok(parsed) =
    DateTime::parse_from_rfc3339(token)
  {
    return Ok(parsed.with_timezone(&Utc));
  }

  for pattern in NAIVE_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        token, pattern
      )
    {
      return zone.to_utc(naive, token);
    }
  }

  let date = NaiveDate::parse_from_str(
    token, "%Y-%m-%d"
  )
  .with_context(|| {
    format!(
      "unrecognized due date: {token}"
    )
  })?;
  let midnight = date
    .and_hms_opt(0, 0, 0)
    .ok_or_else(|| {
      anyhow!(
        "failed to construct \
         midnight for {token}"
      )
    })?;
  zone.to_utc(midnight, token)
}

pub fn parse_due(
  input: &str
) -> anyhow::Result<DateTime<Utc>> {
  parse_due_in(input, display_zone())
}

#[must_use]
pub fn format_due(
  dt: DateTime<Utc>,
  zone: &Zone
) -> String {
  zone.format(dt, DUE_DISPLAY_FORMAT)
}

/// Truncates to the millisecond
/// precision timestamps are stored
/// with, so in-memory and reloaded
/// records compare equal.
#[must_use]
pub fn stamp(
  now: DateTime<Utc>
) -> DateTime<Utc> {
  now.trunc_subsecs(3)
}

#[must_use]
pub fn to_timestamp(
  dt: DateTime<Utc>
) -> String {
  dt.to_rfc3339_opts(
    SecondsFormat::Secs,
    true
  )
}

/// Parses any accepted due-date input
/// and renders it canonically.
pub fn normalize_timestamp(
  input: &str
) -> Option<String> {
  parse_due(input).ok().map(to_timestamp)
}

/// Lenient codec for `dueDate`: empty
/// and unparseable values load as
/// absent.
pub mod due_serde {
  use chrono::{
    DateTime,
    Utc
  };
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  pub fn serialize<S>(
    dt: &Option<DateTime<Utc>>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    match dt {
      | Some(value) => serializer
        .serialize_str(
          &super::to_timestamp(*value)
        ),
      | None => serializer.serialize_none()
    }
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<Option<DateTime<Utc>>, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw =
      Option::<String>::deserialize(
        deserializer
      )?;
    let Some(raw) = raw else {
      return Ok(None);
    };
    if raw.trim().is_empty() {
      return Ok(None);
    }

    match super::parse_due(&raw) {
      | Ok(parsed) => Ok(Some(parsed)),
      | Err(error) => {
        tracing::warn!(
          value = %raw,
          error = %error,
          "dropping unparseable due date"
        );
        Ok(None)
      }
    }
  }
}

/// Codec for `createdDate` /
/// `updatedDate`. Legacy files may
/// hold `null`; those load as the Unix
/// epoch.
pub mod stamp_serde {
  use chrono::{
    DateTime,
    Utc
  };
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  pub fn serialize<S>(
    dt: &DateTime<Utc>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.serialize_str(
      &dt.to_rfc3339_opts(
        chrono::SecondsFormat::Millis,
        true
      )
    )
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw =
      Option::<String>::deserialize(
        deserializer
      )?;
    match raw.as_deref().map(str::trim) {
      | None | Some("") => {
        Ok(DateTime::<Utc>::UNIX_EPOCH)
      }
      | Some(value) => {
        DateTime::parse_from_rfc3339(value)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(serde::de::Error::custom)
      }
    }
  }

  pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::{
    Zone,
    format_due,
    parse_due_in
  };

  fn berlin() -> Zone {
    Zone::parse("Europe/Berlin")
      .expect("valid zone")
  }

  #[test]
  fn parses_rfc3339_regardless_of_zone() {
    let parsed = parse_due_in(
      "2026-10-19T07:00:00Z",
      &berlin()
    )
    .expect("parse rfc3339");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 10, 19, 7, 0, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn parses_datetime_local_input_in_zone() {
    let parsed = parse_due_in(
      "2026-10-19T09:00",
      &berlin()
    )
    .expect("parse datetime-local");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 10, 19, 7, 0, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn parses_bare_date_as_local_midnight() {
    let parsed = parse_due_in(
      "2026-01-05",
      &Zone::Named(chrono_tz::UTC)
    )
    .expect("parse date");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 1, 5, 0, 0, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn rejects_empty_and_garbage() {
    assert!(
      parse_due_in("  ", &berlin())
        .is_err()
    );
    assert!(
      parse_due_in(
        "next tuesday-ish",
        &berlin()
      )
      .is_err()
    );
  }

  #[test]
  fn skipped_spring_forward_time_is_an_error() {
    assert!(
      parse_due_in(
        "2026-03-29T02:30",
        &berlin()
      )
      .is_err()
    );
  }

  #[test]
  fn formats_due_like_the_list_view() {
    let dt = Utc
      .with_ymd_and_hms(
        2026, 10, 19, 7, 0, 0
      )
      .single()
      .expect("valid instant");
    assert_eq!(
      format_due(dt, &berlin()),
      "October 19, 2026 at 9:00 AM"
    );
  }

  #[test]
  fn zone_parse_accepts_local_keyword() {
    assert_eq!(
      Zone::parse("LOCAL"),
      Some(Zone::Local)
    );
    assert_eq!(
      Zone::parse("Not/AZone"),
      None
    );
  }
}
