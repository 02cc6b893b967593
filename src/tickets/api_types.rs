//! Serde-deserializable types matching the backend's ticket responses.
//!
//! These types are separate from domain types so that missing or loosely
//! typed fields can be tolerated during deserialization while the domain
//! types stay strict.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::types::{RouteStop, Station, Ticket, Train};

/// Accepts a JSON number or a numeric string.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    Some(Value::Number(n)) => n.as_f64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  })
}

/// Accepts a JSON integer or a numeric string.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    Some(Value::Number(n)) => n.as_u64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  })
}

// ============================================================================
// Nested records
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiStation {
  #[serde(default, deserialize_with = "lenient_u64")]
  pub id: Option<u64>,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiRouteStop {
  #[serde(default, deserialize_with = "lenient_u64")]
  pub id: Option<u64>,
  #[serde(default)]
  pub station_name: String,
  #[serde(default, deserialize_with = "lenient_f64")]
  pub latitude: Option<f64>,
  #[serde(default, deserialize_with = "lenient_f64")]
  pub longitude: Option<f64>,
  pub departure_time: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiTrain {
  #[serde(default, deserialize_with = "lenient_u64")]
  pub id: Option<u64>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub routes: Vec<ApiRouteStop>,
}

// ============================================================================
// Ticket record - one entry of GET /tickets
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTicket {
  #[serde(deserialize_with = "lenient_u64")]
  pub id: Option<u64>,
  #[serde(default)]
  pub train: ApiTrain,
  #[serde(default)]
  pub start_station: ApiStation,
  #[serde(default)]
  pub end_station: ApiStation,
  pub created_at: Option<String>,
  pub departure_time_at: Option<String>,
  pub arrival_time_at: Option<String>,
}

impl ApiTicket {
  /// Convert to the domain type. Records without an id are unusable.
  pub fn into_ticket(self) -> Option<Ticket> {
    let id = self.id?;
    Some(Ticket {
      id,
      train: Train {
        id: self.train.id,
        name: self.train.name,
        routes: self
          .train
          .routes
          .into_iter()
          .map(|stop| RouteStop {
            id: stop.id,
            station_name: stop.station_name,
            latitude: stop.latitude,
            longitude: stop.longitude,
            departure_time: stop.departure_time,
          })
          .collect(),
      },
      start_station: self.start_station.into(),
      end_station: self.end_station.into(),
      purchased_at: self.created_at,
      departure_time_at: self.departure_time_at,
      arrival_time_at: self.arrival_time_at,
    })
  }
}

impl From<ApiStation> for Station {
  fn from(station: ApiStation) -> Self {
    Station {
      id: station.id,
      name: station.name,
    }
  }
}

/// Parse the body of `GET /tickets`.
///
/// An unexpected shape yields an empty list and individual malformed records
/// are skipped; neither is an error.
pub fn parse_tickets_body(body: &[u8]) -> Vec<Ticket> {
  let value: Value = match serde_json::from_slice(body) {
    Ok(v) => v,
    Err(e) => {
      warn!("Ticket response is not JSON, treating as empty: {}", e);
      return Vec::new();
    }
  };

  let records = match value.get("tickets") {
    Some(Value::Array(records)) => records,
    _ => {
      warn!("Ticket response has no tickets array, treating as empty");
      return Vec::new();
    }
  };

  records
    .iter()
    .filter_map(|record| match ApiTicket::deserialize(record) {
      Ok(ticket) => {
        let converted = ticket.into_ticket();
        if converted.is_none() {
          warn!("Skipping ticket record without id");
        }
        converted
      }
      Err(e) => {
        warn!("Skipping malformed ticket record: {}", e);
        None
      }
    })
    .collect()
}
