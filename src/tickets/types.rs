use serde::{Deserialize, Serialize};

/// A purchased ticket as shown in the ticket list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
  pub id: u64,
  pub train: Train,
  pub start_station: Station,
  pub end_station: Station,
  pub purchased_at: Option<String>,
  pub departure_time_at: Option<String>,
  pub arrival_time_at: Option<String>,
}

impl Ticket {
  /// Payload encoded into the ticket's QR code
  pub fn qr_payload(&self) -> String {
    format!("ticket-{}", self.id)
  }
}

/// Train serving a ticket, with its stops in travel order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
  pub id: Option<u64>,
  pub name: String,
  pub routes: Vec<RouteStop>,
}

/// One stop on a train's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
  pub id: Option<u64>,
  pub station_name: String,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub departure_time: Option<String>,
}

/// Station reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
  pub id: Option<u64>,
  pub name: String,
}
