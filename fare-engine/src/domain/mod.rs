//! Domain types for the fare engine.
//!
//! Every type here validates its input at construction time, so the
//! gazetteer, rule table and resolver can trust the codes they are handed.

mod airport;
mod place;
mod service;
mod time;
mod zone;

pub use airport::{AirportCode, InvalidAirportCode};
pub use place::{Anchor, InvalidPlaceKind, Place, PlaceKind};
pub use service::Service;
pub use time::{ClockWindow, PickupTime, TimeError, parse_hhmm};
pub use zone::{InvalidZone, Zone};
