//! Location gazetteer.
//!
//! Maps `(kind, identifier)` pairs from the booking flow to catalog places
//! and, through them, to the zone or airport code that prices the trip.
//! The catalog is loaded once and never changes afterwards.

mod names;

pub use names::normalize;

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{AirportCode, Anchor, Place, PlaceKind, Zone};
use crate::error::CatalogError;

/// The place catalog shipped with the crate.
const BUILTIN_PLACES: &str = include_str!("../../data/places.csv");

/// Zone assumed for restaurants missing from the catalog.
pub const DEFAULT_RESTAURANT_ZONE: Zone = Zone::B;

/// Lookup tables for one place kind. Values index into `Gazetteer::places`.
#[derive(Debug, Clone, Default)]
struct KindIndex {
    ids: HashMap<String, usize>,
    slugs: HashMap<String, usize>,
    names: HashMap<String, usize>,
}

/// Immutable catalog of named places.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<Place>,
    index: HashMap<PlaceKind, KindIndex>,
    restaurant_default: Zone,
}

impl Gazetteer {
    /// Build a gazetteer from already-parsed places.
    ///
    /// Fails if the list is empty, an id repeats within its kind, an alias
    /// is already taken by another place of the same kind, or a place has no
    /// anchor or an anchor that does not suit its kind.
    pub fn new(places: Vec<Place>) -> Result<Self, CatalogError> {
        if places.is_empty() {
            return Err(CatalogError::Empty("places"));
        }

        let mut index: HashMap<PlaceKind, KindIndex> = HashMap::new();
        for (i, place) in places.iter().enumerate() {
            check_anchor(place)?;

            let entry = index.entry(place.kind).or_default();
            if entry.ids.insert(place.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicatePlace {
                    kind: place.kind.to_string(),
                    id: place.id.clone(),
                });
            }
            entry.slugs.entry(normalize(&place.id)).or_insert(i);
            for alias in &place.aliases {
                let key = normalize(alias);
                if key.is_empty() {
                    continue;
                }
                if *entry.slugs.entry(key).or_insert(i) != i {
                    return Err(CatalogError::DuplicatePlace {
                        kind: place.kind.to_string(),
                        id: alias.clone(),
                    });
                }
            }
            // Names are not unique; the first place wins.
            entry.names.entry(normalize(&place.name)).or_insert(i);
        }

        Ok(Self {
            places,
            index,
            restaurant_default: DEFAULT_RESTAURANT_ZONE,
        })
    }

    /// Load the catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_reader(BUILTIN_PLACES.as_bytes())
    }

    /// Load a catalog CSV file with columns `kind,id,name,zone,airport_code`
    /// and an optional `aliases` column of `|`-separated alternative ids.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load a catalog from CSV data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut places = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let row: PlaceRecord = record.deserialize(Some(&headers))?;
            places.push(row.into_place(line)?);
        }

        let gazetteer = Self::new(places)?;
        info!(places = gazetteer.len(), "loaded place catalog");
        Ok(gazetteer)
    }

    /// Write the catalog as CSV in catalog order.
    ///
    /// The output loads back into an identical gazetteer, and writing the
    /// same catalog twice gives the same bytes.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for place in &self.places {
            wtr.serialize(PlaceRecord::from_place(place))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Override the zone assumed for unknown restaurants.
    pub fn with_restaurant_default(mut self, zone: Zone) -> Self {
        self.restaurant_default = zone;
        self
    }

    pub fn restaurant_default(&self) -> Zone {
        self.restaurant_default
    }

    /// Resolve an identifier to a place.
    ///
    /// Tries the exact id, then the normalized identifier against normalized
    /// ids and aliases, then against normalized display names. Unknown
    /// restaurants land in the default restaurant zone; anything else
    /// unknown comes back without an anchor.
    pub fn resolve(&self, kind: PlaceKind, identifier: &str) -> Place {
        if let Some(place) = self.lookup(kind, identifier) {
            return place.clone();
        }

        let mut place = Place::unresolved(kind, identifier.trim());
        if kind == PlaceKind::Restaurant {
            place.anchor = Some(Anchor::Zone(self.restaurant_default));
        }
        place
    }

    fn lookup(&self, kind: PlaceKind, identifier: &str) -> Option<&Place> {
        let index = self.index.get(&kind)?;
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        let found = index.ids.get(identifier).or_else(|| {
            let key = normalize(identifier);
            index.slugs.get(&key).or_else(|| index.names.get(&key))
        })?;
        self.places.get(*found)
    }

    /// Look up a place by its exact id.
    pub fn get(&self, kind: PlaceKind, id: &str) -> Option<&Place> {
        let i = self.index.get(&kind)?.ids.get(id)?;
        self.places.get(*i)
    }

    /// All places, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    /// Places of one kind, in catalog order.
    pub fn places(&self, kind: PlaceKind) -> impl Iterator<Item = &Place> {
        self.places.iter().filter(move |p| p.kind == kind)
    }

    /// Every anchor a resolution can produce, including the restaurant default.
    pub fn anchors(&self) -> BTreeSet<Anchor> {
        self.places
            .iter()
            .filter_map(|p| p.anchor)
            .chain(std::iter::once(Anchor::Zone(self.restaurant_default)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

fn check_anchor(place: &Place) -> Result<(), CatalogError> {
    let reason = match (place.kind, place.anchor) {
        (_, None) => "has neither zone nor airport code",
        (PlaceKind::Airport, Some(Anchor::Zone(_))) => "airport must carry an airport code",
        (PlaceKind::Airport, Some(Anchor::Airport(_))) => return Ok(()),
        (_, Some(Anchor::Airport(_))) => "only airports may carry an airport code",
        (_, Some(Anchor::Zone(_))) => return Ok(()),
    };
    Err(CatalogError::InvalidPlace {
        kind: place.kind.to_string(),
        id: place.id.clone(),
        reason,
    })
}

/// Separator between entries of the `aliases` column.
const ALIAS_SEPARATOR: char = '|';

/// One row of the places CSV.
#[derive(Debug, Serialize, Deserialize)]
struct PlaceRecord {
    kind: String,
    id: String,
    name: String,
    zone: Option<String>,
    airport_code: Option<String>,
    #[serde(default)]
    aliases: Option<String>,
}

impl PlaceRecord {
    fn from_place(place: &Place) -> Self {
        let aliases = place.aliases.join(&ALIAS_SEPARATOR.to_string());
        Self {
            kind: place.kind.to_string(),
            id: place.id.clone(),
            name: place.name.clone(),
            zone: place.zone().map(|z| z.to_string()),
            airport_code: place.airport_code().map(|c| c.to_string()),
            aliases: (!aliases.is_empty()).then_some(aliases),
        }
    }

    fn into_place(self, line: u64) -> Result<Place, CatalogError> {
        let kind = PlaceKind::parse(&self.kind)
            .map_err(|e| CatalogError::invalid_row(line, e.to_string()))?;

        if self.id.is_empty() {
            return Err(CatalogError::invalid_row(line, "id is empty"));
        }

        let zone = self.zone.filter(|z| !z.is_empty());
        let airport = self.airport_code.filter(|c| !c.is_empty());

        let anchor = match (zone, airport) {
            (Some(_), Some(_)) => {
                return Err(CatalogError::invalid_row(
                    line,
                    "zone and airport_code are both set",
                ));
            }
            (Some(z), None) => Some(Anchor::Zone(
                Zone::parse(&z).map_err(|e| CatalogError::invalid_row(line, e.to_string()))?,
            )),
            (None, Some(code)) => Some(Anchor::Airport(
                AirportCode::parse(&code.to_uppercase())
                    .map_err(|e| CatalogError::invalid_row(line, e.to_string()))?,
            )),
            (None, None) => None,
        };

        let name = if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name
        };

        let aliases = self
            .aliases
            .iter()
            .flat_map(|a| a.split(ALIAS_SEPARATOR))
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();

        Ok(Place {
            kind,
            id: self.id,
            name,
            anchor,
            aliases,
        })
    }
}
