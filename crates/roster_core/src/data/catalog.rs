//! Member catalog: CSV parsing and binary cache decoding.
//!
//! CSV layout (header row required, columns matched by name, any order):
//! - `name`: unique member name
//! - `hp`, `attack`, `defense`, `special-attack`, `special-defense`, `speed`
//! - `weaknesses`: comma-delimited labels (list literals are tolerated)
//! - `types` (optional): passed through untouched
//! - `total_stat` (optional): kept when present, otherwise the stat sum
//!
//! Binary cache: MessagePack of [`Catalog`], optionally LZ4 (size-prepended).

use lz4_flex::decompress_size_prepended;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, RosterError};
use crate::models::{normalize_name, parse_weaknesses, BaseStats, Member, Role, StatKind};

/// Schema version written into freshly parsed catalogs.
pub const CATALOG_SCHEMA_VERSION: &str = "v1";

pub const NAME_COLUMN: &str = "name";
pub const WEAKNESS_COLUMN: &str = "weaknesses";
pub const TYPES_COLUMN: &str = "types";
pub const TOTAL_COLUMN: &str = "total_stat";

/// Immutable member table with case-insensitive name lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub schema_version: String,
    members: Vec<Member>,
    #[serde(skip)]
    by_name: FxHashMap<String, usize>,
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub duplicates: u32,
    pub computed_totals: u32,
}

impl Catalog {
    /// Build a catalog from members. Names are the identity key: the first
    /// occurrence of a name (case-insensitive) wins.
    pub fn from_members(schema_version: impl Into<String>, members: Vec<Member>) -> Self {
        let mut kept = Vec::with_capacity(members.len());
        let mut by_name = FxHashMap::default();

        for member in members {
            let key = normalize_name(&member.name);
            if by_name.contains_key(&key) {
                warn!("Duplicate member name '{}' skipped", member.name);
                continue;
            }
            by_name.insert(key, kept.len());
            kept.push(member);
        }

        Self { schema_version: schema_version.into(), members: kept, by_name }
    }

    /// Parse a CSV file.
    pub fn from_csv_path(path: &Path) -> Result<(Self, ParseStats)> {
        let file = std::fs::File::open(path).map_err(|e| {
            RosterError::data_unavailable(format!(
                "Failed to open catalog CSV '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// Parse CSV from any reader.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<(Self, ParseStats)> {
        let mut reader =
            csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

        let headers = reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut stats = ParseStats::default();
        let mut members = Vec::new();

        for result in reader.records() {
            stats.total_rows += 1;
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(u64::from(stats.total_rows));

            let (member, computed_total) = columns.parse_member(&record, line)?;
            if computed_total {
                stats.computed_totals += 1;
            }
            members.push(member);
            stats.parsed += 1;
        }

        let catalog = Self::from_members(CATALOG_SCHEMA_VERSION, members);
        stats.duplicates = stats.parsed - catalog.len() as u32;

        debug!(
            "Parsed catalog CSV: {} rows, {} members, {} duplicates",
            stats.total_rows,
            catalog.len(),
            stats.duplicates
        );

        Ok((catalog, stats))
    }

    /// Decode a binary cache.
    ///
    /// Accepts plain MessagePack or size-prepended LZ4 around it. Roles are
    /// recomputed from stats, so a cache never overrides the classifier.
    pub fn from_cache_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = match rmp_serde::from_slice::<Catalog>(bytes) {
            Ok(catalog) => catalog,
            Err(_) => {
                let msgpack = decompress_size_prepended(bytes).map_err(|e| {
                    RosterError::data_unavailable(format!("LZ4 decompress failed: {e}"))
                })?;
                rmp_serde::from_slice::<Catalog>(&msgpack).map_err(|e| {
                    RosterError::data_unavailable(format!("MessagePack deserialize failed: {e}"))
                })?
            }
        };

        let members = decoded.members.into_iter().map(Member::reclassified).collect();
        Ok(Self::from_members(decoded.schema_version, members))
    }

    /// Read and decode a binary cache file.
    pub fn from_cache_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RosterError::data_unavailable(format!(
                "Failed to read catalog cache '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_cache_bytes(&bytes)
    }

    /// Encode as MessagePack (uncompressed).
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| {
            RosterError::data_unavailable(format!("Failed to serialize catalog: {e}"))
        })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.by_name.get(&normalize_name(name)).map(|&idx| &self.members[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of members per role. Every role is present, possibly with 0.
    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts: BTreeMap<Role, usize> = Role::ALL.iter().map(|&r| (r, 0)).collect();
        for member in &self.members {
            *counts.entry(member.role).or_insert(0) += 1;
        }
        counts
    }
}

/// Header positions of the columns we read.
struct ColumnMap {
    name: usize,
    stats: [(StatKind, usize); 6],
    weaknesses: usize,
    types: Option<usize>,
    total: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers.iter().position(|h| {
                h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted)
            })
        };
        let require = |wanted: &str| {
            find(wanted).ok_or_else(|| {
                RosterError::data_unavailable(format!("Missing required column '{wanted}'"))
            })
        };

        let mut stats = [(StatKind::Hp, 0usize); 6];
        for (slot, kind) in stats.iter_mut().zip(StatKind::ALL) {
            *slot = (kind, require(kind.column())?);
        }

        Ok(Self {
            name: require(NAME_COLUMN)?,
            stats,
            weaknesses: require(WEAKNESS_COLUMN)?,
            types: find(TYPES_COLUMN),
            total: find(TOTAL_COLUMN),
        })
    }

    /// Returns the member and whether its total had to be computed.
    fn parse_member(&self, record: &csv::StringRecord, line: u64) -> Result<(Member, bool)> {
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

        let name = cell(self.name).to_string();
        if name.is_empty() {
            return Err(RosterError::data_unavailable(format!("Line {line}: empty name")));
        }

        let mut stats = BaseStats::default();
        for &(kind, idx) in &self.stats {
            stats.set(kind, parse_stat(cell(idx), kind.column(), line)?);
        }

        let weaknesses = parse_weaknesses(cell(self.weaknesses));
        let mut member = Member::new(name, stats, weaknesses);

        if let Some(idx) = self.types {
            member = member.with_types(cell(idx));
        }

        let supplied_total = match self.total.map(cell) {
            Some(raw) if !raw.is_empty() => Some(parse_total(raw, line)?),
            _ => None,
        };

        Ok(match supplied_total {
            Some(total) => (member.with_total_stat(total), false),
            None => (member, true),
        })
    }
}

/// Parse one stat cell. Integral floats (`"45.0"`) are accepted since
/// dataframe exports sometimes write them.
fn parse_stat(raw: &str, column: &str, line: u64) -> Result<u16> {
    if raw.is_empty() {
        return Err(RosterError::data_unavailable(format!("Line {line}: missing {column} value")));
    }
    if let Ok(v) = raw.parse::<u16>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v < 0.0 => Err(RosterError::data_unavailable(format!(
            "Line {line}: negative {column} value '{raw}'"
        ))),
        Ok(v) if v.fract() == 0.0 && v <= f64::from(u16::MAX) => Ok(v as u16),
        _ => Err(RosterError::data_unavailable(format!(
            "Line {line}: invalid {column} value '{raw}'"
        ))),
    }
}

fn parse_total(raw: &str, line: u64) -> Result<u32> {
    match raw.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(RosterError::data_unavailable(format!(
            "Line {line}: invalid {TOTAL_COLUMN} value '{raw}'"
        ))),
    }
}
