//! Viewer track descriptors and the igv.js session configuration.
//!
//! A [`Track`] is the igv.js alignment-track configuration object for one
//! reshaped track row: display name, file and index locations, fixed
//! display styling, and a bearer token for remote files. The serialized
//! field names follow igv.js, so an [`IgvSession`] can be handed to the
//! embedding layer as opaque JSON.

use lazy_static::lazy_static;
use serde::Serialize;

use crate::error::ReviewError;
use crate::frame::Frame;
use crate::igv::auth::TokenProvider;
use crate::locus::LocusKey;
use crate::review::ReviewData;
use crate::tracks::{clamp_selection, BAI_COLUMN, BAM_COLUMN};

lazy_static! {
    /// The stock track styling used for review sessions.
    pub static ref DEFAULT_TRACK_SETTINGS: TrackSettings = TrackSettings {
        genome: "hg19".to_string(),
        track_height: 400,
        minimum_bases: 200,
        display_mode: "COLLAPSED".to_string(),
        show_coverage: true,
        color: "rgb(170, 170, 170)".to_string(),
    };
}

/// Session-level viewer configuration: the genome build, the fixed track
/// styling, and the zoom floor.
#[derive(Clone, Debug)]
pub struct TrackSettings {
    pub genome: String,
    pub track_height: u32,
    pub minimum_bases: u32,
    pub display_mode: String,
    pub show_coverage: bool,
    pub color: String,
}

impl Default for TrackSettings {
    fn default() -> Self {
        DEFAULT_TRACK_SETTINGS.clone()
    }
}

/// One igv.js alignment-track configuration object.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    pub url: String,
    #[serde(rename = "indexURL")]
    pub index_url: String,
    pub display_mode: String,
    pub oauth_token: String,
    pub show_coverage: bool,
    pub height: u32,
    pub color: String,
}

/// The full igv.js session configuration: genome, loci to center on, and
/// the selected tracks.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgvSession {
    pub genome: String,
    pub minimum_bases: u32,
    pub locus: Vec<String>,
    pub tracks: Vec<Track>,
}

impl IgvSession {
    pub fn to_json(&self) -> Result<String, ReviewError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build one [`Track`] per selected row of a reshaped track table.
///
/// The selection is clamped to the table bounds first; stale indices from
/// a previous locus are dropped. The token is fetched once per build and
/// shared across the descriptors. An empty post-clamp selection produces
/// an empty list without invoking the provider.
pub fn build_tracks(
    data: &ReviewData,
    table: &Frame,
    selection: &[usize],
    settings: &TrackSettings,
    token_provider: &dyn TokenProvider,
) -> Result<Vec<Track>, ReviewError> {
    let selected = clamp_selection(selection, table.len());
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let name_column = data.bam_columns().bam_ref.clone();
    table.require_columns(
        "tracks",
        &[name_column.clone(), BAM_COLUMN.to_string(), BAI_COLUMN.to_string()],
    )?;

    let oauth_token = token_provider.fetch_token()?;
    let tracks = selected
        .iter()
        .map(|&row| Track {
            name: table.get(row, &name_column).unwrap().to_string(),
            url: table.get(row, BAM_COLUMN).unwrap().to_string(),
            index_url: table.get(row, BAI_COLUMN).unwrap().to_string(),
            display_mode: settings.display_mode.clone(),
            oauth_token: oauth_token.clone(),
            show_coverage: settings.show_coverage,
            height: settings.track_height,
            color: settings.color.clone(),
        })
        .collect();
    Ok(tracks)
}

/// The genomic locus string(s) to center the view on: one `chrom:pos` per
/// configured chromosome/position column pair, taken from the first
/// mutation row matching `key`. Empty when no row matches.
pub fn loci_strings(data: &ReviewData, key: &LocusKey) -> Vec<String> {
    let matched = data.mutations_at(key);
    if matched.is_empty() {
        return Vec::new();
    }
    let columns = data.mutation_columns();
    columns
        .chrom
        .iter()
        .zip(columns.pos.iter())
        .map(|(chrom, pos)| {
            // chrom/pos columns were validated at construction
            format!(
                "{}:{}",
                matched.get(0, chrom).unwrap(),
                matched.get(0, pos).unwrap()
            )
        })
        .collect()
}
