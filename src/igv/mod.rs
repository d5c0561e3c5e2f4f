//! Genome-viewer integration: track descriptors, credential fetching, and
//! the two viewer backends.
//!
//! Both backends consume the same reshaped track table and selection; they
//! differ only in where the viewer runs. [`IgvJs`] produces an
//! [`IgvSession`] configuration for an embedded igv.js widget, and
//! [`IgvDesktop`] drives a locally running desktop IGV over its
//! batch-command port.

pub mod auth;
pub mod remote;
pub mod track;

use std::time::Duration;

use log::info;

use crate::error::ReviewError;
use crate::frame::Frame;
use crate::locus::LocusKey;
use crate::review::ReviewData;
use crate::tracks::{clamp_selection, BAM_COLUMN};

pub use auth::{CommandTokenProvider, StaticTokenProvider, TokenPolicy, TokenProvider};
pub use remote::{IgvClient, ViewMode, DEFAULT_IGV_ADDR};
pub use track::{build_tracks, loci_strings, IgvSession, Track, TrackSettings};

/// A viewer that can show the currently selected tracks at a locus.
///
/// Implementations share the reshaping path: they receive the already-built
/// track table plus the raw selection, and apply the selection clamp
/// themselves.
pub trait ViewerBackend {
    type Output;

    fn show(
        &mut self,
        data: &ReviewData,
        key: &LocusKey,
        table: &Frame,
        selection: &[usize],
    ) -> Result<Self::Output, ReviewError>;
}

/// The render-only backend: assembles an [`IgvSession`] for an embedded
/// igv.js widget. Nothing is contacted except the token provider.
pub struct IgvJs {
    settings: TrackSettings,
    token_provider: Box<dyn TokenProvider>,
}

impl IgvJs {
    pub fn new(settings: TrackSettings, token_provider: Box<dyn TokenProvider>) -> Self {
        Self {
            settings,
            token_provider,
        }
    }
}

impl ViewerBackend for IgvJs {
    type Output = IgvSession;

    fn show(
        &mut self,
        data: &ReviewData,
        key: &LocusKey,
        table: &Frame,
        selection: &[usize],
    ) -> Result<IgvSession, ReviewError> {
        let tracks = build_tracks(
            data,
            table,
            selection,
            &self.settings,
            self.token_provider.as_ref(),
        )?;
        Ok(IgvSession {
            genome: self.settings.genome.clone(),
            minimum_bases: self.settings.minimum_bases,
            locus: loci_strings(data, key),
            tracks,
        })
    }
}

/// The stateful backend: a batch-command session against desktop IGV.
/// Each `show` starts a fresh viewer session, applies the view options,
/// navigates to the group's loci, and loads the selected files.
pub struct IgvDesktop {
    client: IgvClient,
    view: ViewMode,
    sort: String,
}

impl IgvDesktop {
    pub fn new(addr: impl Into<String>, recv_timeout: Duration, view: ViewMode) -> Self {
        Self {
            client: IgvClient::new(addr, recv_timeout),
            view,
            sort: "base".to_string(),
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }
}

impl ViewerBackend for IgvDesktop {
    type Output = usize;

    /// Returns the number of files loaded. When nothing is selected the
    /// viewer is left untouched and zero is returned.
    fn show(
        &mut self,
        data: &ReviewData,
        key: &LocusKey,
        table: &Frame,
        selection: &[usize],
    ) -> Result<usize, ReviewError> {
        table.require_columns("tracks", &[BAM_COLUMN.to_string()])?;
        let selected = clamp_selection(selection, table.len());
        let bams: Vec<String> = selected
            .iter()
            .map(|&row| table.get(row, BAM_COLUMN).unwrap().to_string())
            .collect();
        if bams.is_empty() {
            info!("no bams selected");
            return Ok(0);
        }

        self.client.connect()?;
        self.client.new_session()?;
        self.client.set_view_options(self.view, &self.sort)?;
        let loci = loci_strings(data, key);
        if !loci.is_empty() {
            self.client.goto(&loci)?;
        }
        for bam in &bams {
            self.client.load(bam)?;
        }
        self.client.close();
        Ok(bams.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::test_review_data;
    use crate::tracks::{initial_selection, track_table};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn test_igv_js_session_for_locus() {
        let data = test_review_data();
        let key = "17:7571820:P1".into();
        let table = track_table(&data, &key, &[]).unwrap();
        let selection = initial_selection(3, table.len());

        let mut backend = IgvJs::new(
            TrackSettings::default(),
            Box::new(StaticTokenProvider::new("tok")),
        );
        let session = backend.show(&data, &key, &table, &selection).unwrap();
        assert_eq!(session.genome, "hg19");
        assert_eq!(session.locus, vec!["17:7571820".to_string()]);
        assert_eq!(session.tracks.len(), 2);
    }

    #[test]
    fn test_desktop_loads_selected_bams() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                sender.send(line.trim().to_string()).unwrap();
                writeln!(stream, "OK").unwrap();
            }
        });

        let data = test_review_data();
        let key = "17:7571820:P1".into();
        let table = track_table(&data, &key, &[]).unwrap();

        let mut backend =
            IgvDesktop::new(addr, Duration::from_secs(5), ViewMode::Collapse);
        let loaded = backend.show(&data, &key, &table, &[0]).unwrap();
        assert_eq!(loaded, 1);

        let commands: Vec<String> = receiver.iter().collect();
        assert_eq!(
            commands,
            vec![
                "new",
                "collapse",
                "sort base",
                "goto 17:7571820",
                "load gs://bams/p1_tumor.bam"
            ]
        );
    }

    #[test]
    fn test_desktop_skips_when_nothing_selected() {
        let data = test_review_data();
        let key = "X:1:none".into();
        let table = track_table(&data, &key, &[]).unwrap();

        // unreachable address: show must return before connecting
        let mut backend = IgvDesktop::new(
            "127.0.0.1:1".to_string(),
            Duration::from_secs(1),
            ViewMode::Collapse,
        );
        let loaded = backend.show(&data, &key, &table, &[0, 1]).unwrap();
        assert_eq!(loaded, 0);
    }
}
