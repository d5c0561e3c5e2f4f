//! End-to-end review workflow over files: load the two tables from TSV,
//! derive the locus index, rebuild the track table for a chosen locus,
//! and assemble the igv.js session for the initial selection.

use mutrev::igv::{IgvJs, StaticTokenProvider, TrackSettings, ViewerBackend};
use mutrev::prelude::*;
use mutrev::tracks::initial_selection;

const MUTATIONS_TSV: &str = "\
chrom\tpos\tsample\tpatient\tref\talt
17\t7571820\tP1-T1\tP1\tC\tT
17\t7571820\tP1-T2\tP1\tC\tT
2\t29443600\tP1-T1\tP1\tG\tA
17\t7571820\tP2-T1\tP2\tC\tG
";

const BAMS_TSV: &str = "\
patient\tbam_tumor\tbai_tumor\tbam_normal\tbai_normal
P1\tgs://bams/p1_tumor.bam\tgs://bams/p1_tumor.bai\tgs://bams/p1_normal.bam\tgs://bams/p1_normal.bai
P2\tgs://bams/p2_tumor.bam\tgs://bams/p2_tumor.bai\tgs://bams/p2_normal.bam\tgs://bams/p2_normal.bai
";

fn load_review_data(dir: &std::path::Path) -> ReviewData {
    let mutations_path = dir.join("mutations.tsv");
    let bams_path = dir.join("bams.tsv");
    std::fs::write(&mutations_path, MUTATIONS_TSV).unwrap();
    std::fs::write(&bams_path, BAMS_TSV).unwrap();

    let mutations = Frame::from_path(&mutations_path, b'\t').unwrap();
    let bams = Frame::from_path(&bams_path, b'\t').unwrap();
    ReviewData::new(
        mutations,
        MutationColumns {
            group_by: vec![
                "chrom".to_string(),
                "pos".to_string(),
                "patient".to_string(),
            ],
            bam_ref: "patient".to_string(),
            chrom: vec!["chrom".to_string()],
            pos: vec!["pos".to_string()],
        },
        bams,
        BamColumns {
            bam_ref: "patient".to_string(),
            bam: vec!["bam_tumor".to_string(), "bam_normal".to_string()],
            bai: vec!["bai_tumor".to_string(), "bai_normal".to_string()],
        },
    )
    .unwrap()
}

#[test]
fn test_locus_index_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let data = load_review_data(dir.path());

    let index = data.locus_index();
    let keys: Vec<&str> = index.iter().map(|key| key.as_str()).collect();
    assert_eq!(keys, vec!["17:7571820:P1", "2:29443600:P1", "17:7571820:P2"]);
}

#[test]
fn test_track_table_and_session_for_locus() {
    let dir = tempfile::tempdir().unwrap();
    let data = load_review_data(dir.path());
    let key = LocusKey::from("17:7571820:P1");

    let table = track_table(&data, &key, &[]).unwrap();
    // one matching BAM reference (P1) times two bam/bai pairs
    assert_eq!(table.len(), 2);

    let selection = initial_selection(3, table.len());
    assert_eq!(selection, vec![0, 1]);

    let mut backend = IgvJs::new(
        TrackSettings::default(),
        Box::new(StaticTokenProvider::new("tok")),
    );
    let session = backend.show(&data, &key, &table, &selection).unwrap();
    assert_eq!(session.locus, vec!["17:7571820".to_string()]);
    assert_eq!(session.tracks.len(), 2);
    assert_eq!(session.tracks[0].url, "gs://bams/p1_tumor.bam");
    assert_eq!(session.tracks[0].index_url, "gs://bams/p1_tumor.bai");
    assert_eq!(session.tracks[1].url, "gs://bams/p1_normal.bam");

    let json: serde_json::Value =
        serde_json::from_str(&session.to_json().unwrap()).unwrap();
    assert_eq!(json["genome"], "hg19");
    assert_eq!(json["tracks"][0]["indexURL"], "gs://bams/p1_tumor.bai");
}

#[test]
fn test_selection_survives_locus_change_by_clamping() {
    let dir = tempfile::tempdir().unwrap();
    let data = load_review_data(dir.path());

    // this locus resolves one reference (P1) over two bam/bai pairs
    let wide_key = LocusKey::from("17:7571820:P1");
    let wide_table = track_table(&data, &wide_key, &[]).unwrap();
    let retained = vec![0, 1];
    assert_eq!(clamp_selection(&retained, wide_table.len()), vec![0, 1]);

    // moving to a locus with no matching tracks drops the whole selection
    let empty_key = LocusKey::from("9:1000:P9");
    let empty_table = track_table(&data, &empty_key, &[]).unwrap();
    assert!(empty_table.is_empty());
    assert!(clamp_selection(&retained, empty_table.len()).is_empty());
}
