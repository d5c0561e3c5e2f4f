use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use mutrev::{
    commands::{
        review_igv, review_loci, review_mutations, review_session, review_tracks, TableFormat,
    },
    igv::{
        CommandTokenProvider, StaticTokenProvider, TokenPolicy, TokenProvider, TrackSettings,
        ViewMode, DEFAULT_IGV_ADDR,
    },
    prelude::{BamColumns, LocusKey, MutationColumns, ReviewError},
};

const INFO: &str = "\
mutrev: mutation review tables and IGV sessions from the command line
usage: mutrev [--help] <subcommand>

Subcommands:

  loci: list the distinct locus keys of a mutations table.
  mutations: print the mutation rows belonging to one locus key.
  tracks: build the per-locus track table from the mutations and BAM tables.
  session: emit igv.js session JSON for a locus.
  igv: load a locus and its tracks into a locally running desktop IGV.

";

#[derive(Parser)]
#[clap(name = "mutrev")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// The two input tables and the column configuration tying them together.
#[derive(Args)]
struct DataArgs {
    /// a TSV file of candidate mutations (.gz allowed)
    #[arg(long, required = true)]
    mutations: PathBuf,

    /// a TSV file of BAM/BAI references (.gz allowed)
    #[arg(long, required = true)]
    bams: PathBuf,

    /// ordered mutation columns whose combined values define one reviewable unit
    #[arg(long, required = true, value_delimiter = ',')]
    group_by: Vec<String>,

    /// mutations column referencing rows of the BAM table
    #[arg(long, required = true)]
    mutation_ref: String,

    /// chromosome column(s) of the mutations table
    #[arg(long, required = true, value_delimiter = ',')]
    chrom: Vec<String>,

    /// position column(s), paired with --chrom
    #[arg(long, required = true, value_delimiter = ',')]
    pos: Vec<String>,

    /// BAM-table column joined against --mutation-ref values
    #[arg(long, required = true)]
    bam_ref: String,

    /// ordered BAM file path/URL columns
    #[arg(long, required = true, value_delimiter = ',')]
    bam_cols: Vec<String>,

    /// ordered BAI index path/URL columns, paired with --bam-cols
    #[arg(long, required = true, value_delimiter = ',')]
    bai_cols: Vec<String>,
}

impl DataArgs {
    fn mutation_columns(&self) -> MutationColumns {
        MutationColumns {
            group_by: self.group_by.clone(),
            bam_ref: self.mutation_ref.clone(),
            chrom: self.chrom.clone(),
            pos: self.pos.clone(),
        }
    }

    fn bam_columns(&self) -> BamColumns {
        BamColumns {
            bam_ref: self.bam_ref.clone(),
            bam: self.bam_cols.clone(),
            bai: self.bai_cols.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct locus keys of a mutations table.
    Loci {
        /// a TSV file of candidate mutations (.gz allowed)
        #[arg(required = true)]
        mutations: PathBuf,

        /// ordered mutation columns whose combined values define one reviewable unit
        #[arg(long, required = true, value_delimiter = ',')]
        group_by: Vec<String>,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the mutation rows belonging to one locus key.
    Mutations {
        /// a TSV file of candidate mutations (.gz allowed)
        #[arg(required = true)]
        mutations: PathBuf,

        /// ordered mutation columns whose combined values define one reviewable unit
        #[arg(long, required = true, value_delimiter = ',')]
        group_by: Vec<String>,

        /// the locus key under review, e.g. '17:7571820:P1'
        #[arg(long, required = true)]
        locus: String,

        /// mutation columns to display; all columns if omitted
        #[arg(long, value_delimiter = ',')]
        display_cols: Vec<String>,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build the reshaped track table for one locus key.
    Tracks {
        #[command(flatten)]
        data: DataArgs,

        /// the locus key under review, e.g. '17:7571820:P1'
        #[arg(long, required = true)]
        locus: String,

        /// additional BAM-table columns to carry into the output
        #[arg(long, value_delimiter = ',')]
        display_cols: Vec<String>,

        /// output serialization
        #[arg(long, value_enum, default_value = "tsv")]
        format: TableFormat,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Emit igv.js session JSON for one locus key.
    Session {
        #[command(flatten)]
        data: DataArgs,

        /// the locus key under review, e.g. '17:7571820:P1'
        #[arg(long, required = true)]
        locus: String,

        /// additional BAM-table columns to carry into the track table
        #[arg(long, value_delimiter = ',')]
        display_cols: Vec<String>,

        /// number of tracks initially selected from the top of the table
        #[arg(long, default_value_t = 3)]
        init_max: usize,

        /// igv.js genome identifier
        #[arg(long, default_value = "hg19")]
        genome: String,

        /// per-track display height in pixels
        #[arg(long, default_value_t = 400)]
        track_height: u32,

        /// minimum window size in basepairs when zooming in
        #[arg(long, default_value_t = 200)]
        minimum_bases: u32,

        /// command producing an access token for remote files, e.g.
        /// 'gcloud auth application-default print-access-token'; omit for no token
        #[arg(long)]
        token_command: Option<String>,

        /// command run in the same shell before the token command
        #[arg(long)]
        setup_command: Option<String>,

        /// proceed with an empty token when the token command fails
        #[arg(long)]
        allow_empty_token: bool,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load one locus key and its tracks into a locally running desktop IGV.
    Igv {
        #[command(flatten)]
        data: DataArgs,

        /// the locus key under review, e.g. '17:7571820:P1'
        #[arg(long, required = true)]
        locus: String,

        /// number of tracks loaded from the top of the table
        #[arg(long, default_value_t = 3)]
        init_max: usize,

        /// address of the IGV batch-command port
        #[arg(long, default_value = DEFAULT_IGV_ADDR)]
        addr: String,

        /// read display mode
        #[arg(long, value_enum, default_value = "collapse")]
        view: ViewMode,

        /// seconds to wait for each IGV response
        #[arg(long, default_value_t = 60)]
        recv_timeout: u64,
    },
}

fn token_provider(
    token_command: Option<String>,
    setup_command: Option<String>,
    allow_empty_token: bool,
) -> Box<dyn TokenProvider> {
    match token_command {
        Some(command) => {
            let mut provider = CommandTokenProvider::new(command);
            if let Some(setup) = setup_command {
                provider = provider.with_setup(setup);
            }
            if allow_empty_token {
                provider = provider.with_policy(TokenPolicy::AllowEmpty);
            }
            Box::new(provider)
        }
        None => Box::new(StaticTokenProvider::default()),
    }
}

fn run() -> Result<(), ReviewError> {
    let cli = Cli::parse();

    let filter_level = match cli.debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(filter_level)
        .init();

    let result = match cli.command {
        Some(Commands::Loci {
            mutations,
            group_by,
            output,
        }) => review_loci(&mutations, &group_by, output.as_ref()).map(|res| res.report),
        Some(Commands::Mutations {
            mutations,
            group_by,
            locus,
            display_cols,
            output,
        }) => review_mutations(
            &mutations,
            &group_by,
            &LocusKey::from(locus),
            &display_cols,
            output.as_ref(),
        )
        .map(|res| res.report),
        Some(Commands::Tracks {
            data,
            locus,
            display_cols,
            format,
            output,
        }) => review_tracks(
            &data.mutations,
            data.mutation_columns(),
            &data.bams,
            data.bam_columns(),
            &LocusKey::from(locus),
            &display_cols,
            format,
            output.as_ref(),
        )
        .map(|res| res.report),
        Some(Commands::Session {
            data,
            locus,
            display_cols,
            init_max,
            genome,
            track_height,
            minimum_bases,
            token_command,
            setup_command,
            allow_empty_token,
            output,
        }) => {
            let settings = TrackSettings {
                genome,
                track_height,
                minimum_bases,
                ..TrackSettings::default()
            };
            review_session(
                &data.mutations,
                data.mutation_columns(),
                &data.bams,
                data.bam_columns(),
                &LocusKey::from(locus),
                &display_cols,
                init_max,
                settings,
                token_provider(token_command, setup_command, allow_empty_token),
                output.as_ref(),
            )
            .map(|res| res.report)
        }
        Some(Commands::Igv {
            data,
            locus,
            init_max,
            addr,
            view,
            recv_timeout,
        }) => review_igv(
            &data.mutations,
            data.mutation_columns(),
            &data.bams,
            data.bam_columns(),
            &LocusKey::from(locus),
            init_max,
            &addr,
            view,
            Duration::from_secs(recv_timeout),
        )
        .map(|res| res.report),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    };

    result?.print();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
