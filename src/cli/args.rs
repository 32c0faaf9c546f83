// args.rs - Command line arguments definition

use argh::FromArgs;

pub const DEFAULT_FORMAT: &str = "tsv";
pub const DEFAULT_PREFIX: &str = "strandshift";

#[derive(FromArgs, Debug)]
/// strandshift - strand shift profiling for fragment-length estimation
pub struct Args {
    /// genome table: chromosome<TAB>length[<TAB>autosome|allosome]
    #[argh(option)]
    pub gt: Option<String>,

    /// read table: chromosome<TAB>start<TAB>strand[<TAB>read_length[<TAB>duplicate]]
    #[argh(option, short = 'i')]
    pub input: Option<String>,

    /// output file prefix (default: strandshift)
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// output directory (default: current directory)
    #[argh(option)]
    pub odir: Option<String>,

    /// shift metric: jaccard, exjaccard, ccp, hdp (default: jaccard)
    #[argh(option, default = "String::from(crate::metrics::DEFAULT_METRIC)")]
    pub metric: String,

    /// output format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(DEFAULT_FORMAT)")]
    pub format: String,

    /// first fine-regime offset (default: 0)
    #[argh(option)]
    pub mp_from: Option<usize>,

    /// end of the fine regime, exclusive (default: 1000)
    #[argh(option)]
    pub mp_to: Option<usize>,

    /// first background offset (default: 500000)
    #[argh(option)]
    pub ng_from: Option<usize>,

    /// end of the background regime, exclusive (default: 1000000)
    #[argh(option)]
    pub ng_to: Option<usize>,

    /// background offset step (default: 5000)
    #[argh(option)]
    pub ng_step: Option<usize>,

    /// number of threads (default: auto-detect)
    #[argh(option, short = 'p')]
    pub threads: Option<usize>,

    /// profile only chromosomes matching regex pattern
    #[argh(option)]
    pub include_chr: Option<String>,

    /// skip chromosomes matching regex pattern
    #[argh(option)]
    pub exclude_chr: Option<String>,

    /// skip profiling and use --flen as the fragment length
    #[argh(switch)]
    pub nomodel: bool,

    /// fragment length used with --nomodel (default: 150)
    #[argh(option)]
    pub flen: Option<u32>,

    /// normalized read total for per-strand counts (default: 10000000)
    #[argh(option)]
    pub nrpm: Option<u64>,

    /// verbose logging (debug level)
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// hide the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// list available metrics and exit
    #[argh(switch)]
    pub list_metrics: bool,

    /// validate inputs without profiling (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
