use clap::Subcommand;
use model::{
    catalog::field::Field,
    query::{predicate::Predicate, sort::SortSpec},
};

#[derive(Subcommand)]
pub enum Commands {
    /// List the filterable and sortable fields
    Fields,

    /// List the id and name of every breed
    Breeds,

    /// Show a single breed with its picture
    Show {
        #[arg(help = "Breed id, e.g. abys")]
        id: String,
    },

    /// Page through all breeds
    List {
        #[arg(long, default_value_t = 0, help = "Zero-based page to print")]
        page: usize,

        #[arg(long, help = "Print every page")]
        all: bool,
    },

    /// Filter breeds by one or more predicates (combined with AND)
    Filter {
        #[arg(
            long = "where",
            required = true,
            help = "Predicate such as 'adaptability>3' or 'rare=1'; repeat for more"
        )]
        predicates: Vec<Predicate>,

        #[arg(long, help = "Sort the matches, e.g. 'energy_level:desc'")]
        sort: Option<SortSpec>,

        #[arg(long, default_value_t = 0, help = "Zero-based page to print")]
        page: usize,
    },

    /// Sort all breeds by a field
    Sort {
        #[arg(help = "Field with optional direction, e.g. 'intelligence:desc'")]
        spec: SortSpec,

        #[arg(long, default_value_t = 0, help = "Zero-based page to print")]
        page: usize,
    },

    /// Show the operators and values a field can be filtered with
    Options {
        #[arg(help = "Field name, e.g. child_friendly")]
        field: Field,
    },

    /// Fetch the breed list again and replace the cached copy
    Refresh,

    /// Keep the cache fresh, refreshing periodically until interrupted
    Watch {
        #[arg(
            long,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Seconds between refreshes (defaults to the configured period)"
        )]
        every: Option<u64>,
    },
}
