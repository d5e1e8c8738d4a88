pub mod output;
pub mod rank;
pub mod watch;

pub use output::OutputFormat;
pub use rank::{print_endpoints, print_ranking};
pub use watch::watch;
