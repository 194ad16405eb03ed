pub mod bnd_synthesizer;
pub mod breakend_matcher;
pub mod cli;
pub mod containers;
pub mod errors;
pub mod external_tools;
pub mod ingester;
pub mod mate_resolver;
pub mod notation;
pub mod record_index;
pub mod result_writer;
pub mod strand_classifier;
pub mod svtype_classifier;
pub mod utils;
