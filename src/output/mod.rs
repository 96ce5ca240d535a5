pub mod formatter;

pub use formatter::{
    format_report_header, format_result, format_result_json, format_score, format_tsv,
    should_use_colors,
};
