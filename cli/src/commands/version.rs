//! Version command.

use procure_utils::version_info::{
    Channel, build_commit, build_date, build_profile, format_env_version,
};

use crate::output::Output;

pub fn print_version() {
    let out = Output::new();
    out.header(format!("procure {}", format_env_version()));
    out.labeled_indent("Channel", Channel::current().as_str(), 2);
    out.labeled_indent("Commit", build_commit(), 2);
    out.labeled_indent("Built", build_date(), 2);
    out.labeled_indent("Profile", build_profile(), 2);
}
