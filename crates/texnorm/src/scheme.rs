//! Canonical naming grammar for normalized tex bundles.
//!
//! A normalized bundle contains exactly one `Main_En.tex` plus zero or
//! more supplement files `SM<N>_En.tex`, numbered contiguously from 1.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Leaf name of the canonical entry-point file.
pub const MAIN_NAME: &str = "Main_En.tex";

static SUPPLEMENT_RE: OnceLock<Regex> = OnceLock::new();

fn supplement_re() -> &'static Regex {
    SUPPLEMENT_RE.get_or_init(|| Regex::new(r"^SM\d+_En\.tex$").expect("valid pattern"))
}

/// Canonical name for the `index`-th supplement file (1-based).
pub fn supplement_name(index: usize) -> String {
    format!("SM{}_En.tex", index)
}

/// Whether `leaf` already carries a supplement name.
pub fn is_supplement_name(leaf: &str) -> bool {
    supplement_re().is_match(leaf)
}

/// Whether a leaf name is subject to normalization (`.tex`,
/// case-insensitive).
pub fn is_normalizable(leaf: &str) -> bool {
    Path::new(leaf)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"))
}
